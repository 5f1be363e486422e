use core::fmt;

use ledger_apdu::APDUCommand;

pub type APDUCmdVec = APDUCommand<Vec<u8>>;

/// Maximum data length of a short APDU, `Lc` is a single byte
pub const MAX_APDU_DATA_LEN: usize = u8::MAX as usize;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Cla {
    Hycon = 0xE0,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum HyconCommandCode {
    GetAddress = 0x02,
    SignTransaction = 0x04,
    GetAppConfig = 0x06,
}

impl TryFrom<u8> for HyconCommandCode {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x02 => Ok(HyconCommandCode::GetAddress),
            0x04 => Ok(HyconCommandCode::SignTransaction),
            0x06 => Ok(HyconCommandCode::GetAppConfig),
            _ => Err(()),
        }
    }
}

/// Human readable command name for logs and errors, e.g. `GetAddress (0x02)`
pub(crate) fn command_name(ins: &u8) -> String {
    match HyconCommandCode::try_from(*ins) {
        Ok(code) => format!("{code:?} ({ins:#04x})"),
        Err(()) => format!("command {ins:#04x}"),
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StatusWord {
    /// Wrong Length
    WrongLength,
    /// Security status not satisfied, usually the device is locked
    SecurityStatusNotSatisfied,
    /// Rejected by user
    Deny,
    /// Incorrect Data
    IncorrectData,
    /// Not Supported
    NotSupported,
    /// Wrong P1P2
    WrongP1P2,
    /// Wrong DataLength
    WrongDataLength,
    /// Ins not supported
    InsNotSupported,
    /// Cla not supported
    ClaNotSupported,
    /// Success
    OK,
    /// Any other status, the raw code is kept
    Unknown(u16),
}

impl StatusWord {
    pub fn code(&self) -> u16 {
        match self {
            StatusWord::WrongLength => 0x6700,
            StatusWord::SecurityStatusNotSatisfied => 0x6982,
            StatusWord::Deny => 0x6985,
            StatusWord::IncorrectData => 0x6A80,
            StatusWord::NotSupported => 0x6A82,
            StatusWord::WrongP1P2 => 0x6A86,
            StatusWord::WrongDataLength => 0x6A87,
            StatusWord::InsNotSupported => 0x6D00,
            StatusWord::ClaNotSupported => 0x6E00,
            StatusWord::OK => 0x9000,
            StatusWord::Unknown(code) => *code,
        }
    }
}

impl From<u16> for StatusWord {
    fn from(value: u16) -> Self {
        match value {
            0x6700 => StatusWord::WrongLength,
            0x6982 => StatusWord::SecurityStatusNotSatisfied,
            0x6985 => StatusWord::Deny,
            0x6A80 => StatusWord::IncorrectData,
            0x6A82 => StatusWord::NotSupported,
            0x6A86 => StatusWord::WrongP1P2,
            0x6A87 => StatusWord::WrongDataLength,
            0x6D00 => StatusWord::InsNotSupported,
            0x6E00 => StatusWord::ClaNotSupported,
            0x9000 => StatusWord::OK,
            code => StatusWord::Unknown(code),
        }
    }
}

impl fmt::Display for StatusWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({:#06x})", self, self.code())
    }
}

pub fn apdu(ins: HyconCommandCode, p1: u8, p2: u8, data: Vec<u8>) -> APDUCmdVec {
    APDUCmdVec {
        cla: Cla::Hycon as u8,
        ins: ins as u8,
        p1,
        p2,
        data,
    }
}

pub fn apdu_empty(ins: HyconCommandCode) -> APDUCmdVec {
    apdu(ins, 0x00, 0x00, Vec::new())
}
