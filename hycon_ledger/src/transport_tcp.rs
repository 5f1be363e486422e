//! Adapted from
//! https://github.com/LedgerHQ/app-bitcoin-new/blob/develop/bitcoin_client_rs/examples/ledger_hwi

use std::io::{Read, Write};
use std::net::TcpStream;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Mutex;

use crate::apdu::APDUCmdVec;
use crate::{apdu::StatusWord, client::Transport};
use ledger_apdu::APDUAnswer;

/// Largest answer data a device sends back in a single response, status word excluded
pub const MAX_ANSWER_DATA_LEN: usize = 256;

#[derive(Debug, thiserror::Error)]
pub enum TransportTcpError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid answer: {0}")]
    InvalidAnswer(String),

    #[error("unable to get lock: {0}")]
    Poisoned(String),
}

/// Transport to communicate with the Ledger Speculos simulator.
#[derive(Debug)]
pub struct TransportTcp {
    connection: Mutex<TcpStream>,
}

impl TransportTcp {
    /// Connects to the simulator APDU port on localhost
    pub fn new(port: u16) -> Result<Self, std::io::Error> {
        Self::connect(localhost(port))
    }

    pub fn connect(addr: SocketAddr) -> Result<Self, std::io::Error> {
        let stream = TcpStream::connect(addr)?;
        tracing::info!("connected to {addr}");
        Ok(Self {
            connection: Mutex::new(stream),
        })
    }
}

impl Transport for TransportTcp {
    type Error = TransportTcpError;
    fn exchange(&self, command: &APDUCmdVec) -> Result<(StatusWord, Vec<u8>), Self::Error> {
        let mut stream = self
            .connection
            .lock()
            .map_err(|e| TransportTcpError::Poisoned(e.to_string()))?;
        stream.write_all(&frame(command))?;

        let mut buff = [0u8; 4];
        stream.read_exact(&mut buff)?;
        let len = u32::from_be_bytes(buff);

        let mut resp = answer_buffer(len)?;
        stream.read_exact(&mut resp)?;
        parse_answer(resp)
    }
}

pub(crate) fn localhost(port: u16) -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), port)
}

/// Serialized APDU prefixed by its length as big endian u32
pub(crate) fn frame(command: &APDUCmdVec) -> Vec<u8> {
    let command_bytes = command.serialize();

    let mut req = vec![0u8; command_bytes.len() + 4];
    req[..4].copy_from_slice(&(command_bytes.len() as u32).to_be_bytes());
    req[4..].copy_from_slice(&command_bytes);
    req
}

/// Buffer for `len` data bytes plus the status word
pub(crate) fn answer_buffer(len: u32) -> Result<Vec<u8>, TransportTcpError> {
    let len = len as usize;
    if len > MAX_ANSWER_DATA_LEN {
        return Err(TransportTcpError::InvalidAnswer(format!(
            "announced {len} data bytes, at most {MAX_ANSWER_DATA_LEN} are expected"
        )));
    }
    Ok(vec![0u8; len + 2])
}

/// Splits the answer data from the trailing status word
pub(crate) fn parse_answer(resp: Vec<u8>) -> Result<(StatusWord, Vec<u8>), TransportTcpError> {
    let answer = APDUAnswer::from_answer(resp)
        .map_err(|e| TransportTcpError::InvalidAnswer(format!("{e:?}")))?;
    Ok((StatusWord::from(answer.retcode()), answer.data().to_vec()))
}
