use crate::apdu::APDUCmdVec;
use crate::{apdu::StatusWord, client::Transport};
use ledger_transport_hid::{LedgerHIDError, TransportNativeHID};

/// Transport with the Ledger device over USB.
pub struct TransportHID(TransportNativeHID);

impl TransportHID {
    pub fn new(t: TransportNativeHID) -> Self {
        Self(t)
    }
}

impl Transport for TransportHID {
    type Error = LedgerHIDError;

    fn exchange(&self, cmd: &APDUCmdVec) -> Result<(StatusWord, Vec<u8>), Self::Error> {
        self.0.exchange(cmd).map(|answer| {
            (
                StatusWord::from(answer.retcode()),
                answer.data().to_vec(),
            )
        })
    }
}
