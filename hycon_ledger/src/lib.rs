#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

mod apdu;
mod client;
pub mod command;
mod error;
mod model;
mod path;
pub mod response;
mod transport_tcp;

#[cfg(feature = "asyncr")]
pub mod asyncr;

#[cfg(feature = "serial")]
mod transport_hid;

#[cfg(test)]
mod test_util;

pub use apdu::{APDUCmdVec, Cla, HyconCommandCode, StatusWord, MAX_APDU_DATA_LEN};
pub use client::{HyconApp, HyconClient, Transport};
pub use command::PayloadTooLarge;
pub use error::HyconClientError;
pub use model::{Address, AppConfig, Signature};
pub use path::{DerivationPath, PathError, HARDENED, MAX_PATH_DEPTH};
pub use response::DecodeError;
pub use transport_tcp::{TransportTcp, TransportTcpError, MAX_ANSWER_DATA_LEN};

#[cfg(feature = "serial")]
pub use transport_hid::TransportHID;

#[derive(Debug)]
pub struct Hycon {
    /// Hycon Ledger Client
    pub client: HyconClient<TransportTcp>,
}

impl Hycon {
    /// Connects to a Speculos emulator listening on localhost
    pub fn new(port: u16) -> Result<Self, std::io::Error> {
        let client = HyconClient::new(TransportTcp::new(port)?);
        Ok(Self { client })
    }
}
