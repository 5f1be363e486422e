use core::fmt::Debug;
use std::sync::Mutex;

use crate::{
    apdu::{command_name, APDUCmdVec, StatusWord},
    command,
    error::HyconClientError,
    model::{Address, AppConfig, Signature},
    path::DerivationPath,
    response,
};

/// HyconClient calls and decodes commands with the Ledger Device.
///
/// Exchanges are serialized, at most one request is in flight at any time.
#[derive(Debug)]
pub struct HyconClient<T: Transport> {
    transport: T,
    exchange_lock: Mutex<()>,
}

impl<T: Transport> HyconClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            exchange_lock: Mutex::new(()),
        }
    }

    fn make_request(&self, req: &APDUCmdVec) -> Result<Vec<u8>, HyconClientError<T::Error>> {
        let _guard = self.exchange_lock.lock()?;
        log_request(req);
        let (sw, data) = self
            .transport
            .exchange(req)
            .map_err(HyconClientError::Transport)?;
        check_status(req, sw, data)
    }

    /// Returns public key and address for the given BIP 32 path, e.g. `44'/1397'/0'/0'/0`
    ///
    /// With `display` the address is shown on the device and the call blocks until the user
    /// confirms it.
    pub fn get_address(
        &self,
        path: &str,
        display: bool,
    ) -> Result<Address, HyconClientError<T::Error>> {
        let path: DerivationPath = path.parse()?;
        self.get_address_at(&path, display)
    }

    pub fn get_address_at(
        &self,
        path: &DerivationPath,
        display: bool,
    ) -> Result<Address, HyconClientError<T::Error>> {
        let cmd = command::get_address(path, display)?;
        let data = self.make_request(&cmd)?;
        response::decode_address(&data).map_err(|source| HyconClientError::MalformedResponse {
            command: cmd.ins,
            source,
        })
    }

    /// Sign the hex encoded raw transaction with the key at the given BIP 32 path
    ///
    /// The call blocks until the user approves or rejects the transaction on the device.
    pub fn sign_transaction(
        &self,
        path: &str,
        raw_tx_hex: &str,
    ) -> Result<Signature, HyconClientError<T::Error>> {
        let path: DerivationPath = path.parse()?;
        let raw_tx = decode_raw_tx(raw_tx_hex)?;
        self.sign_transaction_at(&path, &raw_tx)
    }

    pub fn sign_transaction_at(
        &self,
        path: &DerivationPath,
        raw_tx: &[u8],
    ) -> Result<Signature, HyconClientError<T::Error>> {
        let cmd = command::sign_transaction(path, raw_tx)?;
        let data = self.make_request(&cmd)?;
        response::decode_signature(&data).map_err(|source| HyconClientError::MalformedResponse {
            command: cmd.ins,
            source,
        })
    }

    /// Returns the version of the Hycon app
    pub fn get_app_config(&self) -> Result<AppConfig, HyconClientError<T::Error>> {
        let cmd = command::get_app_config();
        let data = self.make_request(&cmd)?;
        response::decode_app_config(&data).map_err(|source| {
            HyconClientError::MalformedResponse {
                command: cmd.ins,
                source,
            }
        })
    }
}

/// The operations offered by the Hycon app
pub trait HyconApp {
    type Error;

    fn get_address(&self, path: &str, display: bool) -> Result<Address, Self::Error>;

    fn sign_transaction(&self, path: &str, raw_tx_hex: &str) -> Result<Signature, Self::Error>;

    fn get_app_config(&self) -> Result<AppConfig, Self::Error>;
}

impl<T: Transport> HyconApp for HyconClient<T> {
    type Error = HyconClientError<T::Error>;

    fn get_address(&self, path: &str, display: bool) -> Result<Address, Self::Error> {
        HyconClient::get_address(self, path, display)
    }

    fn sign_transaction(&self, path: &str, raw_tx_hex: &str) -> Result<Signature, Self::Error> {
        HyconClient::sign_transaction(self, path, raw_tx_hex)
    }

    fn get_app_config(&self) -> Result<AppConfig, Self::Error> {
        HyconClient::get_app_config(self)
    }
}

/// Communication layer between the Hycon client and the Ledger device.
///
/// The returned data must not include the status word.
pub trait Transport {
    type Error: Debug;
    fn exchange(&self, command: &APDUCmdVec) -> Result<(StatusWord, Vec<u8>), Self::Error>;
}

pub(crate) fn decode_raw_tx(raw_tx_hex: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let raw_tx_hex = raw_tx_hex.strip_prefix("0x").unwrap_or(raw_tx_hex);
    hex::decode(raw_tx_hex)
}

pub(crate) fn log_request(req: &APDUCmdVec) {
    tracing::debug!(
        "\n--->\tcla:{:#04x} ins:{:#04x} p1:{:#04x} p2:{:#04x}\n\t({} bytes) {}",
        req.cla,
        req.ins,
        req.p1,
        req.p2,
        req.data.len(),
        hex::encode(&req.data),
    );
}

/// Only successful answers are handed to the decoders
pub(crate) fn check_status<E: Debug>(
    req: &APDUCmdVec,
    sw: StatusWord,
    data: Vec<u8>,
) -> Result<Vec<u8>, HyconClientError<E>> {
    tracing::debug!(
        "\n<---\t{}\n\t({} bytes) {}",
        sw,
        data.len(),
        hex::encode(&data)
    );
    if sw != StatusWord::OK {
        tracing::warn!("{} failed with {}", command_name(&req.ins), sw);
        Err(HyconClientError::Device {
            status: sw,
            command: req.ins,
        })
    } else {
        Ok(data)
    }
}
