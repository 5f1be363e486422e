use core::fmt::Debug;

use tokio::sync::Mutex;

use crate::apdu::{APDUCmdVec, StatusWord};
use crate::client::{check_status, decode_raw_tx, log_request};
use crate::command;
use crate::error::HyconClientError;
use crate::model::{Address, AppConfig, Signature};
use crate::path::DerivationPath;
use crate::response;

/// Async twin of [`crate::HyconClient`]
///
/// Concurrent callers queue on an internal lock, the transport never sees more than one
/// request at a time.
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

    async fn make_request(
        &self,
        req: &APDUCmdVec,
    ) -> Result<Vec<u8>, HyconClientError<T::Error>> {
        let _guard = self.exchange_lock.lock().await;
        log_request(req);
        let (sw, data) = self
            .transport
            .exchange(req)
            .await
            .map_err(HyconClientError::Transport)?;
        check_status(req, sw, data)
    }

    pub async fn get_address(
        &self,
        path: &str,
        display: bool,
    ) -> Result<Address, HyconClientError<T::Error>> {
        let path: DerivationPath = path.parse()?;
        self.get_address_at(&path, display).await
    }

    pub async fn get_address_at(
        &self,
        path: &DerivationPath,
        display: bool,
    ) -> Result<Address, HyconClientError<T::Error>> {
        let cmd = command::get_address(path, display)?;
        let data = self.make_request(&cmd).await?;
        response::decode_address(&data).map_err(|source| HyconClientError::MalformedResponse {
            command: cmd.ins,
            source,
        })
    }

    pub async fn sign_transaction(
        &self,
        path: &str,
        raw_tx_hex: &str,
    ) -> Result<Signature, HyconClientError<T::Error>> {
        let path: DerivationPath = path.parse()?;
        let raw_tx = decode_raw_tx(raw_tx_hex)?;
        self.sign_transaction_at(&path, &raw_tx).await
    }

    pub async fn sign_transaction_at(
        &self,
        path: &DerivationPath,
        raw_tx: &[u8],
    ) -> Result<Signature, HyconClientError<T::Error>> {
        let cmd = command::sign_transaction(path, raw_tx)?;
        let data = self.make_request(&cmd).await?;
        response::decode_signature(&data).map_err(|source| HyconClientError::MalformedResponse {
            command: cmd.ins,
            source,
        })
    }

    pub async fn get_app_config(&self) -> Result<AppConfig, HyconClientError<T::Error>> {
        let cmd = command::get_app_config();
        let data = self.make_request(&cmd).await?;
        response::decode_app_config(&data).map_err(|source| {
            HyconClientError::MalformedResponse {
                command: cmd.ins,
                source,
            }
        })
    }
}

/// Asynchronous communication layer between the Hycon client and the Ledger device.
pub trait Transport {
    type Error: Debug;
    fn exchange(
        &self,
        command: &APDUCmdVec,
    ) -> impl std::future::Future<Output = Result<(StatusWord, Vec<u8>), Self::Error>> + Send;
}
