use core::fmt::Debug;
use std::sync::PoisonError;

use crate::{
    apdu::{command_name, StatusWord},
    command::PayloadTooLarge,
    path::PathError,
    response::DecodeError,
};

#[derive(Debug, thiserror::Error)]
pub enum HyconClientError<T: Debug> {
    #[error("Transport error: {0:?}")]
    Transport(T),

    #[error("Device returned {status} to {}", command_name(.command))]
    Device { command: u8, status: StatusWord },

    #[error("Malformed response to {}: {source}", command_name(.command))]
    MalformedResponse { command: u8, source: DecodeError },

    #[error("Invalid path: {0}")]
    InvalidPath(#[from] PathError),

    #[error("Invalid transaction hex: {0}")]
    InvalidTransaction(#[from] hex::FromHexError),

    #[error(transparent)]
    PayloadTooLarge(#[from] PayloadTooLarge),

    #[error("Poison error: {0}")]
    Poisoned(String),
}

impl<T: Debug, G> From<PoisonError<G>> for HyconClientError<T> {
    fn from(e: PoisonError<G>) -> Self {
        HyconClientError::Poisoned(e.to_string())
    }
}
