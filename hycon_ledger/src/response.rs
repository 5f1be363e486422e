//! Decoding of the data returned by the Hycon app.
//!
//! The status word is already split off by the transport, every read is checked against the
//! remaining bytes so a short answer is reported instead of read past.

use std::io::Cursor;

use byteorder::ReadBytesExt;

use crate::model::{Address, AppConfig, Signature};

/// Length of the compact signature returned by `SignTransaction`
pub const SIGNATURE_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("{field} needs {needed} bytes but only {remaining} are left")]
    Truncated {
        field: &'static str,
        needed: usize,
        remaining: usize,
    },

    #[error("{field} is not ascii")]
    NotAscii { field: &'static str },
}

/// Sequential reader over a response
struct ResponseReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> ResponseReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    fn remaining(&self) -> usize {
        self.cursor
            .get_ref()
            .len()
            .saturating_sub(self.cursor.position() as usize)
    }

    fn truncated(&self, field: &'static str, needed: usize) -> DecodeError {
        DecodeError::Truncated {
            field,
            needed,
            remaining: self.remaining(),
        }
    }

    fn read_u8(&mut self, field: &'static str) -> Result<u8, DecodeError> {
        let err = self.truncated(field, 1);
        self.cursor.read_u8().map_err(|_| err)
    }

    fn read_bytes(&mut self, field: &'static str, len: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < len {
            return Err(self.truncated(field, len));
        }
        let data: &'a [u8] = *self.cursor.get_ref();
        let start = self.cursor.position() as usize;
        self.cursor.set_position((start + len) as u64);
        Ok(&data[start..start + len])
    }

    /// Reads a one byte length followed by that many bytes
    fn read_prefixed(&mut self, field: &'static str) -> Result<&'a [u8], DecodeError> {
        let len = self.read_u8(field)?;
        self.read_bytes(field, len as usize)
    }

    fn finish(self, command: &'static str) {
        let remaining = self.remaining();
        if remaining > 0 {
            tracing::debug!("{command}: ignoring {remaining} trailing bytes");
        }
    }
}

/// Decodes `[pkLen] pk [addrLen] addr [strLen] str`
pub fn decode_address(data: &[u8]) -> Result<Address, DecodeError> {
    let mut reader = ResponseReader::new(data);
    let public_key = reader.read_prefixed("public key")?;
    let hex_address = reader.read_prefixed("hex address")?;
    let string_address = reader.read_prefixed("string address")?;
    reader.finish("get_address");

    if !string_address.is_ascii() {
        return Err(DecodeError::NotAscii {
            field: "string address",
        });
    }

    Ok(Address {
        public_key: hex::encode(public_key),
        hex_address: format!("0x{}", hex::encode(hex_address)),
        string_address: string_address.iter().map(|b| *b as char).collect(),
    })
}

/// Decodes `[recovery] signature(64)`
pub fn decode_signature(data: &[u8]) -> Result<Signature, DecodeError> {
    let mut reader = ResponseReader::new(data);
    let recovery = reader.read_u8("recovery id")?;
    let signature = reader.read_bytes("signature", SIGNATURE_LEN)?;
    reader.finish("sign_transaction");

    Ok(Signature {
        signature: hex::encode(signature),
        recovery,
    })
}

/// Decodes `[major] [minor] [patch]`
pub fn decode_app_config(data: &[u8]) -> Result<AppConfig, DecodeError> {
    let mut reader = ResponseReader::new(data);
    let major = reader.read_u8("major version")?;
    let minor = reader.read_u8("minor version")?;
    let patch = reader.read_u8("patch version")?;
    reader.finish("get_app_config");

    Ok(AppConfig::new(major, minor, patch))
}
