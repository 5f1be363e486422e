use core::fmt;

use serde::{Deserialize, Serialize};

/// Public key and address of a derivation path, as returned by the app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Hex encoded public key
    pub public_key: String,

    /// Hex encoded address bytes with `0x` prefix
    pub hex_address: String,

    /// Address in the text form shown on the device
    pub string_address: String,
}

/// Signature of a raw transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Hex encoded 64 bytes compact signature
    pub signature: String,

    /// Recovery id, allows recovering the public key from the signature
    pub recovery: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// App version as `major.minor.patch`
    pub version: String,
}

impl AppConfig {
    pub fn new(major: u8, minor: u8, patch: u8) -> Self {
        Self {
            version: format!("{major}.{minor}.{patch}"),
        }
    }
}

impl fmt::Display for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version)
    }
}
