//! APDU commands for the Hycon application.

use crate::apdu::{self, APDUCmdVec, HyconCommandCode, MAX_APDU_DATA_LEN};
use crate::path::DerivationPath;

/// Maximum raw transaction length, the length prefix is a single byte
pub const MAX_RAW_TX_LEN: usize = u8::MAX as usize;

/// Returned when a request cannot be represented on the wire
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{what} is {size} bytes, at most {max} are allowed")]
pub struct PayloadTooLarge {
    pub what: &'static str,
    pub size: usize,
    pub max: usize,
}

/// Creates the APDU command to get the public key and address for the given derivation path.
///
/// With `display` the device shows the address and waits for the user to confirm it.
pub fn get_address(
    path: &DerivationPath,
    display: bool,
) -> Result<APDUCmdVec, PayloadTooLarge> {
    let len = path.serialized_len();
    if len > MAX_APDU_DATA_LEN {
        return Err(PayloadTooLarge {
            what: "request data",
            size: len,
            max: MAX_APDU_DATA_LEN,
        });
    }

    Ok(apdu::apdu(
        HyconCommandCode::GetAddress,
        if display { 0x01 } else { 0x00 },
        0x00,
        path.serialize(),
    ))
}

/// Creates the APDU command to sign `raw_tx` with the key at the given derivation path.
pub fn sign_transaction(
    path: &DerivationPath,
    raw_tx: &[u8],
) -> Result<APDUCmdVec, PayloadTooLarge> {
    if raw_tx.len() > MAX_RAW_TX_LEN {
        return Err(PayloadTooLarge {
            what: "raw transaction",
            size: raw_tx.len(),
            max: MAX_RAW_TX_LEN,
        });
    }
    let len = path.serialized_len() + 1 + raw_tx.len();
    if len > MAX_APDU_DATA_LEN {
        return Err(PayloadTooLarge {
            what: "request data",
            size: len,
            max: MAX_APDU_DATA_LEN,
        });
    }

    let mut data = Vec::with_capacity(len);
    path.serialize_into(&mut data);
    data.push(raw_tx.len() as u8);
    data.extend_from_slice(raw_tx);
    debug_assert_eq!(data.len(), len);

    Ok(apdu::apdu(HyconCommandCode::SignTransaction, 0x00, 0x00, data))
}

/// Creates the APDU command to retrieve the app version.
pub fn get_app_config() -> APDUCmdVec {
    apdu::apdu_empty(HyconCommandCode::GetAppConfig)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATH: &str = "44'/1397'/0'/0'/0";

    fn path() -> DerivationPath {
        PATH.parse().unwrap()
    }

    #[test]
    fn get_address_command() {
        let cmd = get_address(&path(), false).unwrap();
        assert_eq!((cmd.cla, cmd.ins, cmd.p1, cmd.p2), (0xE0, 0x02, 0x00, 0x00));
        assert_eq!(cmd.data[0], 5);
        assert_eq!(cmd.data.len(), 1 + 4 * 5);
        assert_eq!(cmd.data, path().serialize());

        let cmd = get_address(&path(), true).unwrap();
        assert_eq!((cmd.cla, cmd.ins, cmd.p1, cmd.p2), (0xE0, 0x02, 0x01, 0x00));
        assert_eq!(
            hex::encode(cmd.serialize()),
            "e002010015058000002c80000575800000008000000000000000"
        );
    }

    #[test]
    fn get_address_deterministic() {
        assert_eq!(
            get_address(&path(), true).unwrap().serialize(),
            get_address(&path(), true).unwrap().serialize()
        );
    }

    #[test]
    fn get_address_deep_path() {
        let path: DerivationPath = vec!["7"; 63].join("/").parse().unwrap();
        let cmd = get_address(&path, false).unwrap();
        assert_eq!(cmd.data.len(), MAX_APDU_DATA_LEN);
        assert_eq!(cmd.data[0], 63);
        assert_eq!(cmd.serialize()[4], 255);

        let path: DerivationPath = vec!["7"; 64].join("/").parse().unwrap();
        let err = get_address(&path, false).err().unwrap();
        assert_eq!(
            err,
            PayloadTooLarge {
                what: "request data",
                size: 1 + 4 * 64,
                max: MAX_APDU_DATA_LEN
            }
        );
    }

    #[test]
    fn sign_transaction_command() {
        let raw_tx =
            hex::decode("1214db6612b309d257a2aebd59b7445a900ed775d92118904e206428d209").unwrap();
        let cmd = sign_transaction(&path(), &raw_tx).unwrap();
        assert_eq!((cmd.cla, cmd.ins, cmd.p1, cmd.p2), (0xE0, 0x04, 0x00, 0x00));
        assert_eq!(cmd.data.len(), 1 + 4 * 5 + 1 + raw_tx.len());
        assert_eq!(cmd.data[0], 5);
        assert_eq!(cmd.data[21] as usize, raw_tx.len());
        assert_eq!(&cmd.data[22..], &raw_tx[..]);
        assert_eq!(
            cmd.serialize(),
            sign_transaction(&path(), &raw_tx).unwrap().serialize()
        );
    }

    #[test]
    fn sign_empty_transaction() {
        let empty = DerivationPath::default();
        let cmd = sign_transaction(&empty, &[]).unwrap();
        assert_eq!(cmd.data, vec![0, 0]);
    }

    #[test]
    fn sign_transaction_too_large() {
        let err = sign_transaction(&path(), &[0u8; 256]).err().unwrap();
        assert_eq!(
            err,
            PayloadTooLarge {
                what: "raw transaction",
                size: 256,
                max: 255
            }
        );
        assert!(sign_transaction(&path(), &vec![0u8; 1000]).is_err());

        // fits the length prefix but not the APDU
        let err = sign_transaction(&path(), &[0u8; 255]).err().unwrap();
        assert_eq!(err.size, 1 + 4 * 5 + 1 + 255);
        assert_eq!(err.max, MAX_APDU_DATA_LEN);

        let max = MAX_APDU_DATA_LEN - path().serialized_len() - 1;
        let cmd = sign_transaction(&path(), &vec![0xAB; max]).unwrap();
        assert_eq!(cmd.data.len(), MAX_APDU_DATA_LEN);
        assert!(sign_transaction(&path(), &vec![0xAB; max + 1]).is_err());
    }

    #[test]
    fn get_app_config_command() {
        let cmd = get_app_config();
        assert_eq!((cmd.cla, cmd.ins, cmd.p1, cmd.p2), (0xE0, 0x06, 0x00, 0x00));
        assert!(cmd.data.is_empty());
    }
}
