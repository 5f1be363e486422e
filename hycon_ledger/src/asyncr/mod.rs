pub use client::{HyconClient, Transport};
pub use transport_tcp::TransportTcp;

mod client;
mod transport_tcp;

#[derive(Debug)]
pub struct Hycon<T: Transport> {
    /// Hycon Ledger Client
    pub client: HyconClient<T>,
}

impl Hycon<TransportTcp> {
    /// Connects to a Speculos emulator listening on localhost
    pub async fn new(port: u16) -> Result<Self, std::io::Error> {
        let client = HyconClient::new(TransportTcp::new(port).await?);
        Ok(Self { client })
    }
}

impl<T: Transport> Hycon<T> {
    pub fn from_transport(transport: T) -> Self {
        let client = HyconClient::new(transport);
        Self { client }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{signature_response, MockTransport, PATH};
    use crate::{HyconClientError, StatusWord};

    #[tokio::test]
    async fn from_transport() {
        let hycon = Hycon::from_transport(MockTransport::new(vec![
            (StatusWord::OK, vec![1, 0, 0]),
            (StatusWord::OK, signature_response(2)),
            (StatusWord::InsNotSupported, vec![]),
        ]));
        let client = &hycon.client;

        assert_eq!(client.get_app_config().await.unwrap().version, "1.0.0");
        let signature = client.sign_transaction(PATH, "1214").await.unwrap();
        assert_eq!(signature.recovery, 2);

        let err = client.get_address(PATH, false).await.unwrap_err();
        assert!(matches!(
            err,
            HyconClientError::Device {
                command: 0x02,
                status: StatusWord::InsNotSupported
            }
        ));
        let err = client.get_app_config().await.unwrap_err();
        assert!(matches!(err, HyconClientError::Transport(_)));
    }
}
