use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use crate::apdu::{APDUCmdVec, StatusWord};
use crate::asyncr::Transport;
use crate::transport_tcp::{answer_buffer, frame, localhost, parse_answer, TransportTcpError};

/// Async transport to communicate with the Ledger Speculos simulator.
#[derive(Debug)]
pub struct TransportTcp {
    connection: Mutex<TcpStream>,
}

impl TransportTcp {
    pub async fn new(port: u16) -> Result<Self, std::io::Error> {
        Self::connect(localhost(port)).await
    }

    pub async fn connect(addr: SocketAddr) -> Result<Self, std::io::Error> {
        let stream = TcpStream::connect(addr).await?;
        tracing::info!("connected to {addr}");
        Ok(Self {
            connection: Mutex::new(stream),
        })
    }
}

impl Transport for TransportTcp {
    type Error = TransportTcpError;

    fn exchange(
        &self,
        command: &APDUCmdVec,
    ) -> impl std::future::Future<Output = Result<(StatusWord, Vec<u8>), Self::Error>> + Send {
        let req = frame(command);
        async move {
            let mut stream = self.connection.lock().await;
            stream.write_all(&req).await?;

            let len = stream.read_u32().await?;
            let mut resp = answer_buffer(len)?;
            stream.read_exact(&mut resp).await?;
            parse_answer(resp)
        }
    }
}
