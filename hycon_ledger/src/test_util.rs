use std::collections::VecDeque;
use std::sync::Mutex;

use crate::apdu::{APDUCmdVec, StatusWord};

pub const PATH: &str = "44'/1397'/0'/0'/0";

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Recovery id followed by a 64 bytes signature of `0x5a`
pub fn signature_response(recovery: u8) -> Vec<u8> {
    let mut data = vec![recovery];
    data.extend_from_slice(&[0x5a; 64]);
    data
}

/// Replays queued answers and records the serialized commands it receives
#[derive(Debug, Default)]
pub struct MockTransport {
    answers: Mutex<VecDeque<(StatusWord, Vec<u8>)>>,
    sent: Mutex<Vec<Vec<u8>>>,
    #[cfg(feature = "asyncr")]
    in_flight: std::sync::atomic::AtomicBool,
    #[cfg(feature = "asyncr")]
    overlapped: std::sync::atomic::AtomicBool,
}

impl MockTransport {
    pub fn new(answers: Vec<(StatusWord, Vec<u8>)>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.lock().unwrap().clone()
    }

    fn reply(&self, command: &APDUCmdVec) -> Result<(StatusWord, Vec<u8>), String> {
        self.sent.lock().unwrap().push(command.serialize());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| "device disconnected".to_string())
    }

    /// Whether two exchanges were ever running at the same time
    #[cfg(feature = "asyncr")]
    pub fn overlapped(&self) -> bool {
        self.overlapped.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl crate::client::Transport for MockTransport {
    type Error = String;

    fn exchange(&self, command: &APDUCmdVec) -> Result<(StatusWord, Vec<u8>), Self::Error> {
        self.reply(command)
    }
}

#[cfg(feature = "asyncr")]
impl crate::asyncr::Transport for MockTransport {
    type Error = String;

    fn exchange(
        &self,
        command: &APDUCmdVec,
    ) -> impl std::future::Future<Output = Result<(StatusWord, Vec<u8>), Self::Error>> + Send {
        use std::sync::atomic::Ordering;

        async move {
            if self.in_flight.swap(true, Ordering::SeqCst) {
                self.overlapped.store(true, Ordering::SeqCst);
            }
            // give other callers the chance to run while the device "waits for the user"
            tokio::task::yield_now().await;
            let result = self.reply(command);
            self.in_flight.store(false, Ordering::SeqCst);
            result
        }
    }
}
