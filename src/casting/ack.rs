//! One awaitable completion per round.
//!
//! The presentation layer gets an [`AckSignal`]; the driver awaits the
//! paired [`AckWaiter`] with a fallback timeout. The first signal wins and
//! every later one is ignored.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::oneshot;

/// How a round's wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acknowledgement {
    /// The presenter signalled completion.
    Signalled,
    /// Nothing arrived before the fallback timeout.
    TimedOut,
    /// Every signal handle was dropped without signalling.
    Abandoned,
}

/// Create a linked signal/waiter pair for one round.
pub fn round_ack() -> (AckSignal, AckWaiter) {
    let (tx, rx) = oneshot::channel();
    (
        AckSignal {
            sender: Arc::new(Mutex::new(Some(tx))),
        },
        AckWaiter { receiver: rx },
    )
}

/// Handle the presenter uses to report that a round's transition finished.
#[derive(Debug, Clone)]
pub struct AckSignal {
    sender: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl AckSignal {
    /// Returns true only for the signal that actually completed the round.
    pub fn signal(&self) -> bool {
        let sender = self.sender.lock().expect("ack lock poisoned").take();
        match sender {
            Some(tx) => tx.send(()).is_ok(),
            None => false,
        }
    }

    pub fn is_signalled(&self) -> bool {
        self.sender.lock().expect("ack lock poisoned").is_none()
    }
}

#[derive(Debug)]
pub struct AckWaiter {
    receiver: oneshot::Receiver<()>,
}

impl AckWaiter {
    /// Wait for the signal, giving up after `fallback`.
    pub async fn wait(self, fallback: Duration) -> Acknowledgement {
        match tokio::time::timeout(fallback, self.receiver).await {
            Ok(Ok(())) => Acknowledgement::Signalled,
            Ok(Err(_)) => Acknowledgement::Abandoned,
            Err(_) => Acknowledgement::TimedOut,
        }
    }
}
