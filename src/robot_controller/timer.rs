//! Cancellable waits for the controller loops.

use crossbeam_channel as cbc;
use std::time::Duration;

/// Receiving side of a cancellation. Fires once the paired `Canceller` is
/// cancelled or dropped.
#[derive(Clone, Debug)]
pub struct CancelToken {
    cancel_rx: cbc::Receiver<()>,
}

#[derive(Debug)]
pub struct Canceller {
    cancel_tx: cbc::Sender<()>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Interrupted;

pub fn cancellation() -> (Canceller, CancelToken) {
    let (cancel_tx, cancel_rx) = cbc::bounded::<()>(0);
    (Canceller { cancel_tx }, CancelToken { cancel_rx })
}

impl Canceller {
    pub fn cancel(self) {
        drop(self.cancel_tx);
    }
}

impl CancelToken {
    /// A token that is never cancelled.
    pub fn never() -> Self {
        Self {
            cancel_rx: cbc::never(),
        }
    }

    /// Blocks for `duration` unless cancelled first.
    pub fn wait(&self, duration: Duration) -> Result<(), Interrupted> {
        let timer = cbc::after(duration);
        cbc::select! {
            recv(self.cancel_rx) -> _ => Err(Interrupted),
            recv(timer) -> _ => Ok(()),
        }
    }
}
