//! Cooperative shutdown signaling shared by the UI loop and its feeder tasks.
//!
//! Everything that needs to stop subscribes to the broadcast channel; the
//! first `signal` wakes them all. The channel carries no payload, only the
//! fact that shutdown was requested.

use tokio::sync::broadcast;

#[derive(Clone)]
pub struct ShutdownHandle {
    tx: broadcast::Sender<()>,
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownHandle {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(8);
        Self { tx }
    }

    pub fn signal(&self) {
        let _ = self.tx.send(());
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }
}
