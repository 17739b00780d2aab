use super::*;
use qr_core::RELAY_CAPACITY;
use tokio::sync::mpsc::Receiver;
use tokio::sync::mpsc::Sender;
use tokio::sync::mpsc::channel;
use tokio::sync::mpsc::error::TryRecvError;

/// Coupled sender/receiver pair for inbound chat messages.
/// The sender half is handed to the transport on subscribe; the room
/// keeps the receiver and reads it in strict arrival order.
#[derive(Debug)]
pub struct Relay {
    tx: Sender<Inbound>,
    rx: Receiver<Inbound>,
}

impl Default for Relay {
    fn default() -> Self {
        let (tx, rx) = channel(RELAY_CAPACITY);
        Self { tx, rx }
    }
}

impl Relay {
    pub fn tx(&self) -> Sender<Inbound> {
        self.tx.clone()
    }
    pub fn rx(&mut self) -> &mut Receiver<Inbound> {
        &mut self.rx
    }
    /// Discards everything buffered so far, returning what was discarded.
    pub fn drain(&mut self) -> Vec<Inbound> {
        let mut drained = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(inbound) => drained.push(inbound),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break drained,
            }
        }
    }
}
