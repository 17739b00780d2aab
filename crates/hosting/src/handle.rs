use qr_core::*;
use qr_gameroom::Outcome;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;
use tokio::sync::oneshot;

/// Handle to a running room.
pub struct RoomHandle {
    pub channel: ID<Channel>,
    stop: UnboundedSender<()>,
}

/// Channels for room lifecycle coordination.
pub struct RoomChannels {
    pub handle: RoomHandle,
    pub stop: UnboundedReceiver<()>,
    pub done_tx: oneshot::Sender<Outcome>,
    pub done_rx: oneshot::Receiver<Outcome>,
}

impl RoomHandle {
    /// Creates paired channels for room communication.
    /// Returns the lobby's side (handle, done_rx) and the room's (stop, done_tx).
    pub fn pair(channel: ID<Channel>) -> RoomChannels {
        let (stop_tx, stop_rx) = unbounded_channel();
        let (done_tx, done_rx) = oneshot::channel();
        RoomChannels {
            handle: RoomHandle {
                channel,
                stop: stop_tx,
            },
            stop: stop_rx,
            done_tx,
            done_rx,
        }
    }
    /// Asks the room to stop. False once the room has finished.
    pub fn stop(&self) -> bool {
        self.stop.send(()).is_ok()
    }
}
