use super::*;
use qr_core::*;
use tokio::sync::mpsc::Sender;

/// Chat platform seen from inside a session.
///
/// Rooms do not care whether messages end up in a chat service, a terminal,
/// or a test recorder. Every call may fail; rooms log failures and carry on,
/// so implementations should not retry on their behalf.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Plain text, delivered as written.
    async fn send_text(&self, channel: &ID<Channel>, text: &str) -> anyhow::Result<()>;
    /// Text rendered to an image before delivery.
    async fn send_image(&self, channel: &ID<Channel>, text: &str) -> anyhow::Result<()>;
    /// Structured result card.
    async fn send_embed(&self, channel: &ID<Channel>, embed: Embed) -> anyhow::Result<()>;
    /// Starts forwarding every non-bot message posted to `channel` into
    /// `relay` until the returned subscription is closed.
    async fn subscribe(
        &self,
        channel: &ID<Channel>,
        relay: Sender<Inbound>,
    ) -> anyhow::Result<Subscription>;
    /// Presence line shown next to the bot.
    async fn set_status(&self, status: &str) -> anyhow::Result<()>;
    /// Whether `channel` is a one-to-one conversation.
    async fn is_private(&self, channel: &ID<Channel>) -> anyhow::Result<bool>;
}

/// Live registration of a relay with a transport.
///
/// Closing (or dropping) the subscription stops delivery.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new<F>(cancel: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }
    /// A subscription with nothing to undo.
    pub fn detached() -> Self {
        Self { cancel: None }
    }
    pub fn close(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    #[test]
    fn cancel_runs_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let clone = count.clone();
        let subscription = Subscription::new(move || {
            clone.fetch_add(1, Ordering::SeqCst);
        });
        subscription.close();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
    #[test]
    fn drop_cancels() {
        let count = Arc::new(AtomicUsize::new(0));
        let clone = count.clone();
        drop(Subscription::new(move || {
            clone.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        drop(Subscription::detached());
    }
}
