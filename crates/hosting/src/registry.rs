use super::*;
use qr_core::*;
use qr_gameroom::Transport;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::OnceLock;
use tokio::sync::RwLock;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;

/// Presence text for a number of running sessions.
pub fn presence(count: usize) -> String {
    match count {
        0 => String::new(),
        1 => "1 quiz".to_string(),
        n => format!("{} quizzes", n),
    }
}

/// Channels with a session running. At most one session per channel.
///
/// Every change queues a presence status while the change is still held,
/// so statuses reach the transport in the order the changes happened. One
/// background task delivers them; a failed delivery is logged and skipped.
pub struct Registry {
    active: RwLock<HashSet<ID<Channel>>>,
    statuses: OnceLock<UnboundedSender<String>>,
    transport: Arc<dyn Transport>,
}

impl Registry {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            active: RwLock::new(HashSet::new()),
            statuses: OnceLock::new(),
            transport,
        }
    }
    /// Claims `channel`, unless it already has a session.
    pub async fn try_start(&self, channel: &ID<Channel>) -> Result<(), LobbyError> {
        let mut active = self.active.write().await;
        if !active.insert(channel.clone()) {
            return Err(LobbyError::AlreadyActive(channel.clone()));
        }
        log::debug!("[registry] claimed {} ({} running)", channel, active.len());
        self.publish(active.len());
        Ok(())
    }
    /// Releases `channel`. Releasing an idle channel does nothing.
    pub async fn stop(&self, channel: &ID<Channel>) {
        let mut active = self.active.write().await;
        if active.remove(channel) {
            log::debug!("[registry] released {} ({} running)", channel, active.len());
            self.publish(active.len());
        }
    }
    pub async fn is_active(&self, channel: &ID<Channel>) -> bool {
        self.active.read().await.contains(channel)
    }
    pub async fn count(&self) -> usize {
        self.active.read().await.len()
    }
    /// Active channels in id order.
    pub async fn channels(&self) -> Vec<ID<Channel>> {
        let mut channels = self.active.read().await.iter().cloned().collect::<Vec<_>>();
        channels.sort();
        channels
    }
    fn publish(&self, count: usize) {
        let statuses = self.statuses.get_or_init(|| {
            let (tx, mut rx) = unbounded_channel::<String>();
            let transport = self.transport.clone();
            tokio::spawn(async move {
                while let Some(status) = rx.recv().await {
                    if let Err(e) = transport.set_status(&status).await {
                        log::warn!("[registry] status update failed: {}", e);
                    }
                }
            });
            tx
        });
        if statuses.send(presence(count)).is_err() {
            log::warn!("[registry] status task is gone");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qr_gameroom::transports::Recorder;
    use qr_gameroom::*;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicU64;
    use std::sync::atomic::Ordering;
    use std::time::Duration;
    use tokio::sync::mpsc::Sender;

    /// Transport whose status updates get faster with every call.
    #[derive(Default)]
    struct Sluggish {
        calls: AtomicU64,
        statuses: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl Transport for Sluggish {
        async fn send_text(&self, _: &ID<Channel>, _: &str) -> anyhow::Result<()> {
            Ok(())
        }
        async fn send_image(&self, _: &ID<Channel>, _: &str) -> anyhow::Result<()> {
            Ok(())
        }
        async fn send_embed(&self, _: &ID<Channel>, _: Embed) -> anyhow::Result<()> {
            Ok(())
        }
        async fn subscribe(&self, _: &ID<Channel>, _: Sender<Inbound>) -> anyhow::Result<Subscription> {
            Ok(Subscription::detached())
        }
        async fn set_status(&self, status: &str) -> anyhow::Result<()> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(100 - 10 * call.min(9))).await;
            self.statuses.lock().unwrap().push(status.to_string());
            Ok(())
        }
        async fn is_private(&self, _: &ID<Channel>) -> anyhow::Result<bool> {
            Ok(false)
        }
    }

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn presence_wording() {
        assert_eq!(presence(0), "");
        assert_eq!(presence(1), "1 quiz");
        assert_eq!(presence(3), "3 quizzes");
    }
    #[tokio::test]
    async fn second_start_is_refused() {
        let (recorder, _mailbox) = Recorder::new();
        let registry = Registry::new(Arc::new(recorder));
        let channel = ID::from("c");
        assert!(registry.try_start(&channel).await.is_ok());
        assert_eq!(
            registry.try_start(&channel).await,
            Err(LobbyError::AlreadyActive(channel.clone()))
        );
        assert!(registry.is_active(&channel).await);
        assert_eq!(registry.count().await, 1);
    }
    #[tokio::test]
    async fn stop_is_idempotent() {
        let (recorder, _mailbox) = Recorder::new();
        let registry = Registry::new(Arc::new(recorder));
        let channel = ID::from("c");
        registry.try_start(&channel).await.unwrap();
        registry.stop(&channel).await;
        registry.stop(&channel).await;
        assert!(!registry.is_active(&channel).await);
        assert!(registry.try_start(&channel).await.is_ok());
    }
    #[tokio::test]
    async fn status_follows_the_count() {
        let (recorder, _mailbox) = Recorder::new();
        let recorder = Arc::new(recorder);
        let registry = Registry::new(recorder.clone());
        registry.try_start(&ID::from("b")).await.unwrap();
        registry.try_start(&ID::from("a")).await.unwrap();
        settle().await;
        assert!(recorder.statuses().contains(&"2 quizzes".to_string()));
        assert_eq!(registry.channels().await, vec![ID::from("a"), ID::from("b")]);
        registry.stop(&ID::from("a")).await;
        registry.stop(&ID::from("b")).await;
        settle().await;
        assert_eq!(recorder.statuses(), vec!["1 quiz", "2 quizzes", "1 quiz", ""]);
    }
    #[tokio::test(start_paused = true)]
    async fn statuses_arrive_in_change_order() {
        let transport = Arc::new(Sluggish::default());
        let registry = Registry::new(transport.clone());
        for channel in ["a", "b", "c"] {
            registry.try_start(&ID::from(channel)).await.unwrap();
        }
        registry.stop(&ID::from("b")).await;
        registry.stop(&ID::from("a")).await;
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(
            *transport.statuses.lock().unwrap(),
            vec!["1 quiz", "2 quizzes", "3 quizzes", "2 quizzes", "1 quiz"]
        );
    }
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_starts_admit_exactly_one() {
        let (recorder, _mailbox) = Recorder::new();
        let registry = Arc::new(Registry::new(Arc::new(recorder)));
        let channel = ID::<Channel>::from("c");
        let starts = (0..32)
            .map(|_| {
                let registry = registry.clone();
                let channel = channel.clone();
                tokio::spawn(async move { registry.try_start(&channel).await })
            })
            .collect::<Vec<_>>();
        let mut admitted = 0;
        for start in starts {
            if start.await.unwrap().is_ok() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 1);
        assert_eq!(registry.count().await, 1);
        assert_eq!(registry.channels().await, vec![channel]);
    }
}
