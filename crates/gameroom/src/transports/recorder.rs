use crate::*;
use qr_core::*;
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use tokio::sync::mpsc::Sender;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;

/// Something a room said.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text(String),
    Image(String),
    Embed(Embed),
}

impl Sent {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) | Self::Image(text) => Some(text),
            Self::Embed(_) => None,
        }
    }
    pub fn embed(&self) -> Option<&Embed> {
        match self {
            Self::Embed(embed) => Some(embed),
            _ => None,
        }
    }
}

/// In-process transport that records what rooms send and lets callers
/// inject chat messages as if participants had typed them.
pub struct Recorder {
    outbox: UnboundedSender<(ID<Channel>, Sent)>,
    relays: Arc<Mutex<HashMap<ID<Channel>, Sender<Inbound>>>>,
    private: HashSet<ID<Channel>>,
    status: Mutex<Vec<String>>,
    broken: AtomicBool,
}

/// Receiving end of everything a [`Recorder`] was asked to send.
pub struct Mailbox {
    inbox: UnboundedReceiver<(ID<Channel>, Sent)>,
}

impl Mailbox {
    /// Waits for the next outgoing message on any channel.
    pub async fn next(&mut self) -> Option<(ID<Channel>, Sent)> {
        self.inbox.recv().await
    }
    /// Waits for the next outgoing message and drops the channel.
    pub async fn sent(&mut self) -> Option<Sent> {
        self.next().await.map(|(_, sent)| sent)
    }
    /// Waits for the next embed, skipping plain messages.
    pub async fn embed(&mut self) -> Option<Embed> {
        loop {
            if let Sent::Embed(embed) = self.sent().await? {
                return Some(embed);
            }
        }
    }
    /// Whatever was sent already, without waiting.
    pub fn pending(&mut self) -> Vec<(ID<Channel>, Sent)> {
        std::iter::from_fn(|| self.inbox.try_recv().ok()).collect()
    }
}

impl Recorder {
    pub fn new() -> (Self, Mailbox) {
        let (outbox, inbox) = unbounded_channel();
        let recorder = Self {
            outbox,
            relays: Arc::new(Mutex::new(HashMap::new())),
            private: HashSet::new(),
            status: Mutex::new(Vec::new()),
            broken: AtomicBool::new(false),
        };
        (recorder, Mailbox { inbox })
    }
    /// Marks `channel` as a one-to-one conversation.
    pub fn private<C>(mut self, channel: C) -> Self
    where
        C: Into<ID<Channel>>,
    {
        self.private.insert(channel.into());
        self
    }
    /// Makes every send fail from now on (or work again).
    pub fn break_sends(&self, broken: bool) {
        self.broken.store(broken, Ordering::SeqCst);
    }
    /// Delivers a message to whoever is subscribed to `channel`.
    /// Returns false when nobody is listening.
    pub async fn say<C, A>(&self, channel: C, author: A, text: &str) -> bool
    where
        C: Into<ID<Channel>>,
        A: Into<ID<Member>>,
    {
        let relay = self
            .relays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&channel.into())
            .cloned();
        match relay {
            Some(relay) => relay.send(Inbound::new(author, text)).await.is_ok(),
            None => false,
        }
    }
    pub fn is_subscribed(&self, channel: &ID<Channel>) -> bool {
        self.relays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(channel)
    }
    /// Every presence status published so far.
    pub fn statuses(&self) -> Vec<String> {
        self.status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
    fn record(&self, channel: &ID<Channel>, sent: Sent) -> anyhow::Result<()> {
        if self.broken.load(Ordering::SeqCst) {
            anyhow::bail!("transport unavailable");
        }
        self.outbox
            .send((channel.clone(), sent))
            .map_err(|_| anyhow::anyhow!("mailbox closed"))
    }
}

#[async_trait::async_trait]
impl Transport for Recorder {
    async fn send_text(&self, channel: &ID<Channel>, text: &str) -> anyhow::Result<()> {
        self.record(channel, Sent::Text(text.to_string()))
    }
    async fn send_image(&self, channel: &ID<Channel>, text: &str) -> anyhow::Result<()> {
        self.record(channel, Sent::Image(text.to_string()))
    }
    async fn send_embed(&self, channel: &ID<Channel>, embed: Embed) -> anyhow::Result<()> {
        self.record(channel, Sent::Embed(embed))
    }
    async fn subscribe(
        &self,
        channel: &ID<Channel>,
        relay: Sender<Inbound>,
    ) -> anyhow::Result<Subscription> {
        self.relays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(channel.clone(), relay);
        let relays = self.relays.clone();
        let channel = channel.clone();
        Ok(Subscription::new(move || {
            relays
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&channel);
        }))
    }
    async fn set_status(&self, status: &str) -> anyhow::Result<()> {
        self.status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(status.to_string());
        Ok(())
    }
    async fn is_private(&self, channel: &ID<Channel>) -> anyhow::Result<bool> {
        Ok(self.private.contains(channel))
    }
}
