use super::*;
use qr_cards::*;
use qr_core::*;
use qr_gameroom::*;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Starts, stops and describes quiz sessions.
///
/// Owns the registry of active channels, the review store and the handles
/// of running rooms. A room's cleanup task stores its review deck, drops
/// its handle and releases the channel, in that order.
pub struct Lobby {
    transport: Arc<dyn Transport>,
    decks: Arc<dyn Decks>,
    pool: Arc<ScramblePool>,
    registry: Registry,
    reviews: Reviews,
    rooms: RwLock<HashMap<ID<Channel>, RoomHandle>>,
    output: RwLock<Option<ID<Channel>>>,
    owner: Option<ID<Member>>,
}

impl Lobby {
    pub fn new(transport: Arc<dyn Transport>, decks: Arc<dyn Decks>) -> Self {
        Self {
            registry: Registry::new(transport.clone()),
            transport,
            decks,
            pool: Arc::new(ScramblePool::default()),
            reviews: Reviews::new(),
            rooms: RwLock::new(HashMap::new()),
            output: RwLock::new(None),
            owner: None,
        }
    }
    /// Dictionary used by scramble sessions.
    pub fn with_pool(mut self, pool: Arc<ScramblePool>) -> Self {
        self.pool = pool;
        self
    }
    /// Member allowed to use privileged commands.
    pub fn with_owner(mut self, owner: ID<Member>) -> Self {
        self.owner = Some(owner);
        self
    }
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
    pub fn reviews(&self) -> &Reviews {
        &self.reviews
    }
}

impl Lobby {
    /// Claims the channel and spawns a room for `plan`.
    pub async fn start(self: &Arc<Self>, plan: Plan) -> Result<(), LobbyError> {
        let channel = plan.channel.clone();
        if let Mode::Gauntlet { .. } = plan.mode {
            self.require_private(&channel).await?;
        }
        self.registry.try_start(&channel).await?;
        let Some(source) = self.source(&plan).await else {
            log::info!("[lobby] no deck '{}' for {}", plan.deck, channel);
            self.registry.stop(&channel).await;
            self.say(&channel, &Protocol::not_found(&plan.deck)).await;
            return Err(LobbyError::DeckNotFound(plan.deck));
        };
        let RoomChannels {
            handle,
            stop,
            done_tx,
            done_rx,
        } = RoomHandle::pair(channel.clone());
        let output = self.output.read().await.clone();
        log::info!("[lobby] opening {} room in {}", plan.mode, channel);
        let room = Room::new(plan, source, self.transport.clone(), stop).with_broadcast(output);
        self.rooms.write().await.insert(channel.clone(), handle);
        tokio::spawn(room.run(done_tx));
        let lobby = self.clone();
        tokio::spawn(async move {
            match done_rx.await {
                Ok(outcome) => lobby.finish(outcome).await,
                Err(_) => {
                    log::error!("[lobby] room {} vanished without an outcome", channel);
                    lobby.close(&channel).await;
                    lobby.registry.stop(&channel).await;
                }
            }
        });
        Ok(())
    }
    /// Asks the channel's room to stop. False when nothing is running.
    pub async fn stop(&self, channel: &ID<Channel>) -> bool {
        self.rooms
            .read()
            .await
            .get(channel)
            .map(RoomHandle::stop)
            .unwrap_or(false)
    }
    /// Summary of a deck. Review decks are described without consuming them.
    pub async fn info(&self, channel: &ID<Channel>, name: &str) -> Result<Embed, LobbyError> {
        let deck = match name == REVIEW {
            true => self.reviews.peek(channel).await,
            false => self.decks.load(name, false),
        };
        match deck.is_empty() {
            true => Err(LobbyError::DeckNotFound(name.to_string())),
            false => Ok(Protocol::info(name, &deck)),
        }
    }
    pub fn list(&self) -> Vec<String> {
        let mut names = self.decks.names();
        names.sort();
        names
    }
    /// Re-reads the deck listing and returns the decks now on offer.
    pub fn reload(&self) -> anyhow::Result<Vec<String>> {
        self.decks.reload()?;
        let names = self.list();
        log::info!("[lobby] reloaded {} quizzes", names.len());
        Ok(names)
    }
    pub async fn ongoing(&self) -> Vec<ID<Channel>> {
        self.registry.channels().await
    }
    /// Channel that hears about new unlimited gauntlet scores.
    pub async fn set_output(&self, channel: &ID<Channel>) {
        log::info!("[lobby] gauntlet output set to {}", channel);
        *self.output.write().await = Some(channel.clone());
    }
    pub async fn output(&self) -> Option<ID<Channel>> {
        self.output.read().await.clone()
    }
    /// Carries out a chat command, replying in `channel`.
    pub async fn handle(self: &Arc<Self>, channel: &ID<Channel>, author: &ID<Member>, command: Command) {
        if command.is_privileged() && self.owner.as_ref() != Some(author) {
            return self.say(channel, &Protocol::owner_only(author)).await;
        }
        if let Some(plan) = command.plan(channel, author) {
            if let Err(e) = self.start(plan).await {
                log::debug!("[lobby] not starting in {}: {}", channel, e);
            }
            return;
        }
        match command {
            Command::Stop => {
                self.stop(channel).await;
            }
            Command::List => self.say(channel, &Protocol::listing(&self.list())).await,
            Command::Help => self.show(channel, Protocol::help(&self.list())).await,
            Command::Reload => match self.reload() {
                Ok(names) => self.say(channel, &Protocol::listing(&names)).await,
                Err(e) => {
                    log::warn!("[lobby] reload failed: {}", e);
                    self.say(channel, Protocol::reload_failed()).await
                }
            },
            Command::Info { deck: None } => self.say(channel, Protocol::no_quiz()).await,
            Command::Info { deck: Some(name) } => match self.info(channel, &name).await {
                Ok(embed) => self.show(channel, embed).await,
                Err(e) => self.say(channel, &format!("Error: {}", e)).await,
            },
            Command::Ongoing => {
                let ongoing = self.ongoing().await;
                self.say(channel, &Protocol::ongoing(&ongoing)).await
            }
            Command::Output => {
                self.set_output(channel).await;
                self.say(channel, Protocol::output_set()).await
            }
            Command::Quiz { .. }
            | Command::Multi { .. }
            | Command::Scramble { .. }
            | Command::Gauntlet { .. } => {}
        }
    }
}

impl Lobby {
    async fn source(&self, plan: &Plan) -> Option<Source> {
        let deck = match plan.mode {
            Mode::Scramble { .. } => {
                return (!self.pool.is_empty()).then(|| Source::Pool(self.pool.clone()));
            }
            mode if mode.keeps_failures() && plan.is_review() => {
                self.reviews.take_and_shuffle(&plan.channel).await
            }
            mode => self.decks.load(&plan.deck, mode.shuffles()),
        };
        (!deck.is_empty()).then_some(Source::Deck(deck))
    }
    async fn require_private(&self, channel: &ID<Channel>) -> Result<(), LobbyError> {
        match self.transport.is_private(channel).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                self.say(channel, &Protocol::private_only()).await;
                Err(LobbyError::NotPrivate(channel.clone()))
            }
            Err(e) => {
                log::error!("[lobby] checking {}: {}", channel, e);
                Err(LobbyError::NotPrivate(channel.clone()))
            }
        }
    }
    async fn finish(&self, outcome: Outcome) {
        let channel = outcome.channel;
        if let Some(review) = outcome.review {
            self.reviews.put(&channel, review).await;
        }
        self.close(&channel).await;
        self.registry.stop(&channel).await;
        log::info!("[lobby] room {} cleaned up ({})", channel, outcome.ending);
    }
    async fn close(&self, channel: &ID<Channel>) {
        self.rooms.write().await.remove(channel);
    }
    async fn say(&self, channel: &ID<Channel>, text: &str) {
        if let Err(e) = self.transport.send_text(channel, text).await {
            log::warn!("[lobby] send to {} failed: {}", channel, e);
        }
    }
    async fn show(&self, channel: &ID<Channel>, embed: Embed) {
        if let Err(e) = self.transport.send_embed(channel, embed).await {
            log::warn!("[lobby] embed to {} failed: {}", channel, e);
        }
    }
}
