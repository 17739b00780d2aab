use super::*;
use qr_cards::*;
use qr_core::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::oneshot;
use tokio::time::Instant;

/// Where a room's questions come from.
pub enum Source {
    Deck(Deck),
    Pool(Arc<ScramblePool>),
}

/// Round state machine. A room is idle until [`Room::run`] opens the
/// session, and ended once `run` has reported its [`Outcome`].
enum Phase {
    Presenting,
    Collecting(Round),
    Scoring(Round),
    Ending(Ending),
}

/// What a finished room reports to whoever spawned it.
#[derive(Debug)]
pub struct Outcome {
    pub channel: ID<Channel>,
    pub ending: Ending,
    /// Replacement review deck, for modes that keep failures.
    pub review: Option<Deck>,
    pub standings: Vec<(ID<Member>, Points)>,
    pub resume: Option<Index>,
}

/// One live quiz session bound to a channel.
///
/// Owns its working deck, scorekeepers and standings outright; nothing in
/// here is shared with other rooms. Everything that can happen during a
/// round (stop, timer, inbound answer) is multiplexed onto one loop.
pub struct Room {
    plan: Plan,
    deck: Deck,
    pool: Arc<ScramblePool>,
    order: Vec<usize>,
    transport: Arc<dyn Transport>,
    stop: UnboundedReceiver<()>,
    relay: Relay,
    timer: Timer,
    standings: Standings,
    ledger: Ledger,
    limit: Points,
    timeouts: usize,
    cursor: Index,
    gauntlet: Gauntlet,
    broadcast: Option<ID<Channel>>,
    rng: SmallRng,
}

impl Room {
    pub fn new(
        plan: Plan,
        source: Source,
        transport: Arc<dyn Transport>,
        stop: UnboundedReceiver<()>,
    ) -> Self {
        let (mut deck, pool) = match source {
            Source::Deck(deck) => (deck, Arc::new(ScramblePool::default())),
            Source::Pool(pool) => (Deck::new(SCRAMBLE_DESCRIPTION, Vec::new()), pool),
        };
        let cursor = match plan.mode {
            Mode::Sequential { offset } => deck.skip(offset),
            _ => 0,
        };
        let questions = match plan.mode {
            Mode::Scramble { .. } => pool.len(),
            _ => deck.len(),
        };
        Self {
            limit: plan.threshold(questions),
            cursor,
            plan,
            deck,
            pool,
            order: Vec::new(),
            transport,
            stop,
            relay: Relay::default(),
            timer: Timer::new(),
            standings: Standings::default(),
            ledger: Ledger::default(),
            timeouts: 0,
            gauntlet: Gauntlet::default(),
            broadcast: None,
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }
    /// Channel that hears about gauntlet results.
    pub fn with_broadcast(mut self, channel: Option<ID<Channel>>) -> Self {
        self.broadcast = channel;
        self
    }
    /// Seeds scramble word order.
    pub fn with_rng(mut self, rng: SmallRng) -> Self {
        self.rng = rng;
        self
    }
    pub fn channel(&self) -> &ID<Channel> {
        &self.plan.channel
    }
    pub fn limit(&self) -> Points {
        self.limit
    }
}

impl Room {
    pub async fn run(mut self, done: oneshot::Sender<Outcome>) {
        log::info!(
            "[room {}] starting {} session of {}",
            self.plan.channel,
            self.plan.mode,
            self.plan.title()
        );
        let subscription = self.open().await;
        let ending = match self.plan.mode {
            Mode::Gauntlet { .. } => self.gauntlet().await,
            _ => self.rounds().await,
        };
        log::info!("[room {}] session over: {}", self.plan.channel, ending);
        if let Some(subscription) = subscription {
            subscription.close();
        }
        tokio::time::sleep(SETTLE_DELAY).await;
        let outcome = match self.plan.mode {
            Mode::Gauntlet { .. } => self.score_gauntlet(ending).await,
            _ => self.scoreboard(ending).await,
        };
        let _ = done.send(outcome);
    }
    async fn open(&mut self) -> Option<Subscription> {
        let subscription = self
            .transport
            .subscribe(&self.plan.channel, self.relay.tx())
            .await
            .inspect_err(|e| log::error!("[room {}] subscribe failed: {}", self.plan.channel, e))
            .ok();
        let intro = match self.plan.mode {
            Mode::Gauntlet { .. } => Protocol::gauntlet_intro(
                self.plan.title(),
                self.deck.len(),
                &self.deck.description,
                self.plan.gauntlet_clock(),
            ),
            Mode::Scramble { .. } => {
                self.order = self.pool.order(&mut self.rng);
                Protocol::intro(&self.plan, self.pool.len(), &self.deck.description, self.limit)
            }
            _ => Protocol::intro(&self.plan, self.deck.len(), &self.deck.description, self.limit),
        };
        self.say(&intro).await;
        subscription
    }
}

impl Room {
    async fn rounds(&mut self) -> Ending {
        let mut phase = Phase::Presenting;
        loop {
            phase = match phase {
                Phase::Presenting => self.present().await,
                Phase::Collecting(round) => self.collect(round).await,
                Phase::Scoring(round) => self.score(round).await,
                Phase::Ending(ending) => return ending,
            };
        }
    }
    async fn present(&mut self) -> Phase {
        if self.exhausted() {
            return Phase::Ending(Ending::Exhausted);
        }
        tokio::time::sleep(self.plan.speed.pause()).await;
        if self.drain() {
            return self.halt(None);
        }
        let Some(round) = self.deal() else {
            return Phase::Ending(Ending::Exhausted);
        };
        log::debug!("[room {}] asking {}", self.plan.channel, round.label);
        self.ledger.record(round.label.clone());
        self.ask(&round.prompt).await;
        self.timer.start(self.round_timeout(&round));
        Phase::Collecting(round)
    }
    async fn collect(&mut self, mut round: Round) -> Phase {
        loop {
            tokio::select! {
                biased;
                _ = self.stop.recv() => return self.halt(Some(&round)),
                _ = self.timer.wait() => return self.expire(round).await,
                Some(inbound) = self.relay.rx().recv() => {
                    if inbound.is_stop() {
                        return self.halt(Some(&round));
                    }
                    self.judge(&mut round, &inbound);
                }
            }
        }
    }
    fn judge(&mut self, round: &mut Round, inbound: &Inbound) {
        if is_skip(&inbound.text) {
            log::debug!("[room {}] {} skipped", self.plan.channel, inbound.author);
            self.timer.expire();
            return;
        }
        let window = self.plan.speed.window();
        let verdict = round.offer(inbound, window);
        match verdict {
            Verdict::Ranked(1) | Verdict::Claimed(Claim::First, 0) => self.timer.start(window),
            _ => {}
        }
        if verdict.is_activity() {
            log::trace!("[room {}] {} -> {:?}", self.plan.channel, inbound, verdict);
            self.timeouts = 0;
        }
    }
    async fn expire(&mut self, round: Round) -> Phase {
        if round.is_scored() {
            return Phase::Scoring(round);
        }
        log::debug!("[room {}] {} timed out", self.plan.channel, round.label);
        self.show(Protocol::timed_out(&round)).await;
        self.ledger.fail(round.card);
        self.timeouts += 1;
        if self.timeouts >= TIMEOUT_LIMIT {
            log::info!("[room {}] {} timeouts in a row", self.plan.channel, self.timeouts);
            self.say(Protocol::abandoned()).await;
            if self.plan.is_review() {
                self.ledger.fold(self.deck.drain());
            }
            return Phase::Ending(Ending::Abandoned);
        }
        self.advance();
        Phase::Presenting
    }
    async fn score(&mut self, round: Round) -> Phase {
        for (member, points) in round.awards() {
            self.standings.add(&member, points);
        }
        let index = match self.plan.mode {
            Mode::Sequential { .. } => Some(self.cursor),
            _ => None,
        };
        let embed = Protocol::correct(&round, self.plan.title(), self.limit, index, &self.standings);
        self.show(embed).await;
        self.advance();
        match self.plan.mode.ends_on_win() && self.standings.reached(self.limit) {
            true => Phase::Ending(Ending::Won),
            false => Phase::Presenting,
        }
    }
    /// Stop requested. Review sessions keep everything not yet cleared.
    fn halt(&mut self, current: Option<&Round>) -> Phase {
        log::info!("[room {}] stop requested", self.plan.channel);
        if self.plan.is_review() {
            if let Some(round) = current.filter(|r| !r.is_scored()) {
                self.ledger.fold([round.card.clone()]);
            }
            self.ledger.fold(self.deck.drain());
        }
        Phase::Ending(Ending::Stopped)
    }
    /// Discards answers that arrived between rounds. Returns whether a
    /// stop was requested meanwhile.
    fn drain(&mut self) -> bool {
        let signalled = !matches!(self.stop.try_recv(), Err(TryRecvError::Empty));
        let drained = self.relay.drain();
        if !drained.is_empty() {
            log::trace!("[room {}] drained {} late messages", self.plan.channel, drained.len());
        }
        signalled || drained.iter().any(Inbound::is_stop)
    }
    fn deal(&mut self) -> Option<Round> {
        match self.plan.mode {
            Mode::Scramble { difficulty } => {
                while let Some(index) = self.order.pop() {
                    if let Some(puzzle) = self.pool.puzzle(index, difficulty, &mut self.rng) {
                        return Some(Round::puzzle(puzzle));
                    }
                }
                None
            }
            Mode::Sequential { .. } => self
                .deck
                .take_front()
                .map(|card| Round::deal(card, self.deck.presentation, false)),
            mode => self
                .deck
                .pop()
                .map(|card| Round::deal(card, self.deck.presentation, mode.is_multi())),
        }
    }
    fn exhausted(&self) -> bool {
        match self.plan.mode {
            Mode::Scramble { .. } => self.order.is_empty(),
            _ => self.deck.is_empty(),
        }
    }
    fn advance(&mut self) {
        if let Mode::Sequential { .. } = self.plan.mode {
            self.cursor += 1;
        }
    }
    fn round_timeout(&self, round: &Round) -> Duration {
        let base = self.plan.round_timeout(self.deck.timeout);
        match self.plan.mode {
            Mode::Multi => base + multi_bonus(round.card.answers.len()),
            _ => base,
        }
    }
    async fn scoreboard(&mut self, ending: Ending) -> Outcome {
        let keeps = self.plan.mode.keeps_failures();
        let resume = match self.plan.mode {
            Mode::Sequential { .. } if !self.deck.is_empty() => Some(self.cursor),
            _ => None,
        };
        let failed = if keeps { self.ledger.failed().len() } else { 0 };
        let board = Scoreboard::new(
            self.plan.title(),
            &self.standings,
            self.plan.podium_or_default(),
            self.limit,
        )
        .failed(failed)
        .resume(resume)
        .history(self.ledger.footer());
        self.show(board.embed()).await;
        let review = keeps.then(|| self.deck.with_cards(self.ledger.take_failed()));
        Outcome {
            channel: self.plan.channel.clone(),
            ending,
            review,
            standings: self.standings.ranking(),
            resume,
        }
    }
}

impl Room {
    /// Whole-session clock; each card is settled by the next message.
    async fn gauntlet(&mut self) -> Ending {
        tokio::time::sleep(GAUNTLET_WARMUP).await;
        let clock = self.plan.gauntlet_clock();
        let started = Instant::now();
        self.timer.start(clock);
        let ending = loop {
            let Some(card) = self.deck.pop() else {
                break Ending::Exhausted;
            };
            let mut round = Round::deal(card, self.deck.presentation, false);
            self.ask(&round.prompt).await;
            let ending = tokio::select! {
                biased;
                _ = self.stop.recv() => Some(Ending::Stopped),
                _ = self.timer.wait() => Some(Ending::Expired),
                Some(inbound) = self.relay.rx().recv() => match inbound.is_stop() {
                    true => Some(Ending::Stopped),
                    false => {
                        self.gauntlet.attempted += 1;
                        match round.offer(&inbound, Duration::ZERO) {
                            Verdict::Wrong => self.ledger.record(round.label.clone()),
                            _ => self.gauntlet.correct += 1,
                        }
                        None
                    }
                },
            };
            if let Some(ending) = ending {
                break ending;
            }
        };
        self.gauntlet.seconds = match ending {
            Ending::Expired => clock.as_secs(),
            _ => started.elapsed().as_secs(),
        };
        self.timer.clear();
        ending
    }
    async fn score_gauntlet(&mut self, ending: Ending) -> Outcome {
        let points = self.gauntlet.points();
        let seconds = self.gauntlet.seconds;
        log::info!(
            "[room {}] gauntlet {}/{} for {:.2} points",
            self.plan.channel,
            self.gauntlet.correct,
            self.gauntlet.attempted,
            points
        );
        let mistakes = self.ledger.footer();
        self.show(Protocol::gauntlet_score(self.plan.title(), points, seconds, &mistakes))
            .await;
        if let (Mode::Gauntlet { minutes: None }, Some(output)) = (self.plan.mode, &self.broadcast) {
            let host = self
                .plan
                .host
                .as_ref()
                .map(ID::mention)
                .unwrap_or_else(|| "Someone".to_string());
            let embed = Protocol::gauntlet_broadcast(self.plan.title(), &host, points, seconds);
            if let Err(e) = self.transport.send_embed(output, embed).await {
                log::warn!("[room {}] broadcast to {} failed: {}", self.plan.channel, output, e);
            }
        }
        Outcome {
            channel: self.plan.channel.clone(),
            ending,
            review: None,
            standings: Vec::new(),
            resume: None,
        }
    }
}

impl Room {
    async fn say(&self, text: &str) {
        if let Err(e) = self.transport.send_text(&self.plan.channel, text).await {
            log::warn!("[room {}] send failed: {}", self.plan.channel, e);
        }
    }
    async fn show(&self, embed: Embed) {
        if let Err(e) = self.transport.send_embed(&self.plan.channel, embed).await {
            log::warn!("[room {}] embed failed: {}", self.plan.channel, e);
        }
    }
    async fn ask(&self, prompt: &Prompt) {
        let sent = match prompt {
            Prompt::Text(text) => self.transport.send_text(&self.plan.channel, text).await,
            Prompt::Image(text) => self.transport.send_image(&self.plan.channel, text).await,
        };
        if let Err(e) = sent {
            log::warn!("[room {}] question failed: {}", self.plan.channel, e);
        }
    }
}
