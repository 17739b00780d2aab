use super::*;
use clap::Parser;
use colored::Colorize;
use qr_cards::*;
use qr_core::*;
use qr_gameroom::*;
use qr_hosting::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc::Sender;

/// Terminal-backed transport.
pub struct Console {
    relays: Arc<Mutex<HashMap<ID<Channel>, Sender<Inbound>>>>,
    private: bool,
}

impl Console {
    pub fn new(private: bool) -> Self {
        Self {
            relays: Arc::new(Mutex::new(HashMap::new())),
            private,
        }
    }
    /// Reads stdin until EOF, feeding the lobby and any running room.
    pub async fn run() -> anyhow::Result<()> {
        let args = Args::parse();
        let console = Arc::new(Self::new(!args.public));
        let library = Library::open(&args.listing, &args.folder)?;
        let pool = match args.dictionary {
            Some(ref path) => ScramblePool::load(path)?,
            None => ScramblePool::default(),
        };
        let player = ID::<Member>::from(args.name.as_str());
        let lobby = Lobby::new(console.clone(), Arc::new(library))
            .with_pool(Arc::new(pool))
            .with_owner(player.clone());
        let lobby = Arc::new(lobby);
        let channel = ID::<Channel>::from("console");
        log::info!("entering console as {}", player);
        println!("{}", Protocol::listing(&lobby.list()).dimmed());
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            match line.trim() {
                "quit" | "exit" => break,
                "" => continue,
                _ => {}
            }
            if let Some(command) = Command::parse(&line) {
                lobby.handle(&channel, &player, command).await;
            }
            console.relay(&channel, Inbound::new(player.clone(), line)).await;
        }
        Ok(())
    }
    /// Forwards a typed line to the room subscribed to `channel`, if any.
    pub async fn relay(&self, channel: &ID<Channel>, inbound: Inbound) {
        let relay = self
            .relays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(channel)
            .cloned();
        if let Some(relay) = relay {
            if relay.send(inbound).await.is_err() {
                log::debug!("room in {} stopped listening", channel);
            }
        }
    }
    fn render(embed: &Embed) -> String {
        let mut lines = vec![format!("{}", embed.title.bold())];
        if !embed.description.is_empty() {
            lines.push(embed.description.replace("**", ""));
        }
        for field in &embed.fields {
            lines.push(format!("{}", field.name.underline()));
            lines.push(field.value.trim_end().to_string());
        }
        if let Some(footer) = &embed.footer {
            lines.push(format!("{}", footer.dimmed()));
        }
        lines.join("\n")
    }
}

#[async_trait::async_trait]
impl Transport for Console {
    async fn send_text(&self, _: &ID<Channel>, text: &str) -> anyhow::Result<()> {
        println!("{}", text.trim_matches('`'));
        Ok(())
    }
    async fn send_image(&self, _: &ID<Channel>, text: &str) -> anyhow::Result<()> {
        println!("\n    {}\n", text.bold().yellow());
        Ok(())
    }
    async fn send_embed(&self, _: &ID<Channel>, embed: Embed) -> anyhow::Result<()> {
        let text = Self::render(&embed);
        match embed.color {
            COLOR_CORRECT | COLOR_SCOREBOARD => println!("{}", text.green()),
            COLOR_TIMEOUT => println!("{}", text.red()),
            _ => println!("{}", text),
        }
        Ok(())
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
        log::info!("status: {}", if status.is_empty() { "idle" } else { status });
        Ok(())
    }
    async fn is_private(&self, _: &ID<Channel>) -> anyhow::Result<bool> {
        Ok(self.private)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn embeds_render_fields_in_order() {
        colored::control::set_override(false);
        let embed = Embed::new("Final Quiz Scoreboard: n5", COLOR_SCOREBOARD)
            .description("**a, b**")
            .field("Winner", "<@p>: 3 points\n")
            .footer("Q1");
        assert_eq!(
            Console::render(&embed),
            "Final Quiz Scoreboard: n5\na, b\nWinner\n<@p>: 3 points\nQ1"
        );
    }
    #[tokio::test]
    async fn relays_to_subscribed_rooms_only() {
        let console = Console::new(true);
        let channel = ID::<Channel>::from("console");
        let (tx, mut rx) = tokio::sync::mpsc::channel(4);
        console.relay(&channel, Inbound::new("p", "lost")).await;
        let subscription = console.subscribe(&channel, tx).await.unwrap();
        console.relay(&channel, Inbound::new("p", "kept")).await;
        assert_eq!(rx.recv().await.unwrap().text, "kept");
        subscription.close();
        console.relay(&channel, Inbound::new("p", "gone")).await;
        assert!(rx.try_recv().is_err());
        assert!(console.is_private(&channel).await.unwrap());
    }
}
