use super::*;
use qr_cards::Deck;
use qr_core::*;
use std::time::Duration;

const CHECK_MARK: &str = "✅";
const NO_ENTRY: &str = "⛔";
const NO_ENTRY_SIGN: &str = "🚫";
const STOPWATCH: &str = "⏱";
const INFO: &str = "ℹ";
const OWNER_ONLY: &str = "オーナーさんに　ちょうせん　なんて　10000こうねん　はやいんだよ！　";

/// Renders session events into chat messages.
/// Centralizes wording so rooms and the lobby only decide *when* to speak.
pub struct Protocol;

impl Protocol {
    /// Opening announcement for a round-based session.
    pub fn intro(plan: &Plan, questions: usize, description: &str, limit: Points) -> String {
        let pause = plan.speed.pause().as_secs();
        let (kind, goal) = match plan.mode {
            Mode::Multi => ("MULTI quiz", format!("First to {} points wins.", limit)),
            Mode::Sequential { .. } => ("quiz", format!("Type {}stop to give up.", COMMAND_PREFIX)),
            _ => ("quiz", format!("First to {} points wins.", limit)),
        };
        format!(
            "```Starting new {} {} ({} questions) in {} seconds:\n\"{}\"\n{}```",
            plan.title(),
            kind,
            questions,
            pause,
            description,
            goal
        )
    }
    /// Opening announcement for a gauntlet.
    pub fn gauntlet_intro(name: &str, questions: usize, description: &str, clock: Duration) -> String {
        format!(
            "```Starting new {} quiz ({} questions) in {} seconds:\n\"{}\"\nAnswer as many as you can within {} seconds.```",
            name,
            questions,
            GAUNTLET_WARMUP.as_secs(),
            description,
            clock.as_secs()
        )
    }
    pub fn timed_out(round: &Round) -> Embed {
        let embed = Embed::new(format!("{} Timed out! {}", NO_ENTRY, round.title), COLOR_TIMEOUT)
            .description(Self::answers(round));
        Self::comment(embed, round)
    }
    /// Result of a scored round. `index` numbers sequential rounds.
    pub fn correct(
        round: &Round,
        name: &str,
        limit: Points,
        index: Option<Index>,
        standings: &Standings,
    ) -> Embed {
        let title = match index {
            Some(i) => format!("{} #{} Correct: {}", CHECK_MARK, i, round.title),
            None => format!("{} Correct: {}", CHECK_MARK, round.title),
        };
        let scorers = match round.is_tally() {
            true => round
                .awards()
                .iter()
                .map(|(m, p)| {
                    format!(
                        "{} +{} ({}p): {}\n",
                        m.mention(),
                        p,
                        standings.get(m),
                        round.given(m).join(", ")
                    )
                })
                .collect::<String>(),
            false => round
                .awards()
                .iter()
                .map(|(m, _)| format!("{} {}p", m.mention(), standings.get(m)))
                .collect::<Vec<_>>()
                .join(", "),
        };
        let embed = Embed::new(title, COLOR_CORRECT)
            .description(Self::answers(round))
            .field(
                format!("Scorers - {} to {}", name, limit),
                truncate(&scorers, FIELD_LIMIT),
            );
        Self::comment(embed, round)
    }
    pub fn abandoned() -> &'static str {
        "```Too many timeouts in a row reached, aborting quiz.```"
    }
    pub fn not_found(name: &str) -> String {
        format!("Failed to find valid quiz: {}", name)
    }
    pub fn private_only() -> String {
        format!("{} Game mode `{}gauntlet` is only for DM!", NO_ENTRY_SIGN, COMMAND_PREFIX)
    }
    pub fn gauntlet_score(name: &str, score: f64, seconds: u64, mistakes: &str) -> Embed {
        Embed::new(format!("Final Gauntlet Score: {}", name), COLOR_SCOREBOARD)
            .description(format!("{:.2} points in {} seconds", score, seconds))
            .footer(format!("Mistakes: {}", mistakes))
    }
    pub fn gauntlet_broadcast(name: &str, host: &str, score: f64, seconds: u64) -> Embed {
        Embed::new(format!("{} New Gauntlet Score: {}", STOPWATCH, name), COLOR_BROADCAST)
            .description(format!("{}: {:.2} points in {} seconds", host, score, seconds))
    }
    /// Summary of a deck without starting it.
    pub fn info(name: &str, deck: &Deck) -> Embed {
        let kind = match deck.presentation {
            qr_cards::Presentation::Image => "default".to_string(),
            other => other.to_string(),
        };
        Embed::new(format!("{} Quiz Information: {}", INFO, name), COLOR_INFO).description(format!(
            "**Questions:** {}\n**Timeout:** {}s\n**Type:** {}\n**Description:** \"{}\"",
            deck.len(),
            deck.timeout_or(ROUND_TIMEOUT).as_secs(),
            kind,
            deck.description
        ))
    }
    pub fn listing(names: &[String]) -> String {
        format!(
            "Available quizzes: ```{}```\nUse `{}quiz <deck> [optional max score]` to start or `{}help` for more detailed information.",
            names.join(", "),
            COMMAND_PREFIX,
            COMMAND_PREFIX
        )
    }
    /// Command reference, with the decks currently on offer.
    pub fn help(names: &[String]) -> Embed {
        let p = COMMAND_PREFIX;
        Embed::new(format!("{} Kanji Quiz Bot", INFO), COLOR_INFO)
            .description("Compete with other users on kanji readings!")
            .field(
                "How to run a quiz round",
                format!(
                    "Type `{p}quiz <deck> [optional max score]` in a bot channel or by DM.\nUse `{p}stop` to cancel a running quiz.\nUse `{p}quiz <deck> <N>-` to play a deck in order from question N."
                ),
            )
            .field("Decks", truncate(&names.join(", "), FIELD_LIMIT))
            .field(
                "Alternative game modes",
                format!(
                    "`{p}mad/fast/quiz/mild/slow <deck>` for 0/1/2/3/5 second answer windows.\n`{p}multi <deck>` for scoring on multiple answers to the same question.\n`{p}flash <deck>` for no pause between questions.\n`{p}gauntlet <deck> [minutes]` in DM for a kanji time trial.\n`{p}scramble [easy/normal/hard/insane]` for an English Word Scramble quiz.\n`{p}info <deck>` for a description of the quiz."
                ),
            )
    }
    pub fn reload_failed() -> &'static str {
        "Error: Failed to load quiz list!"
    }
    /// Owner listing of channels with a session running.
    pub fn ongoing(channels: &[ID<Channel>]) -> String {
        let channels = channels
            .iter()
            .map(|c| format!("<#{}>", c))
            .collect::<Vec<_>>();
        format!("Ongoing quizzes: {}\n", channels.join(", "))
    }
    pub fn owner_only(member: &ID<Member>) -> String {
        format!("{}{}", OWNER_ONLY, member.mention())
    }
    pub fn output_set() -> &'static str {
        "Gauntlet Score output set to this channel."
    }
    pub fn no_quiz() -> &'static str {
        "No quiz specified!"
    }
    fn answers(round: &Round) -> String {
        format!("**{}**", truncate(&round.card.reveal(), DESCRIPTION_LIMIT))
    }
    fn comment(embed: Embed, round: &Round) -> Embed {
        match round.card.has_comment() {
            true => embed.field("Comment", truncate(&round.card.comment, FIELD_LIMIT)),
            false => embed,
        }
    }
}
