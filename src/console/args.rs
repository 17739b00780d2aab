use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play quizzes in the terminal", long_about = None)]
pub struct Args {
    /// JSON object mapping quiz names to deck files
    #[arg(long, default_value = "quizzes.json")]
    pub listing: PathBuf,
    /// Folder holding the deck files
    #[arg(long, default_value = "quizzes")]
    pub folder: PathBuf,
    /// Word list for scramble sessions, one word per line
    #[arg(long)]
    pub dictionary: Option<PathBuf>,
    /// Name shown on scoreboards
    #[arg(long, default_value = "player")]
    pub name: String,
    /// Treat the terminal as a shared channel (disables gauntlets)
    #[arg(long)]
    pub public: bool,
}

/// Arguments for the deck checker.
#[derive(Parser, Debug)]
#[command(author, version, about = "Find duplicate cards in quiz decks", long_about = None)]
pub struct Checks {
    #[arg(long, default_value = "quizzes.json")]
    pub listing: PathBuf,
    #[arg(long, default_value = "quizzes")]
    pub folder: PathBuf,
    /// Write a merged `<file>.fix` beside every faulty deck
    #[arg(long)]
    pub fix: bool,
    /// Decks to check; all listed decks when omitted
    pub names: Vec<String>,
}
