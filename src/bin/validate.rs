//! Deck Checker Binary
//!
//! Reports duplicate questions, duplicate answers and empty answer sets.
//!
//! Options: --listing, --folder, --fix, [names...]

use clap::Parser;
use colored::Colorize;
use quizroom::cards::*;
use quizroom::console::Checks;
use quizroom::*;

fn main() -> anyhow::Result<()> {
    log()?;
    let checks = Checks::parse();
    let library = Library::open(&checks.listing, &checks.folder)?;
    let names = match checks.names.is_empty() {
        true => library.names(),
        false => checks.names,
    };
    for (name, findings) in library.validate(&names, checks.fix) {
        match findings.is_empty() {
            true => println!("{} {}", "ok".green(), name),
            false => findings
                .iter()
                .for_each(|finding| println!("{} {}: {}", "!!".red(), name, finding)),
        }
    }
    Ok(())
}
