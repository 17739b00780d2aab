//! Console Binary
//!
//! Plays quizzes in the terminal against a local deck library.
//!
//! Options: --listing, --folder, --dictionary, --name, --public

use quizroom::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    log()?;
    kys();
    console::Console::run().await
}
