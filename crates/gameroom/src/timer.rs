use std::time::Duration;
use tokio::time::Instant;

/// Deadline tracking for rounds and gauntlet sessions.
///
/// Re-arming replaces the deadline outright; time left on the previous
/// deadline is never carried over.
#[derive(Debug, Default)]
pub struct Timer {
    deadline: Option<Instant>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn start(&mut self, duration: Duration) {
        self.deadline = Some(Instant::now() + duration);
    }
    /// Fires on the next poll.
    pub fn expire(&mut self) {
        self.deadline = Some(Instant::now());
    }
    pub fn clear(&mut self) {
        self.deadline = None;
    }
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
    /// Resolves at the deadline; never resolves while cleared.
    pub async fn wait(&self) {
        match self.deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    }
}
