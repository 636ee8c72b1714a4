use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Shared expiry for every task of a sweep.
///
/// Clones observe the same instant and the same token. Expiry is purely
/// time based; [`Deadline::cancel`] stops a sweep early without counting as
/// a timeout, even when the instant passes before anyone checks.
#[derive(Debug, Clone)]
pub struct Deadline {
    expires_at: Instant,
    token: CancellationToken,
    cancelled_at: Arc<OnceLock<Instant>>,
}

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        Self::at(Instant::now() + budget)
    }

    pub fn at(expires_at: Instant) -> Self {
        Self {
            expires_at,
            token: CancellationToken::new(),
            cancelled_at: Arc::new(OnceLock::new()),
        }
    }

    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }

    /// The instant has passed.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Either expired or cancelled: no new work should start.
    pub fn is_done(&self) -> bool {
        self.is_cancelled() || self.is_expired()
    }

    /// Stops every task waiting on this deadline (e.g. on Ctrl-C).
    pub fn cancel(&self) {
        let _ = self.cancelled_at.set(Instant::now());
        self.token.cancel();
    }

    /// The instant passed before any manual cancel did.
    pub fn timed_out(&self) -> bool {
        match self.cancelled_at.get() {
            Some(at) if *at < self.expires_at => false,
            _ => self.is_expired(),
        }
    }

    /// Resolves once the deadline expires or is cancelled.
    pub async fn done(&self) {
        tokio::select! {
            _ = tokio::time::sleep_until(self.expires_at) => {}
            _ = self.token.cancelled() => {}
        }
    }
}
