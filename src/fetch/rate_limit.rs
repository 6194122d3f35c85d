//! Minimum spacing between the starts of consecutive network requests.

// crates.io
use tokio::time::{self, Instant};
use tracing::debug;
// self
use crate::_prelude::*;

/// Verdict for the next request start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateLimitDecision {
	/// The request may start immediately.
	Allow,
	/// The request must wait this long first.
	Delay(Duration),
}

/// Shared pacing gate; one instance covers every URL fetched through its owner.
#[derive(Debug)]
pub struct RateLimiter {
	min_interval: Duration,
	last_start: AsyncMutex<Option<Instant>>,
}
impl RateLimiter {
	/// Creates a limiter enforcing `min_interval` between request starts.
	pub fn new(min_interval: Duration) -> Self {
		Self { min_interval, last_start: AsyncMutex::new(None) }
	}

	/// Configured spacing.
	pub fn min_interval(&self) -> Duration {
		self.min_interval
	}

	/// Decides whether a request starting at `now` must wait, given the previous start.
	pub fn decide(&self, last_start: Option<Instant>, now: Instant) -> RateLimitDecision {
		let Some(last_start) = last_start else {
			return RateLimitDecision::Allow;
		};
		let elapsed = now.saturating_duration_since(last_start);

		if elapsed >= self.min_interval {
			RateLimitDecision::Allow
		} else {
			RateLimitDecision::Delay(self.min_interval - elapsed)
		}
	}

	/// Waits for the next slot and stamps it as the latest request start.
	///
	/// The lock is held across the wait, so concurrent callers leave one at a time and each
	/// start is at least `min_interval` after the previous one.
	pub async fn acquire(&self) -> Instant {
		let mut last_start = self.last_start.lock().await;

		if let RateLimitDecision::Delay(wait) = self.decide(*last_start, Instant::now()) {
			debug!(wait_ms = wait.as_millis() as u64, "Pacing the next request.");

			time::sleep(wait).await;
		}

		let started = Instant::now();

		*last_start = Some(started);

		started
	}
}
