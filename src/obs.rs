//! Observability helpers for the fetch pipeline.
//!
//! - Every fetch runs inside a `fedora_l10n.fetch` span carrying the `operation` and `url`
//!   fields (see [`FetchSpan`]).
//! - Enable the `metrics` feature to increment the `fedora_l10n_fetch_total` counter, labeled
//!   by `outcome`, through the globally installed recorder.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded by the fetcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FetchOutcome {
	/// Served from a fresh cache entry.
	CacheHit,
	/// One network request was issued.
	Network,
	/// A failed attempt was scheduled for another try.
	Retry,
	/// Attempt budget ran out on rate limiting; the caller got no result.
	Exhausted,
	/// An error was propagated to the caller.
	Failure,
}
impl FetchOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FetchOutcome::CacheHit => "cache_hit",
			FetchOutcome::Network => "network",
			FetchOutcome::Retry => "retry",
			FetchOutcome::Exhausted => "exhausted",
			FetchOutcome::Failure => "failure",
		}
	}
}
impl Display for FetchOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
