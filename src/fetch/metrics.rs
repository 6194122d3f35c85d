//! Lock-free counters describing cache and network activity of one fetcher.

// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for one fetcher.
#[derive(Debug, Default)]
pub struct FetchMetrics {
	network_requests: AtomicU64,
	cache_hits: AtomicU64,
	cache_misses: AtomicU64,
	retries: AtomicU64,
}
impl FetchMetrics {
	/// Returns the number of network requests issued, retries included.
	pub fn network_requests(&self) -> u64 {
		self.network_requests.load(Ordering::Relaxed)
	}

	/// Returns the number of fetches answered from the disk cache.
	pub fn cache_hits(&self) -> u64 {
		self.cache_hits.load(Ordering::Relaxed)
	}

	/// Returns the number of cache-eligible fetches that had to go to the network.
	pub fn cache_misses(&self) -> u64 {
		self.cache_misses.load(Ordering::Relaxed)
	}

	/// Returns the number of backoff waits taken before another attempt.
	pub fn retries(&self) -> u64 {
		self.retries.load(Ordering::Relaxed)
	}

	pub(crate) fn record_network_request(&self) {
		self.network_requests.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_cache_hit(&self) {
		self.cache_hits.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_cache_miss(&self) {
		self.cache_misses.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_retry(&self) {
		self.retries.fetch_add(1, Ordering::Relaxed);
	}
}
