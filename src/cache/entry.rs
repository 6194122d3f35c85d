// self
use crate::_prelude::*;

/// On-disk record wrapping one decoded response body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
	/// Write time in fractional UNIX seconds.
	pub timestamp: f64,
	/// Decoded response body, stored verbatim.
	pub payload: Value,
}
impl CacheEntry {
	/// Wraps `payload` with the current wall-clock time.
	pub fn new(payload: Value) -> Self {
		Self { timestamp: unix_now(), payload }
	}

	/// Returns `true` while the entry is younger than `ttl` at `now` (UNIX seconds).
	///
	/// Entries stamped in the future (clock skew) count as fresh.
	pub fn is_fresh_at(&self, now: f64, ttl: Duration) -> bool {
		now - self.timestamp < ttl.as_secs_f64()
	}

	/// Returns `true` while the entry is younger than `ttl`.
	pub fn is_fresh(&self, ttl: Duration) -> bool {
		self.is_fresh_at(unix_now(), ttl)
	}
}

pub(crate) fn unix_now() -> f64 {
	OffsetDateTime::now_utc().unix_timestamp_nanos() as f64 / 1_000_000_000.
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn freshness_is_strictly_bounded_by_ttl() {
		let entry = CacheEntry { timestamp: 1_000., payload: Value::Null };
		let ttl = Duration::from_secs(60);

		assert!(entry.is_fresh_at(1_000., ttl));
		assert!(entry.is_fresh_at(1_059.5, ttl));
		assert!(!entry.is_fresh_at(1_060., ttl));
		assert!(entry.is_fresh_at(900., ttl));
	}

	#[test]
	fn entries_use_the_documented_wire_shape() {
		let entry = CacheEntry { timestamp: 1_700_000_000.25, payload: serde_json::json!([1, 2]) };
		let encoded = serde_json::to_value(&entry).expect("Cache entry should serialize.");

		assert_eq!(
			encoded,
			serde_json::json!({ "timestamp": 1_700_000_000.25, "payload": [1, 2] })
		);
		assert!(CacheEntry::new(Value::Bool(true)).is_fresh(Duration::from_secs(1)));
	}
}
