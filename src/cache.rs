//! File-per-URL JSON response cache with time-to-live expiry.
//!
//! Each URL maps to `<dir>/<key>.json`, where `<key>` is the first 16 hex characters of the
//! SHA-256 digest of the full URL. Entries are replaced whole through a uniquely named temp
//! file and a rename, so readers never observe a half-written entry from this process.
//! Anything unreadable, unparsable, or expired is a miss rather than an error.

mod entry;

pub use entry::*;

// std
use std::{
	fs::{self, File},
	io::{ErrorKind, Write},
};
// crates.io
use sha2::{Digest, Sha256};
use tracing::debug;
// self
use crate::{_prelude::*, error::CacheError};

const KEY_LEN: usize = 8;
const ENTRY_EXTENSION: &str = "json";

/// Disk cache rooted at one directory.
#[derive(Clone, Debug)]
pub struct ResponseCache {
	dir: PathBuf,
	ttl: Duration,
}
impl ResponseCache {
	/// Creates a cache over `dir`; the directory is created lazily on first write.
	pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
		Self { dir: dir.into(), ttl }
	}

	/// Cache directory.
	pub fn dir(&self) -> &Path {
		&self.dir
	}

	/// Maximum age of a usable entry.
	pub fn ttl(&self) -> Duration {
		self.ttl
	}

	/// Derives the file stem used for `url`.
	pub fn key(url: &Url) -> String {
		Sha256::digest(url.as_str().as_bytes())
			.iter()
			.take(KEY_LEN)
			.map(|byte| format!("{byte:02x}"))
			.collect()
	}

	/// Path of the entry file for `url`.
	pub fn entry_path(&self, url: &Url) -> PathBuf {
		self.dir.join(format!("{}.{ENTRY_EXTENSION}", Self::key(url)))
	}

	/// Returns the cached payload for `url` when a fresh entry exists.
	pub fn read(&self, url: &Url) -> Option<Value> {
		let path = self.entry_path(url);
		let bytes = match fs::read(&path) {
			Ok(bytes) => bytes,
			Err(e) if e.kind() == ErrorKind::NotFound => {
				debug!(%url, "Cache miss.");

				return None;
			},
			Err(e) => {
				debug!(%url, path = %path.display(), error = %e, "Cache entry is unreadable.");

				return None;
			},
		};
		let entry = match serde_json::from_slice::<CacheEntry>(&bytes) {
			Ok(entry) => entry,
			Err(e) => {
				debug!(%url, path = %path.display(), error = %e, "Cache entry is corrupt.");

				return None;
			},
		};

		if !entry.is_fresh(self.ttl) {
			debug!(%url, "Cache entry expired.");

			return None;
		}

		debug!(%url, "Cache hit.");

		Some(entry.payload)
	}

	/// Stores `payload` as the entry for `url`, replacing any previous entry.
	pub fn write(&self, url: &Url, payload: &Value) -> Result<(), CacheError> {
		fs::create_dir_all(&self.dir).map_err(|e| CacheError::io(&self.dir, e))?;

		let serialized = serde_json::to_vec(&CacheEntry::new(payload.clone()))?;
		let path = self.entry_path(url);
		let tmp_name = format!(".{}.{:016x}.tmp", Self::key(url), rand::random::<u64>());
		let tmp_path = self.dir.join(tmp_name);

		if let Err(e) = write_synced(&tmp_path, &serialized) {
			let _ = fs::remove_file(&tmp_path);

			return Err(CacheError::io(tmp_path, e));
		}

		fs::rename(&tmp_path, &path).map_err(|e| {
			let _ = fs::remove_file(&tmp_path);

			CacheError::io(&path, e)
		})
	}

	/// Deletes every entry file and returns how many were removed.
	///
	/// A missing directory counts as an empty cache.
	pub fn clear(&self) -> Result<usize, CacheError> {
		let entries = match fs::read_dir(&self.dir) {
			Ok(entries) => entries,
			Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
			Err(e) => return Err(CacheError::io(&self.dir, e)),
		};
		let mut removed = 0;

		for entry in entries {
			let path = entry.map_err(|e| CacheError::io(&self.dir, e))?.path();

			if path.extension().is_none_or(|ext| ext != ENTRY_EXTENSION) || !path.is_file() {
				continue;
			}

			match fs::remove_file(&path) {
				Ok(()) => removed += 1,
				// Another clear got there first.
				Err(e) if e.kind() == ErrorKind::NotFound => {},
				Err(e) => return Err(CacheError::io(path, e)),
			}
		}

		debug!(dir = %self.dir.display(), removed, "Cleared response cache.");

		Ok(removed)
	}
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
	let mut file = File::create(path)?;

	file.write_all(bytes)?;
	file.sync_all()
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	use tempfile::TempDir;
	// self
	use super::{entry::unix_now, *};

	fn url(path: &str) -> Url {
		Url::parse("https://translate.example.org/api/")
			.and_then(|base| base.join(path))
			.expect("Fixture URL should parse.")
	}

	#[test]
	fn keys_are_short_stable_hex_digests() {
		let a = ResponseCache::key(&url("projects/?page_size=50"));
		let b = ResponseCache::key(&url("projects/?page_size=50"));
		let c = ResponseCache::key(&url("projects/?page_size=20"));

		assert_eq!(a.len(), 16);
		assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
		assert_eq!(a, b);
		assert_ne!(a, c);
	}

	#[test]
	fn write_then_read_returns_payload_and_leaves_no_temp_files() {
		let dir = TempDir::new().expect("Failed to create temp directory.");
		let cache = ResponseCache::new(dir.path().join("fedora-l10n"), Duration::from_secs(60));
		let target = url("projects/anaconda/statistics/");
		let payload = json!({ "translated_percent": 87.5 });

		cache.write(&target, &payload).expect("Cache write should succeed.");

		assert_eq!(cache.read(&target), Some(payload));

		let files: Vec<_> = fs::read_dir(cache.dir())
			.expect("Cache directory should exist.")
			.map(|entry| entry.expect("Directory entry should be readable.").file_name())
			.collect();

		assert_eq!(files.len(), 1);
		assert_eq!(files[0].to_string_lossy(), format!("{}.json", ResponseCache::key(&target)));
	}

	#[test]
	fn expired_and_corrupt_entries_are_misses() {
		let dir = TempDir::new().expect("Failed to create temp directory.");
		let cache = ResponseCache::new(dir.path(), Duration::from_secs(60));
		let stale = url("projects/stale/statistics/");
		let corrupt = url("projects/corrupt/statistics/");
		let old = CacheEntry { timestamp: unix_now() - 120., payload: json!({ "old": true }) };

		fs::write(
			cache.entry_path(&stale),
			serde_json::to_vec(&old).expect("Cache entry should serialize."),
		)
		.expect("Failed to seed stale entry.");
		fs::write(cache.entry_path(&corrupt), b"{\"timestamp\": 1").expect("Failed to seed entry.");

		assert_eq!(cache.read(&stale), None);
		assert_eq!(cache.read(&corrupt), None);
		assert_eq!(cache.read(&url("projects/never-written/")), None);
	}

	#[test]
	fn clear_counts_entries_and_ignores_other_files() {
		let dir = TempDir::new().expect("Failed to create temp directory.");
		let cache = ResponseCache::new(dir.path().join("cache"), Duration::from_secs(60));

		assert_eq!(cache.clear().expect("Clearing a missing directory should succeed."), 0);

		cache.write(&url("projects/"), &json!([])).expect("Cache write should succeed.");
		cache.write(&url("projects/a/"), &json!({})).expect("Cache write should succeed.");
		fs::write(cache.dir().join("notes.txt"), "keep").expect("Failed to write unrelated file.");

		assert_eq!(cache.clear().expect("Clear should succeed."), 2);
		assert_eq!(cache.read(&url("projects/")), None);
		assert!(cache.dir().join("notes.txt").exists());
	}
}
