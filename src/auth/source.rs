//! Credential source strategies consulted by the resolver in priority order.

// std
use std::{env, fs, io::ErrorKind};
// self
use crate::{
	_prelude::*,
	auth::{ApiToken, SecretStore},
};

/// Tagged result of asking one source for a token.
#[derive(Debug)]
pub enum SourceOutcome {
	/// Source produced a non-empty token.
	Present(ApiToken),
	/// Source has no value.
	Absent,
	/// Source failed; the resolver treats this exactly like [`SourceOutcome::Absent`].
	Failed(String),
}

/// One link of the credential chain.
pub trait CredentialSource
where
	Self: Send + Sync,
{
	/// Stable label used in logs.
	fn name(&self) -> &'static str;

	/// Looks up a token without ever failing the overall resolution.
	fn lookup(&self) -> SourceOutcome;
}

/// Reads the token from the first non-empty environment variable.
#[derive(Clone, Debug)]
pub struct EnvSource {
	names: Vec<String>,
}
impl EnvSource {
	/// Checks `names` in order.
	pub fn new<I, S>(names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self { names: names.into_iter().map(Into::into).collect() }
	}
}
impl CredentialSource for EnvSource {
	fn name(&self) -> &'static str {
		"env"
	}

	fn lookup(&self) -> SourceOutcome {
		self.names
			.iter()
			.filter_map(|name| env::var(name).ok())
			.find_map(ApiToken::new)
			.map_or(SourceOutcome::Absent, SourceOutcome::Present)
	}
}

/// Reads the token from a platform secret store.
#[derive(Clone)]
pub struct SecretStoreSource {
	store: Arc<dyn SecretStore>,
}
impl SecretStoreSource {
	/// Wraps a shared secret store.
	pub fn new(store: Arc<dyn SecretStore>) -> Self {
		Self { store }
	}
}
impl CredentialSource for SecretStoreSource {
	fn name(&self) -> &'static str {
		"secret_store"
	}

	fn lookup(&self) -> SourceOutcome {
		match self.store.load() {
			Ok(value) =>
				value.and_then(ApiToken::new).map_or(SourceOutcome::Absent, SourceOutcome::Present),
			Err(e) => SourceOutcome::Failed(e.to_string()),
		}
	}
}
impl Debug for SecretStoreSource {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SecretStoreSource").field("store", &self.store.name()).finish()
	}
}

/// Reads the token from a plaintext file; surrounding whitespace is ignored.
#[derive(Clone, Debug)]
pub struct FileSource {
	path: PathBuf,
}
impl FileSource {
	/// Reads from `path`.
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}
impl CredentialSource for FileSource {
	fn name(&self) -> &'static str {
		"file"
	}

	fn lookup(&self) -> SourceOutcome {
		match fs::read_to_string(&self.path) {
			Ok(contents) =>
				ApiToken::new(contents).map_or(SourceOutcome::Absent, SourceOutcome::Present),
			Err(e) if e.kind() == ErrorKind::NotFound => SourceOutcome::Absent,
			Err(e) => SourceOutcome::Failed(format!("Failed to read {}: {e}", self.path.display())),
		}
	}
}
