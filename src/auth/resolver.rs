//! Memoizing credential resolver and the save path that prefers the secret store.
//!
//! The resolver owns the memo so each [`L10nClient`](crate::L10nClient) instance, and each
//! test, gets independent state. A confirmed absence is memoized too, which keeps slow
//! secret-store lookups off the request path after the first miss.

// std
use std::{
	fs::{self, OpenOptions},
	io::Write,
};
// crates.io
use tracing::debug;
// self
use crate::{
	_prelude::*,
	auth::{
		ApiToken, CredentialBackend, CredentialError, CredentialSource, EnvSource, FileSource,
		SecretStore, SecretStoreSource, SourceOutcome, platform_secret_store,
	},
	config::CredentialConfig,
};

#[derive(Clone, Debug)]
enum Memo {
	Unresolved,
	Present(ApiToken),
	Absent,
}

/// Resolves the API token from an ordered source chain and memoizes the outcome.
pub struct CredentialResolver {
	sources: Vec<Box<dyn CredentialSource>>,
	secret_store: Arc<dyn SecretStore>,
	token_file: PathBuf,
	memo: RwLock<Memo>,
}
impl CredentialResolver {
	/// Creates a resolver over explicit sources. `secret_store` and `token_file` are the
	/// targets used by [`save`](Self::save).
	pub fn new(
		sources: Vec<Box<dyn CredentialSource>>,
		secret_store: Arc<dyn SecretStore>,
		token_file: impl Into<PathBuf>,
	) -> Self {
		Self {
			sources,
			secret_store,
			token_file: token_file.into(),
			memo: RwLock::new(Memo::Unresolved),
		}
	}

	/// Builds the standard chain: environment, then `secret_store`, then the token file.
	pub fn from_config(config: &CredentialConfig, secret_store: Arc<dyn SecretStore>) -> Self {
		let sources: Vec<Box<dyn CredentialSource>> = vec![
			Box::new(EnvSource::new(config.env_vars.iter().cloned())),
			Box::new(SecretStoreSource::new(secret_store.clone())),
			Box::new(FileSource::new(&config.token_file)),
		];

		Self::new(sources, secret_store, &config.token_file)
	}

	/// Builds the standard chain backed by the platform secret store.
	pub fn platform(config: &CredentialConfig) -> Self {
		Self::from_config(config, platform_secret_store(config))
	}

	/// Returns the token, consulting sources only on the first call.
	pub fn resolve(&self) -> Option<ApiToken> {
		if let Some(memoized) = self.memoized() {
			return memoized;
		}

		let resolved = self.walk_sources();
		let mut memo = self.memo.write();

		// A concurrent resolve or save may have landed first; keep its value.
		if matches!(*memo, Memo::Unresolved) {
			*memo = match &resolved {
				Some(token) => Memo::Present(token.clone()),
				None => Memo::Absent,
			};

			return resolved;
		}

		match &*memo {
			Memo::Present(token) => Some(token.clone()),
			_ => None,
		}
	}

	/// Returns `true` when a token is available.
	pub fn has_value(&self) -> bool {
		self.resolve().is_some()
	}

	/// Returns `true` once resolution (or a save) has populated the memo.
	pub fn is_resolved(&self) -> bool {
		!matches!(*self.memo.read(), Memo::Unresolved)
	}

	/// Persists `token` to the secret store, falling back to an owner-only plaintext file.
	///
	/// The memo is updated before either backend is tried, so the running process uses the
	/// new token even when both writes fail.
	pub fn save(&self, token: &str) -> Result<CredentialBackend, CredentialError> {
		let token = ApiToken::new(token).ok_or(CredentialError::EmptyToken)?;

		*self.memo.write() = Memo::Present(token.clone());

		match self.secret_store.store(token.expose()) {
			Ok(()) => {
				debug!(store = self.secret_store.name(), "Saved API token to the secret store.");

				Ok(CredentialBackend::SecretStore)
			},
			Err(e) => {
				debug!(
					store = self.secret_store.name(),
					error = %e,
					"Secret store rejected the API token; falling back to the token file."
				);

				write_token_file(&self.token_file, token.expose())?;

				Ok(CredentialBackend::File)
			},
		}
	}

	fn memoized(&self) -> Option<Option<ApiToken>> {
		match &*self.memo.read() {
			Memo::Unresolved => None,
			Memo::Present(token) => Some(Some(token.clone())),
			Memo::Absent => Some(None),
		}
	}

	fn walk_sources(&self) -> Option<ApiToken> {
		for source in &self.sources {
			match source.lookup() {
				SourceOutcome::Present(token) => {
					debug!(source = source.name(), "Resolved API token.");

					return Some(token);
				},
				SourceOutcome::Absent => {
					debug!(source = source.name(), "Credential source has no token.");
				},
				SourceOutcome::Failed(reason) => {
					debug!(source = source.name(), %reason, "Credential source failed.");
				},
			}
		}

		debug!("No API token configured; requests will be anonymous.");

		None
	}
}
impl Debug for CredentialResolver {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialResolver")
			.field("sources", &self.sources.iter().map(|s| s.name()).collect::<Vec<_>>())
			.field("secret_store", &self.secret_store.name())
			.field("token_file", &self.token_file)
			.field("resolved", &self.is_resolved())
			.finish()
	}
}

fn write_token_file(path: &Path, token: &str) -> Result<(), CredentialError> {
	let map_io = |source| CredentialError::File { path: path.to_path_buf(), source };

	if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
		fs::create_dir_all(parent).map_err(map_io)?;
	}

	let mut options = OpenOptions::new();

	options.write(true).create(true).truncate(true);

	#[cfg(unix)]
	{
		use std::os::unix::fs::OpenOptionsExt;

		options.mode(0o600);
	}

	let mut file = options.open(path).map_err(map_io)?;

	// `mode` only applies on creation; tighten files that already existed.
	#[cfg(unix)]
	{
		use std::os::unix::fs::PermissionsExt;

		file.set_permissions(fs::Permissions::from_mode(0o600)).map_err(map_io)?;
	}

	file.write_all(token.as_bytes()).map_err(map_io)?;
	file.sync_all().map_err(map_io)
}
