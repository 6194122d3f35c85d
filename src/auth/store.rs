//! Platform secret-store contract and built-in backends.

// self
use crate::{_prelude::*, config::CredentialConfig};

/// Secret-store backend holding at most one API token.
///
/// Implementations report a missing item as `Ok(None)`; every other failure is an error the
/// resolver downgrades to "no value".
pub trait SecretStore
where
	Self: Send + Sync,
{
	/// Stable label used in logs.
	fn name(&self) -> &'static str;

	/// Reads the stored token, if any.
	fn load(&self) -> Result<Option<String>, CredentialError>;

	/// Stores or replaces the token.
	fn store(&self, token: &str) -> Result<(), CredentialError>;
}

/// Error type produced by secret stores and
/// [`CredentialResolver::save`](crate::auth::CredentialResolver::save).
#[derive(Debug, ThisError)]
pub enum CredentialError {
	/// Token was blank after trimming.
	#[error("API token must not be empty.")]
	EmptyToken,
	/// No secret store is compiled in or reachable.
	#[error("No secret store is available.")]
	Unavailable,
	/// Secret store rejected the operation.
	#[error("Secret store `{store}` failed: {message}.")]
	SecretStore {
		/// Backend label.
		store: &'static str,
		/// Human-readable error payload.
		message: String,
	},
	/// Plaintext token file could not be read or written.
	#[error("Token file {} is not accessible.", path.display())]
	File {
		/// Token file path.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
}

/// Backend that accepted a saved token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialBackend {
	/// Platform secret store.
	SecretStore,
	/// Owner-only plaintext file.
	File,
}

/// OS keychain backend: macOS Keychain, Windows Credential Manager, or on Linux the Secret
/// Service collection fronted by the keyutils session cache.
#[cfg(feature = "keyring")]
#[derive(Clone, Debug)]
pub struct KeyringStore {
	service: String,
	account: String,
}
#[cfg(feature = "keyring")]
impl KeyringStore {
	const NAME: &'static str = "keyring";

	/// Targets the item identified by `service` + `account`.
	pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
		Self { service: service.into(), account: account.into() }
	}

	fn entry(&self) -> Result<keyring::Entry, CredentialError> {
		keyring::Entry::new(&self.service, &self.account).map_err(Self::map_error)
	}

	fn map_error(e: keyring::Error) -> CredentialError {
		CredentialError::SecretStore { store: Self::NAME, message: e.to_string() }
	}
}
#[cfg(feature = "keyring")]
impl SecretStore for KeyringStore {
	fn name(&self) -> &'static str {
		Self::NAME
	}

	fn load(&self) -> Result<Option<String>, CredentialError> {
		match self.entry()?.get_password() {
			Ok(secret) => Ok(Some(secret)),
			Err(keyring::Error::NoEntry) => Ok(None),
			Err(e) => Err(Self::map_error(e)),
		}
	}

	fn store(&self, token: &str) -> Result<(), CredentialError> {
		self.entry()?.set_password(token).map_err(Self::map_error)
	}
}

/// Placeholder used when no platform store is available; reads find nothing and writes fail.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSecretStore;
impl SecretStore for NoSecretStore {
	fn name(&self) -> &'static str {
		"none"
	}

	fn load(&self) -> Result<Option<String>, CredentialError> {
		Ok(None)
	}

	fn store(&self, _token: &str) -> Result<(), CredentialError> {
		Err(CredentialError::Unavailable)
	}
}

/// Thread-safe in-process secret store for local development and tests.
#[derive(Clone, Debug, Default)]
pub struct MemorySecretStore(Arc<RwLock<Option<String>>>);
impl MemorySecretStore {
	/// Creates a store pre-seeded with a token.
	pub fn with_token(token: impl Into<String>) -> Self {
		Self(Arc::new(RwLock::new(Some(token.into()))))
	}

	/// Returns the currently stored value.
	pub fn current(&self) -> Option<String> {
		self.0.read().clone()
	}
}
impl SecretStore for MemorySecretStore {
	fn name(&self) -> &'static str {
		"memory"
	}

	fn load(&self) -> Result<Option<String>, CredentialError> {
		Ok(self.current())
	}

	fn store(&self, token: &str) -> Result<(), CredentialError> {
		*self.0.write() = Some(token.to_owned());

		Ok(())
	}
}

/// Builds the platform secret store for the configured service + account.
pub fn platform_secret_store(config: &CredentialConfig) -> Arc<dyn SecretStore> {
	#[cfg(feature = "keyring")]
	{
		Arc::new(KeyringStore::new(&config.secret_service, &config.secret_account))
	}
	#[cfg(not(feature = "keyring"))]
	{
		let _ = config;

		Arc::new(NoSecretStore)
	}
}
