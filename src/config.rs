//! Client configuration: endpoints, cache placement, pacing, retry budget, and credential
//! sources.
//!
//! [`ClientConfig::default`] reproduces the production settings for
//! `translate.fedoraproject.org`. Every field can be overridden through the `with_*`
//! setters, and [`ClientConfig::validate`] rejects combinations the fetcher cannot honor.

// std
use std::env;
// self
use crate::{_prelude::*, error::ConfigError};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://translate.fedoraproject.org/api";
/// Directory name used under the per-user cache and config roots.
pub const APP_DIR_NAME: &str = "fedora-l10n";
/// Environment variables consulted for the API token, in priority order.
pub const DEFAULT_TOKEN_ENV_VARS: [&str; 2] = ["WEBLATE_API_KEY", "FEDORA_WEBLATE_KEY"];
/// Secret-store service identifier.
pub const DEFAULT_SECRET_SERVICE: &str = "se.danielnylander.fedora-l10n";
/// Secret-store account (attribute) name.
pub const DEFAULT_SECRET_ACCOUNT: &str = "weblate-api-key";

/// Tunables for [`L10nClient`](crate::L10nClient) and the fetcher beneath it.
#[derive(Clone, Debug)]
pub struct ClientConfig {
	/// API root every endpoint path is appended to.
	pub base_url: Url,
	/// Directory holding one JSON file per cached URL.
	pub cache_dir: PathBuf,
	/// Maximum age of a usable cache entry.
	pub cache_ttl: Duration,
	/// Minimum spacing between the starts of two network requests.
	pub min_request_interval: Duration,
	/// Base of the exponential backoff (`base * 2^attempt`).
	pub backoff_base: Duration,
	/// Total number of network attempts per fetch.
	pub max_attempts: u32,
	/// Per-request timeout.
	pub request_timeout: Duration,
	/// `page_size` query value for list endpoints.
	pub page_size: u32,
	/// Authorization header scheme placed before the token.
	pub auth_scheme: String,
	/// `User-Agent` header value.
	pub user_agent: String,
	/// Where the API token is looked up and saved.
	pub credential: CredentialConfig,
}
impl ClientConfig {
	const CACHE_TTL: Duration = Duration::from_secs(3600);
	const MAX_ATTEMPTS: u32 = 5;
	const PACING: Duration = Duration::from_millis(600);
	const PAGE_SIZE: u32 = 50;
	const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

	/// Overrides the API root.
	pub fn with_base_url(mut self, base_url: Url) -> Self {
		self.base_url = base_url;

		self
	}

	/// Parses and overrides the API root.
	pub fn with_base_url_str(self, base_url: &str) -> Result<Self, ConfigError> {
		let url = Url::parse(base_url).map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		Ok(self.with_base_url(url))
	}

	/// Overrides the cache directory.
	pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.cache_dir = dir.into();

		self
	}

	/// Overrides the cache TTL (defaults to one hour).
	pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
		self.cache_ttl = ttl;

		self
	}

	/// Overrides the minimum request spacing (defaults to 600 ms).
	pub fn with_min_request_interval(mut self, interval: Duration) -> Self {
		self.min_request_interval = interval;

		self
	}

	/// Overrides the backoff base (defaults to 600 ms).
	pub fn with_backoff_base(mut self, base: Duration) -> Self {
		self.backoff_base = base;

		self
	}

	/// Overrides the attempt budget (defaults to 5).
	pub fn with_max_attempts(mut self, attempts: u32) -> Self {
		self.max_attempts = attempts;

		self
	}

	/// Overrides the per-request timeout (defaults to 30 seconds).
	pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;

		self
	}

	/// Overrides the list page size (defaults to 50).
	pub fn with_page_size(mut self, page_size: u32) -> Self {
		self.page_size = page_size;

		self
	}

	/// Overrides the authorization scheme (defaults to `Token`).
	pub fn with_auth_scheme(mut self, scheme: impl Into<String>) -> Self {
		self.auth_scheme = scheme.into();

		self
	}

	/// Overrides the credential source settings.
	pub fn with_credential(mut self, credential: CredentialConfig) -> Self {
		self.credential = credential;

		self
	}

	/// Checks invariants the fetcher relies on.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.base_url.cannot_be_a_base() {
			return Err(ConfigError::CannotBeABase { url: self.base_url.to_string() });
		}
		if self.max_attempts == 0 {
			return Err(ConfigError::ZeroAttempts);
		}
		if self.page_size == 0 {
			return Err(ConfigError::ZeroPageSize);
		}
		if self.auth_scheme.trim().is_empty() {
			return Err(ConfigError::EmptyAuthScheme);
		}

		Ok(())
	}
}
impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			base_url: Url::parse(DEFAULT_BASE_URL).expect("Default base URL must parse."),
			cache_dir: user_dir(dirs::cache_dir()),
			cache_ttl: Self::CACHE_TTL,
			min_request_interval: Self::PACING,
			backoff_base: Self::PACING,
			max_attempts: Self::MAX_ATTEMPTS,
			request_timeout: Self::REQUEST_TIMEOUT,
			page_size: Self::PAGE_SIZE,
			auth_scheme: "Token".into(),
			user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).into(),
			credential: CredentialConfig::default(),
		}
	}
}

/// Credential source settings consumed by the resolver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CredentialConfig {
	/// Environment variables checked in order; the first non-empty value wins.
	pub env_vars: Vec<String>,
	/// Secret-store service identifier.
	pub secret_service: String,
	/// Secret-store account name.
	pub secret_account: String,
	/// Plaintext fallback file holding the raw token.
	pub token_file: PathBuf,
}
impl CredentialConfig {
	/// Overrides the environment variable names.
	pub fn with_env_vars<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.env_vars = names.into_iter().map(Into::into).collect();

		self
	}

	/// Overrides the plaintext token file location.
	pub fn with_token_file(mut self, path: impl Into<PathBuf>) -> Self {
		self.token_file = path.into();

		self
	}
}
impl Default for CredentialConfig {
	fn default() -> Self {
		Self {
			env_vars: DEFAULT_TOKEN_ENV_VARS.iter().map(|name| (*name).to_owned()).collect(),
			secret_service: DEFAULT_SECRET_SERVICE.into(),
			secret_account: DEFAULT_SECRET_ACCOUNT.into(),
			token_file: user_dir(dirs::config_dir()).join("api-key"),
		}
	}
}

/// Returns the two-letter language code of the user's locale, `en` when unknown.
///
/// Checks `LC_ALL`, `LC_MESSAGES`, then `LANG`, the same order the C library uses.
pub fn detect_language() -> String {
	let locale = ["LC_ALL", "LC_MESSAGES", "LANG"]
		.iter()
		.filter_map(|name| env::var(name).ok())
		.find(|value| !value.trim().is_empty());

	locale.as_deref().and_then(language_from_locale).unwrap_or_else(|| "en".into())
}

fn language_from_locale(locale: &str) -> Option<String> {
	let lang = locale.split(['_', '.', '@']).next()?.trim();

	if lang.is_empty() || lang.eq_ignore_ascii_case("c") || lang.eq_ignore_ascii_case("posix") {
		return None;
	}

	Some(lang.to_ascii_lowercase())
}

fn user_dir(root: Option<PathBuf>) -> PathBuf {
	root.unwrap_or_else(env::temp_dir).join(APP_DIR_NAME)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_match_production_settings() {
		let config = ClientConfig::default();

		assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
		assert_eq!(config.cache_ttl, Duration::from_secs(3600));
		assert_eq!(config.min_request_interval, Duration::from_millis(600));
		assert_eq!(config.backoff_base, Duration::from_millis(600));
		assert_eq!(config.max_attempts, 5);
		assert_eq!(config.page_size, 50);
		assert_eq!(config.auth_scheme, "Token");
		assert!(config.cache_dir.ends_with(APP_DIR_NAME));
		assert!(config.credential.token_file.ends_with("fedora-l10n/api-key"));
		assert_eq!(config.credential.env_vars, ["WEBLATE_API_KEY", "FEDORA_WEBLATE_KEY"]);
		config.validate().expect("Default configuration should validate.");
	}

	#[test]
	fn validate_rejects_unusable_values() {
		let zero_attempts = ClientConfig::default().with_max_attempts(0);
		let zero_page = ClientConfig::default().with_page_size(0);
		let blank_scheme = ClientConfig::default().with_auth_scheme("  ");
		let mailto = Url::parse("mailto:l10n@example.org").expect("Fixture URL should parse.");
		let not_a_base = ClientConfig::default().with_base_url(mailto);

		assert!(matches!(zero_attempts.validate(), Err(ConfigError::ZeroAttempts)));
		assert!(matches!(zero_page.validate(), Err(ConfigError::ZeroPageSize)));
		assert!(matches!(blank_scheme.validate(), Err(ConfigError::EmptyAuthScheme)));
		assert!(matches!(not_a_base.validate(), Err(ConfigError::CannotBeABase { .. })));
	}

	#[test]
	fn base_url_str_reports_parse_failures() {
		let err = ClientConfig::default()
			.with_base_url_str("not a url")
			.expect_err("Unparsable base URL should be rejected.");

		assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
	}

	#[test]
	fn locale_strings_reduce_to_language_codes() {
		assert_eq!(language_from_locale("sv_SE.UTF-8").as_deref(), Some("sv"));
		assert_eq!(language_from_locale("pt_BR").as_deref(), Some("pt"));
		assert_eq!(language_from_locale("de@euro").as_deref(), Some("de"));
		assert_eq!(language_from_locale("C.UTF-8"), None);
		assert_eq!(language_from_locale("POSIX"), None);
		assert_eq!(language_from_locale(""), None);
	}
}
