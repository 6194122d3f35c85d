//! Cached, paced, retrying GET pipeline shared by every client operation.
//!
//! [`Fetcher::fetch`] consults the [`ResponseCache`] first. On a miss it runs the
//! [`RetryState`] machine: each attempt waits on the shared [`RateLimiter`], attaches the
//! resolved credential, and classifies the response. Successful bodies are written back to
//! the cache before they are returned.

pub mod metrics;
pub mod paginate;
pub mod rate_limit;
pub mod retry;

pub use metrics::*;
pub use paginate::*;
pub use rate_limit::*;
pub use retry::*;

// crates.io
use tracing::warn;
// self
use crate::{
	_prelude::*,
	auth::{ApiToken, CredentialResolver},
	cache::ResponseCache,
	config::ClientConfig,
	error::{CacheError, ConfigError},
	http::{HttpRequest, HttpTransport},
	obs::{self, FetchOutcome, FetchSpan},
};

/// Owns the transport, cache, pacing state, and credential resolver for one client.
pub struct Fetcher<T = Arc<dyn HttpTransport>>
where
	T: HttpTransport,
{
	transport: T,
	cache: ResponseCache,
	limiter: RateLimiter,
	policy: RetryPolicy,
	credentials: Arc<CredentialResolver>,
	auth_scheme: String,
	request_timeout: Duration,
	page_size: u32,
	metrics: Arc<FetchMetrics>,
}
impl<T> Fetcher<T>
where
	T: HttpTransport,
{
	/// Builds a fetcher from a validated configuration.
	pub fn new(
		transport: T,
		config: &ClientConfig,
		credentials: Arc<CredentialResolver>,
	) -> Result<Self, ConfigError> {
		config.validate()?;

		Ok(Self {
			transport,
			cache: ResponseCache::new(&config.cache_dir, config.cache_ttl),
			limiter: RateLimiter::new(config.min_request_interval),
			policy: RetryPolicy::new(config.max_attempts, config.backoff_base),
			credentials,
			auth_scheme: config.auth_scheme.trim().to_owned(),
			request_timeout: config.request_timeout,
			page_size: config.page_size,
			metrics: Default::default(),
		})
	}

	/// Fetches `url` and decodes its JSON body.
	///
	/// Returns `Ok(None)` when the attempt budget runs out on rate limiting. With `use_cache`
	/// a fresh cache entry short-circuits the network and a successful body is stored.
	pub async fn fetch(&self, url: &Url, use_cache: bool) -> Result<Option<Value>> {
		let span = FetchSpan::new("fetch", url);

		span.instrument(self.fetch_inner(url, use_cache)).await
	}

	/// Starts a lazy traversal of the list endpoint at `url`.
	pub fn paginate(&self, url: Url) -> PageCursor<'_, T> {
		PageCursor::new(self, url)
	}

	/// Fetches every page of the list endpoint at `url` and concatenates the items.
	pub async fn fetch_all<P>(&self, url: Url, progress: P) -> Result<Vec<Value>>
	where
		P: FnMut(usize, usize),
	{
		let span = FetchSpan::new("fetch_all", &url);

		span.instrument(self.paginate(url).collect(self.page_size, progress)).await
	}

	/// Deletes every cached response; returns how many entries were removed.
	pub fn clear_cache(&self) -> Result<usize, CacheError> {
		self.cache.clear()
	}

	/// Counters for this fetcher.
	pub fn metrics(&self) -> Arc<FetchMetrics> {
		self.metrics.clone()
	}

	/// Response cache used by this fetcher.
	pub fn cache(&self) -> &ResponseCache {
		&self.cache
	}

	/// Credential resolver consulted before each request.
	pub fn credentials(&self) -> &Arc<CredentialResolver> {
		&self.credentials
	}

	/// Configured list page size.
	pub fn page_size(&self) -> u32 {
		self.page_size
	}

	async fn fetch_inner(&self, url: &Url, use_cache: bool) -> Result<Option<Value>> {
		if use_cache {
			if let Some(payload) = self.cache.read(url) {
				self.metrics.record_cache_hit();
				obs::record_fetch_outcome(FetchOutcome::CacheHit);

				return Ok(Some(payload));
			}

			self.metrics.record_cache_miss();
		}

		let payload = match self.fetch_network(url).await {
			Ok(Some(payload)) => payload,
			Ok(None) => {
				obs::record_fetch_outcome(FetchOutcome::Exhausted);

				return Ok(None);
			},
			Err(e) => {
				obs::record_fetch_outcome(FetchOutcome::Failure);

				return Err(e);
			},
		};

		if use_cache {
			if let Err(e) = self.cache.write(url, &payload) {
				warn!(%url, error = %e, "Failed to cache response.");
			}
		}

		Ok(Some(payload))
	}

	async fn fetch_network(&self, url: &Url) -> Result<Option<Value>> {
		let mut state = RetryState::Attempting { attempt: 0 };

		loop {
			state = match state {
				RetryState::Attempting { attempt } => {
					let outcome = self.attempt(url).await;

					self.policy.advance(attempt, outcome)
				},
				RetryState::BackoffWait { attempt, delay } => {
					warn!(
						%url,
						attempt = attempt + 1,
						max_attempts = self.policy.max_attempts(),
						delay_ms = delay.as_millis() as u64,
						"Request failed; backing off."
					);
					self.metrics.record_retry();
					obs::record_fetch_outcome(FetchOutcome::Retry);
					tokio::time::sleep(delay).await;

					RetryState::Attempting { attempt: attempt + 1 }
				},
				RetryState::Success(value) => return Ok(Some(value)),
				RetryState::ExhaustedNoResult => {
					warn!(%url, "Still rate limited after the last attempt; giving up.");

					return Ok(None);
				},
				RetryState::TerminalError(e) => return Err(e),
			};
		}
	}

	async fn attempt(&self, url: &Url) -> AttemptOutcome {
		let token = self.token().await;

		self.limiter.acquire().await;

		let request = self.request(url, token);

		self.metrics.record_network_request();
		obs::record_fetch_outcome(FetchOutcome::Network);

		let outcome = AttemptOutcome::classify(url, self.transport.get(request).await);

		if let AttemptOutcome::RateLimited { retry_after: Some(hint) } = &outcome {
			warn!(%url, retry_after_ms = hint.as_millis() as u64, "Server asked to slow down.");
		}

		outcome
	}

	/// Resolves the credential, moving the first lookup (keychain and file IO) onto the
	/// blocking pool.
	async fn token(&self) -> Option<ApiToken> {
		if self.credentials.is_resolved() {
			return self.credentials.resolve();
		}

		let credentials = self.credentials.clone();

		match tokio::task::spawn_blocking(move || credentials.resolve()).await {
			Ok(token) => token,
			Err(e) => {
				warn!(error = %e, "Credential lookup failed; sending the request anonymously.");

				None
			},
		}
	}

	fn request(&self, url: &Url, token: Option<ApiToken>) -> HttpRequest {
		let request = HttpRequest::new(url.clone(), self.request_timeout)
			.with_header("Accept", "application/json");

		match token {
			Some(token) =>
				request.with_header("Authorization", token.header_value(&self.auth_scheme)),
			None => request,
		}
	}
}
impl<T> Debug for Fetcher<T>
where
	T: HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Fetcher")
			.field("cache", &self.cache)
			.field("limiter", &self.limiter)
			.field("policy", &self.policy)
			.field("credentials", &self.credentials)
			.field("auth_scheme", &self.auth_scheme)
			.field("request_timeout", &self.request_timeout)
			.field("page_size", &self.page_size)
			.field("metrics", &self.metrics)
			.finish_non_exhaustive()
	}
}
