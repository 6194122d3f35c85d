//! Query operations over the translation API.
//!
//! [`L10nClient`] builds endpoint URLs from the configured API root and delegates every
//! request to its [`Fetcher`], so caching, pacing, retries, and authentication apply
//! uniformly. Results are returned as decoded JSON, untouched.

mod coverage;

pub use coverage::*;

// crates.io
use tracing::{debug, warn};
// self
use crate::{
	_prelude::*,
	auth::{CredentialResolver, SecretStore},
	config::ClientConfig,
	error::ConfigError,
	fetch::{FetchMetrics, Fetcher, ignore_progress},
	http::HttpTransport,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

/// Client facade consumed by user interfaces and scripts.
#[derive(Debug)]
pub struct L10nClient {
	config: ClientConfig,
	fetcher: Fetcher,
}
impl L10nClient {
	/// Builds a client with the reqwest transport and the platform secret store.
	#[cfg(feature = "reqwest")]
	pub fn new(config: ClientConfig) -> Result<Self> {
		let transport = ReqwestTransport::new(&config.user_agent)?;
		let credentials = CredentialResolver::platform(&config.credential);

		Ok(Self::with_parts(config, Arc::new(transport), credentials)?)
	}

	/// Builds a client over a custom transport, using `secret_store` in the credential chain.
	pub fn with_transport(
		config: ClientConfig,
		transport: Arc<dyn HttpTransport>,
		secret_store: Arc<dyn SecretStore>,
	) -> Result<Self, ConfigError> {
		let credentials = CredentialResolver::from_config(&config.credential, secret_store);

		Self::with_parts(config, transport, credentials)
	}

	/// Builds a client from fully custom parts.
	pub fn with_parts(
		config: ClientConfig,
		transport: Arc<dyn HttpTransport>,
		credentials: CredentialResolver,
	) -> Result<Self, ConfigError> {
		let fetcher = Fetcher::new(transport, &config, Arc::new(credentials))?;

		Ok(Self { config, fetcher })
	}

	/// Lists every project, reporting `(pages_fetched, total_pages)` after each page.
	pub async fn list_projects<P>(&self, progress: P) -> Result<Vec<Value>>
	where
		P: FnMut(usize, usize),
	{
		let url = self.list_endpoint(&["projects"])?;

		self.fetcher.fetch_all(url, progress).await
	}

	/// Aggregate statistics for one project.
	pub async fn project_statistics(&self, slug: &str) -> Result<Option<Value>> {
		let url = self.endpoint(&["projects", slug, "statistics"])?;

		self.fetcher.fetch(&url, true).await
	}

	/// Statistics for one project in one language; carries `translated_percent`.
	pub async fn project_language_stats(&self, slug: &str, lang: &str) -> Result<Option<Value>> {
		let url = self.endpoint(&["projects", slug, "statistics", lang])?;

		self.fetcher.fetch(&url, true).await
	}

	/// Lists every component of a project.
	pub async fn list_components(&self, slug: &str) -> Result<Vec<Value>> {
		self.list_components_with_progress(slug, ignore_progress).await
	}

	/// Lists every component of a project, reporting page progress like
	/// [`list_projects`](Self::list_projects).
	pub async fn list_components_with_progress<P>(
		&self,
		slug: &str,
		progress: P,
	) -> Result<Vec<Value>>
	where
		P: FnMut(usize, usize),
	{
		let url = self.list_endpoint(&["projects", slug, "components"])?;

		self.fetcher.fetch_all(url, progress).await
	}

	/// Statistics for one component in one language; carries `translated_percent`.
	pub async fn component_language_stats(
		&self,
		project_slug: &str,
		component_slug: &str,
		lang: &str,
	) -> Result<Option<Value>> {
		let url =
			self.endpoint(&["components", project_slug, component_slug, "statistics", lang])?;

		self.fetcher.fetch(&url, true).await
	}

	/// Lists every project together with its translated percentage for `lang`.
	///
	/// Listing errors propagate; a failed or empty statistics lookup counts as `0.0`.
	pub async fn project_coverage<P>(&self, lang: &str, progress: P) -> Result<Vec<Coverage>>
	where
		P: FnMut(usize, usize),
	{
		let projects = self.list_projects(progress).await?;
		let mut coverage = Vec::with_capacity(projects.len());

		for project in projects {
			let stats = self.project_language_stats(item_slug(&project), lang).await;

			coverage.push(Self::pair(project, stats));
		}

		Ok(coverage)
	}

	/// Lists every component of a project together with its translated percentage for
	/// `lang`, with the same degradation rules as [`project_coverage`](Self::project_coverage).
	pub async fn component_coverage(
		&self,
		project_slug: &str,
		lang: &str,
	) -> Result<Vec<Coverage>> {
		let components = self.list_components(project_slug).await?;
		let mut coverage = Vec::with_capacity(components.len());

		for component in components {
			let stats =
				self.component_language_stats(project_slug, item_slug(&component), lang).await;

			coverage.push(Self::pair(component, stats));
		}

		Ok(coverage)
	}

	/// Deletes every cached response; returns how many entries were removed.
	pub fn clear_cache(&self) -> Result<usize> {
		Ok(self.fetcher.clear_cache()?)
	}

	/// Returns `true` when an API token is configured.
	pub fn has_credential(&self) -> bool {
		self.fetcher.credentials().has_value()
	}

	/// Saves `token` to the secret store, or the token file as a fallback.
	///
	/// Returns `false` when the token is blank or both backends refused it. Use
	/// [`credentials`](Self::credentials) for the detailed error.
	pub fn save_credential(&self, token: &str) -> bool {
		match self.fetcher.credentials().save(token) {
			Ok(backend) => {
				debug!(?backend, "Saved API token.");

				true
			},
			Err(e) => {
				warn!(error = %e, "Failed to save API token.");

				false
			},
		}
	}

	/// Credential resolver shared with the fetcher.
	pub fn credentials(&self) -> &CredentialResolver {
		self.fetcher.credentials()
	}

	/// Counters for this client's fetcher.
	pub fn metrics(&self) -> Arc<FetchMetrics> {
		self.fetcher.metrics()
	}

	/// Underlying fetcher, for requests outside the built-in operations.
	pub fn fetcher(&self) -> &Fetcher {
		&self.fetcher
	}

	/// Active configuration.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	fn pair(item: Value, stats: Result<Option<Value>>) -> Coverage {
		match stats {
			Ok(stats) => Coverage::from_stats(item, stats.as_ref()),
			Err(e) => {
				debug!(slug = item_slug(&item), error = %e, "Statistics unavailable; using 0%.");

				Coverage::from_stats(item, None)
			},
		}
	}

	/// `<base>/<segments>/` with a trailing slash, as the API expects.
	fn endpoint(&self, segments: &[&str]) -> Result<Url, ConfigError> {
		let mut url = self.config.base_url.clone();

		url.path_segments_mut()
			.map_err(|()| ConfigError::CannotBeABase { url: self.config.base_url.to_string() })?
			.pop_if_empty()
			.extend(segments)
			.push("");

		Ok(url)
	}

	fn list_endpoint(&self, segments: &[&str]) -> Result<Url, ConfigError> {
		let mut url = self.endpoint(segments)?;

		url.query_pairs_mut().append_pair("page_size", &self.config.page_size.to_string());

		Ok(url)
	}
}
