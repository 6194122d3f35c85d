//! HTTP transport seam used by the fetcher.
//!
//! The fetcher depends on [`HttpTransport`] alone, so the retry, pacing, and cache layers can
//! be driven by scripted fakes in tests. [`ReqwestTransport`] is the production
//! implementation and is compiled with the default `reqwest` feature.

// crates.io
#[cfg(feature = "reqwest")] use reqwest::header::{HeaderMap, RETRY_AFTER};
#[cfg(feature = "reqwest")] use time::format_description::well_known::Rfc2822;
// self
use crate::{_prelude::*, error::TransportError};
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Boxed future returned by [`HttpTransport::get`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// Executes one GET request and reports the raw outcome.
///
/// Implementations return `Ok` for every response that carried a status line, whatever the
/// status; only failures that produced no response (DNS, TCP, TLS, timeout) are errors.
/// Classification of statuses belongs to the caller.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and collects the full response body.
	fn get(&self, request: HttpRequest) -> TransportFuture<'_>;
}
impl<T> HttpTransport for Arc<T>
where
	T: ?Sized + HttpTransport,
{
	fn get(&self, request: HttpRequest) -> TransportFuture<'_> {
		(**self).get(request)
	}
}

/// Outbound GET request.
#[derive(Clone, Debug)]
pub struct HttpRequest {
	/// Absolute request URL.
	pub url: Url,
	/// Header name/value pairs sent verbatim.
	pub headers: Vec<(&'static str, String)>,
	/// Upper bound on the whole exchange.
	pub timeout: Duration,
}
impl HttpRequest {
	/// Creates a request with no headers.
	pub fn new(url: Url, timeout: Duration) -> Self {
		Self { url, headers: Vec::new(), timeout }
	}

	/// Appends a header.
	pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
		self.headers.push((name, value.into()));

		self
	}

	/// Returns the first value recorded for `name` (ASCII case-insensitive).
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}

/// Response status, retry hint, and body bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// `Retry-After` hint expressed as a relative duration, when the server sent one.
	pub retry_after: Option<Duration>,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl HttpResponse {
	/// Creates a response without a retry hint.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, retry_after: None, body: body.into() }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// [`HttpTransport`] backed by a shared [`ReqwestClient`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestTransport(ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a client that identifies itself with `user_agent`.
	pub fn new(user_agent: &str) -> Result<Self, ConfigError> {
		Ok(Self(ReqwestClient::builder().user_agent(user_agent).build()?))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	fn map_error(url: &Url, e: ReqwestError) -> TransportError {
		if e.is_timeout() {
			TransportError::Timeout { url: url.to_string() }
		} else {
			TransportError::network(url, e)
		}
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn get(&self, request: HttpRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let HttpRequest { url, headers, timeout } = request;
			let mut builder = self.0.get(url.clone()).timeout(timeout);

			for (name, value) in &headers {
				builder = builder.header(*name, value.as_str());
			}

			let response = builder.send().await.map_err(|e| Self::map_error(&url, e))?;
			let status = response.status().as_u16();
			let retry_after = parse_retry_after(response.headers());
			let body = response.bytes().await.map_err(|e| Self::map_error(&url, e))?.to_vec();

			Ok(HttpResponse { status, retry_after, body })
		})
	}
}

#[cfg(feature = "reqwest")]
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::from_secs(secs));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Duration::try_from(delta).ok();
		}
	}

	None
}
