//! Client-level error types shared across the fetcher, cache, and configuration layers.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
///
/// Rate-limited responses never appear here: exhausting the attempt budget on HTTP 429
/// yields `Ok(None)` from the fetcher instead.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout) that outlived the retry budget.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body could not be decoded into the expected JSON shape.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Explicit cache maintenance failed.
	#[error(transparent)]
	Cache(#[from] CacheError),

	/// Server rejected the request with a 4xx status other than 429.
	#[error("Request to {url} was rejected with HTTP {status}.")]
	Client {
		/// HTTP status code returned by the server.
		status: u16,
		/// Requested URL.
		url: String,
	},
	/// Server failed with a 5xx (or otherwise unexpected) status.
	#[error("Request to {url} failed with HTTP {status}.")]
	Server {
		/// HTTP status code returned by the server.
		status: u16,
		/// Requested URL.
		url: String,
	},
}
impl Error {
	/// Builds the status error matching the status class.
	pub fn from_status(status: u16, url: &Url) -> Self {
		let url = url.to_string();

		if (400..500).contains(&status) {
			Self::Client { status, url }
		} else {
			Self::Server { status, url }
		}
	}

	/// Returns the HTTP status code carried by status errors.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Client { status, .. } | Self::Server { status, .. } => Some(*status),
			_ => None,
		}
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL cannot be parsed.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL cannot carry path segments (e.g. `mailto:`).
	#[error("Base URL `{url}` cannot be used as an API root.")]
	CannotBeABase {
		/// Offending URL.
		url: String,
	},
	/// Attempt budget must allow at least one request.
	#[error("The attempt budget must be at least one.")]
	ZeroAttempts,
	/// Page size must be positive.
	#[error("The page size must be positive.")]
	ZeroPageSize,
	/// Authorization scheme must not be blank.
	#[error("The authorization scheme must not be empty.")]
	EmptyAuthScheme,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for ConfigError {
	fn from(e: reqwest::Error) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO). Retried with backoff before surfacing.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {url}.")]
	Network {
		/// Requested URL.
		url: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request did not complete within the configured timeout.
	#[error("Request to {url} timed out.")]
	Timeout {
		/// Requested URL.
		url: String,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred during transport.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(url: &Url, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { url: url.to_string(), source: Box::new(src) }
	}
}

/// Response payloads that do not match the expected JSON shape.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Body was not valid JSON.
	#[error("Response from {url} is not valid JSON.")]
	Body {
		/// Requested URL.
		url: String,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// A list response could not be read as a page.
	#[error("Response from {url} is not a paginated list.")]
	Page {
		/// Requested URL.
		url: String,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// A list response linked to a `next` page that is not a valid URL.
	#[error("Response from {url} links to an invalid next page `{next}`.")]
	NextLink {
		/// Requested URL.
		url: String,
		/// Raw `next` value.
		next: String,
		/// URL parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Disk cache failures. Only explicit maintenance surfaces these; reads and writes on the
/// request path swallow them.
#[derive(Debug, ThisError)]
pub enum CacheError {
	/// Filesystem operation failed.
	#[error("Cache I/O failed for {}.", path.display())]
	Io {
		/// Path involved in the failed operation.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// Entry could not be serialized.
	#[error("Cache entry could not be serialized.")]
	Serialization(#[from] serde_json::Error),
}
impl CacheError {
	pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Self::Io { path: path.into(), source }
	}
}
