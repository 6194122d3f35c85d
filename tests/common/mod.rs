//! Shared fixtures for integration tests.

#![allow(dead_code)]

// std
use std::{
	path::Path,
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};
// crates.io
use parking_lot::Mutex;
use tokio::time::Instant;
// self
use fedora_l10n_client::{
	ClientConfig, CredentialConfig, L10nClient,
	auth::{NoSecretStore, SecretStore},
	error::TransportError,
	http::{HttpRequest, HttpResponse, HttpTransport, TransportFuture},
};

/// One scripted transport reply.
#[derive(Clone, Debug)]
pub enum Reply {
	/// Respond with a status and body.
	Status(u16, String),
	/// Fail without a response.
	Offline,
}
impl Reply {
	pub fn json(status: u16, body: serde_json::Value) -> Self {
		Self::Status(status, body.to_string())
	}
}

/// Request observed by [`FakeTransport`].
#[derive(Clone, Debug)]
pub struct Call {
	pub at: Instant,
	pub request: HttpRequest,
}

/// Transport replaying a script; the last reply repeats once the script runs out.
#[derive(Debug)]
pub struct FakeTransport {
	script: Vec<Reply>,
	cursor: AtomicUsize,
	calls: Mutex<Vec<Call>>,
}
impl FakeTransport {
	pub fn scripted(script: impl IntoIterator<Item = Reply>) -> Arc<Self> {
		let script: Vec<_> = script.into_iter().collect();

		assert!(!script.is_empty(), "Fake transport needs at least one reply.");

		Arc::new(Self { script, cursor: AtomicUsize::new(0), calls: Mutex::new(Vec::new()) })
	}

	pub fn always(reply: Reply) -> Arc<Self> {
		Self::scripted([reply])
	}

	pub fn calls(&self) -> Vec<Call> {
		self.calls.lock().clone()
	}

	pub fn call_count(&self) -> usize {
		self.calls.lock().len()
	}

	/// Gaps between consecutive request starts.
	pub fn gaps(&self) -> Vec<Duration> {
		self.calls().windows(2).map(|pair| pair[1].at - pair[0].at).collect()
	}
}
impl HttpTransport for FakeTransport {
	fn get(&self, request: HttpRequest) -> TransportFuture<'_> {
		let index = self.cursor.fetch_add(1, Ordering::SeqCst).min(self.script.len() - 1);
		let reply = self.script[index].clone();
		let url = request.url.to_string();

		self.calls.lock().push(Call { at: Instant::now(), request });

		Box::pin(async move {
			match reply {
				Reply::Status(status, body) => Ok(HttpResponse::new(status, body)),
				Reply::Offline => Err(TransportError::Io(std::io::Error::new(
					std::io::ErrorKind::ConnectionRefused,
					format!("connection refused by {url}"),
				))),
			}
		})
	}
}

/// Fast configuration isolated inside `dir`, with no environment or secret-store credential.
pub fn config(dir: &Path) -> ClientConfig {
	ClientConfig::default()
		.with_cache_dir(dir.join("cache"))
		.with_min_request_interval(Duration::ZERO)
		.with_backoff_base(Duration::from_millis(10))
		.with_credential(
			CredentialConfig::default()
				.with_env_vars(Vec::<String>::new())
				.with_token_file(dir.join("config").join("api-key")),
		)
}

pub fn client_with_store(
	config: ClientConfig,
	transport: Arc<dyn HttpTransport>,
	store: Arc<dyn SecretStore>,
) -> L10nClient {
	L10nClient::with_transport(config, transport, store).expect("Test client should build.")
}

pub fn client(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> L10nClient {
	client_with_store(config, transport, Arc::new(NoSecretStore))
}

#[cfg(feature = "reqwest")]
pub fn reqwest_client(config: ClientConfig) -> L10nClient {
	// self
	use fedora_l10n_client::http::ReqwestTransport;

	let transport =
		ReqwestTransport::new(&config.user_agent).expect("Reqwest transport should build.");

	client(config, Arc::new(transport))
}

pub fn url(raw: &str) -> url::Url {
	url::Url::parse(raw).expect("Fixture URL should parse.")
}

/// Plain-HTTP URL for `path` on the mock server, regardless of httpmock's TLS feature.
pub fn mock_url(server: &httpmock::MockServer, path: &str) -> String {
	format!("http://{}{path}", server.address())
}
