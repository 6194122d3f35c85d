//! Attempt classification and the retry state machine driven by the fetcher.
//!
//! Every network attempt is classified into one [`AttemptOutcome`]; [`RetryPolicy::advance`]
//! then maps `(attempt, outcome)` onto the next [`RetryState`]. Rate-limited (429) and
//! transient transport failures back off exponentially. Running out of attempts on a 429
//! ends with no result, whereas running out on a transport failure surfaces the error.

// self
use crate::{
	_prelude::*,
	error::{DecodeError, TransportError},
	http::HttpResponse,
};

const TOO_MANY_REQUESTS: u16 = 429;

/// Attempt budget and backoff base.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
	max_attempts: u32,
	backoff_base: Duration,
}
impl RetryPolicy {
	/// Creates a policy; a zero budget is raised to one attempt.
	pub fn new(max_attempts: u32, backoff_base: Duration) -> Self {
		Self { max_attempts: max_attempts.max(1), backoff_base }
	}

	/// Total number of attempts.
	pub fn max_attempts(&self) -> u32 {
		self.max_attempts
	}

	/// Delay after the zero-based `attempt`: `backoff_base * 2^attempt`, saturating.
	pub fn backoff(&self, attempt: u32) -> Duration {
		self.backoff_base.saturating_mul(2_u32.saturating_pow(attempt))
	}

	/// Returns `true` when another attempt may follow the zero-based `attempt`.
	pub fn has_attempts_after(&self, attempt: u32) -> bool {
		attempt.saturating_add(1) < self.max_attempts
	}

	/// Computes the state that follows `outcome` on the zero-based `attempt`.
	pub fn advance(&self, attempt: u32, outcome: AttemptOutcome) -> RetryState {
		match outcome {
			AttemptOutcome::Success(value) => RetryState::Success(value),
			AttemptOutcome::RateLimited { .. } if self.has_attempts_after(attempt) =>
				RetryState::BackoffWait { attempt, delay: self.backoff(attempt) },
			AttemptOutcome::RateLimited { .. } => RetryState::ExhaustedNoResult,
			AttemptOutcome::Transient(_) if self.has_attempts_after(attempt) =>
				RetryState::BackoffWait { attempt, delay: self.backoff(attempt) },
			AttemptOutcome::Transient(e) => RetryState::TerminalError(Error::Transport(e)),
			AttemptOutcome::Terminal(e) => RetryState::TerminalError(e),
		}
	}
}

/// Classification of one network attempt.
#[derive(Debug)]
pub enum AttemptOutcome {
	/// 2xx with a JSON body.
	Success(Value),
	/// HTTP 429.
	RateLimited {
		/// Server-provided `Retry-After` hint; informational only.
		retry_after: Option<Duration>,
	},
	/// No response at all (connection, TLS, timeout).
	Transient(TransportError),
	/// Anything that must not be retried.
	Terminal(Error),
}
impl AttemptOutcome {
	/// Classifies a transport result for `url`.
	pub fn classify(url: &Url, result: Result<HttpResponse, TransportError>) -> Self {
		let response = match result {
			Ok(response) => response,
			Err(e) => return Self::Transient(e),
		};

		if response.is_success() {
			let mut de = serde_json::Deserializer::from_slice(&response.body);

			return match serde_path_to_error::deserialize::<_, Value>(&mut de) {
				Ok(value) => Self::Success(value),
				Err(source) =>
					Self::Terminal(DecodeError::Body { url: url.to_string(), source }.into()),
			};
		}
		if response.status == TOO_MANY_REQUESTS {
			return Self::RateLimited { retry_after: response.retry_after };
		}

		Self::Terminal(Error::from_status(response.status, url))
	}
}

/// States of one fetch's network phase.
#[derive(Debug)]
pub enum RetryState {
	/// About to issue the zero-based `attempt`.
	Attempting {
		/// Zero-based attempt index.
		attempt: u32,
	},
	/// Sleeping before the attempt after `attempt`.
	BackoffWait {
		/// Attempt that just failed.
		attempt: u32,
		/// Sleep duration.
		delay: Duration,
	},
	/// Finished with a decoded body.
	Success(Value),
	/// Budget ran out on rate limiting.
	ExhaustedNoResult,
	/// Finished with an error for the caller.
	TerminalError(Error),
}
