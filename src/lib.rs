//! Resilient client for the Fedora Weblate translation API.
//!
//! [`L10nClient`] layers credential resolution, global request spacing, exponential backoff,
//! and a TTL disk cache over a pluggable [`http::HttpTransport`].

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod http;
pub mod obs;

pub use client::L10nClient;
pub use config::{ClientConfig, CredentialConfig, detect_language};

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		path::{Path, PathBuf},
		pin::Pin,
		sync::Arc,
		time::Duration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(test)]
use {clap as _, color_eyre as _, httpmock as _, tracing_subscriber as _};
