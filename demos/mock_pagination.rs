//! Walks a paginated project listing served by a local mock server, printing progress and the
//! cache counters that show the second listing never leaves the process.

// std
use std::time::Duration;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use fedora_l10n_client::{ClientConfig, CredentialConfig, L10nClient};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let cache_dir = tempfile::tempdir()?;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/projects/");
			then.status(200).json_body(json!({
				"count": 3,
				"next": format!("http://{}/api/projects/page-2/", server.address()),
				"results": [
					{ "slug": "anaconda", "name": "Anaconda" },
					{ "slug": "dnf", "name": "DNF" },
				],
			}));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/projects/page-2/");
			then.status(200).json_body(json!({
				"count": 3,
				"next": null,
				"results": [{ "slug": "fedora-docs", "name": "Fedora Docs" }],
			}));
		})
		.await;

	let config = ClientConfig::default()
		.with_base_url_str(&format!("http://{}/api", server.address()))?
		.with_cache_dir(cache_dir.path())
		.with_min_request_interval(Duration::from_millis(100))
		.with_page_size(2)
		.with_credential(
			CredentialConfig::default()
				.with_env_vars(Vec::<String>::new())
				.with_token_file(cache_dir.path().join("api-key")),
		);
	let client = L10nClient::new(config)?;
	let projects = client
		.list_projects(|page, total| println!("Fetched page {page}/{total}."))
		.await?;

	for project in &projects {
		println!("{} ({})", project["name"], project["slug"]);
	}

	client.list_projects(|_, _| {}).await?;

	let metrics = client.metrics();

	println!(
		"network requests: {}, cache hits: {}, cache misses: {}",
		metrics.network_requests(),
		metrics.cache_hits(),
		metrics.cache_misses()
	);
	println!("cleared {} cache entries", client.clear_cache()?);

	Ok(())
}
