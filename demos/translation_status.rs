//! Prints translation coverage from the live Fedora Weblate instance.
//!
//! ```sh
//! RUST_LOG=fedora_l10n_client=debug cargo run --example translation_status -- --project anaconda
//! ```

// crates.io
use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;
// self
use fedora_l10n_client::{ClientConfig, L10nClient, detect_language};

/// Translation coverage for Fedora projects.
#[derive(Debug, Parser)]
struct Cli {
	/// Language code; defaults to the one in the current locale.
	#[arg(long, short)]
	lang: Option<String>,
	/// Show the components of one project instead of the project list.
	#[arg(long, short)]
	project: Option<String>,
	/// Save this API token before querying.
	#[arg(long, env = "FEDORA_L10N_SAVE_TOKEN", hide_env_values = true)]
	save_token: Option<String>,
	/// Drop cached responses before querying.
	#[arg(long)]
	clear_cache: bool,
	/// Only list entries below this translated percentage.
	#[arg(long, default_value_t = 100.)]
	below: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
		.init();

	let cli = Cli::parse();
	let client = L10nClient::new(ClientConfig::default())?;
	let lang = cli.lang.unwrap_or_else(detect_language);

	if let Some(token) = &cli.save_token {
		println!("token saved: {}", client.save_credential(token));
	}
	if cli.clear_cache {
		println!("cleared {} cache entries", client.clear_cache()?);
	}

	println!("authenticated: {}, language: {lang}", client.has_credential());

	let coverage = match &cli.project {
		Some(project) => client.component_coverage(project, &lang).await?,
		None =>
			client
				.project_coverage(&lang, |page, total| eprintln!("page {page}/{total}"))
				.await?,
	};

	for entry in coverage.iter().filter(|entry| entry.translated_percent < cli.below) {
		println!("{:>6.1}%  {}", entry.translated_percent, entry.name());
	}

	Ok(())
}
