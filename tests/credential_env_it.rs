// std
use std::{env, fs, sync::Arc};
// crates.io
use parking_lot::{Mutex, MutexGuard, const_mutex};
use tempfile::TempDir;
// self
use fedora_l10n_client::{
	CredentialConfig,
	auth::{CredentialResolver, MemorySecretStore, NoSecretStore},
};

// Every test in this binary holds the lock for its whole body, so no thread reads the
// environment while another one mutates it.
static ENV_LOCK: Mutex<()> = const_mutex(());

fn env_guard() -> MutexGuard<'static, ()> {
	ENV_LOCK.lock()
}

fn credential_config(dir: &TempDir, env_var: &str) -> CredentialConfig {
	CredentialConfig::default()
		.with_env_vars([env_var])
		.with_token_file(dir.path().join("fedora-l10n").join("api-key"))
}

fn resolved(resolver: &CredentialResolver) -> Option<String> {
	resolver.resolve().map(|token| token.expose().to_owned())
}

#[test]
fn environment_beats_file_and_file_is_the_fallback() {
	const VAR: &str = "FEDORA_L10N_IT_ENV_BEATS_FILE";

	let _env = env_guard();
	let dir = TempDir::new().expect("Failed to create temp directory.");
	let config = credential_config(&dir, VAR);

	fs::create_dir_all(dir.path().join("fedora-l10n")).expect("Failed to create config dir.");
	fs::write(&config.token_file, "wlu_from_file\n").expect("Failed to write token file.");

	// SAFETY: `ENV_LOCK` is held and no other thread of this binary touches the environment.
	unsafe { env::set_var(VAR, "wlu_from_env") };

	let with_env = CredentialResolver::from_config(&config, Arc::new(NoSecretStore));

	assert_eq!(resolved(&with_env).as_deref(), Some("wlu_from_env"));

	// SAFETY: `ENV_LOCK` is still held.
	unsafe { env::remove_var(VAR) };

	// The first resolver keeps its memo; a fresh one walks the chain again.
	assert_eq!(resolved(&with_env).as_deref(), Some("wlu_from_env"));

	let without_env = CredentialResolver::from_config(&config, Arc::new(NoSecretStore));

	assert_eq!(resolved(&without_env).as_deref(), Some("wlu_from_file"));
}

#[test]
fn secret_store_beats_file() {
	let _env = env_guard();
	let dir = TempDir::new().expect("Failed to create temp directory.");
	let config = credential_config(&dir, "FEDORA_L10N_IT_STORE_BEATS_FILE");

	fs::create_dir_all(dir.path().join("fedora-l10n")).expect("Failed to create config dir.");
	fs::write(&config.token_file, "wlu_from_file").expect("Failed to write token file.");

	let resolver = CredentialResolver::from_config(
		&config,
		Arc::new(MemorySecretStore::with_token("wlu_from_store")),
	);

	assert_eq!(resolved(&resolver).as_deref(), Some("wlu_from_store"));
}

#[test]
fn blank_sources_are_skipped() {
	const VAR: &str = "FEDORA_L10N_IT_BLANK_SOURCES";

	let _env = env_guard();
	let dir = TempDir::new().expect("Failed to create temp directory.");
	let config = credential_config(&dir, VAR);

	fs::create_dir_all(dir.path().join("fedora-l10n")).expect("Failed to create config dir.");
	fs::write(&config.token_file, " \n").expect("Failed to write token file.");

	// SAFETY: `ENV_LOCK` is held and no other thread of this binary touches the environment.
	unsafe { env::set_var(VAR, "   ") };

	let resolver =
		CredentialResolver::from_config(&config, Arc::new(MemorySecretStore::with_token("")));

	assert!(!resolver.has_value());

	// SAFETY: `ENV_LOCK` is still held.
	unsafe { env::remove_var(VAR) };
}
