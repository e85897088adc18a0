//! `linkedin-relay` binary: loads configuration, then serves the relay until shutdown.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use tokio::net::TcpListener;
// self
use linkedin_relay::{
	config::Settings,
	obs,
	relay::Relay,
	server::{self, POSTS_PATH},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let (settings, dotenv_error) = Settings::load();

	obs::init_tracing(&settings.log_level, settings.json_logs);

	if let Some(err) = dotenv_error {
		tracing::warn!(error = %err, "Ignoring unreadable .env file.");
	}

	let config = settings.into_config()?;
	let relay = Arc::new(Relay::new(&config)?);
	let listener = TcpListener::bind(config.listen_addr).await?;

	tracing::info!(
		version = env!("CARGO_PKG_VERSION"),
		posts_path = POSTS_PATH,
		upstream = %relay.posts_request().endpoint,
		has_initial_token = config.initial_access_token.is_some(),
		"Starting LinkedIn relay."
	);

	server::serve(listener, relay, server::shutdown_signal()).await?;

	Ok(())
}
