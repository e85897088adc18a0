//! HTTP front: routes the public endpoints to the relay and translates its outcomes.

// std
use std::io;
// crates.io
use axum::{
	Router,
	extract::State,
	http::{StatusCode as HttpStatus, header},
	response::{IntoResponse, Response},
	routing::get,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
// self
use crate::{_prelude::*, relay::Relay};

/// Body served by `GET /`.
pub const GREETING: &str = "Welcome to the LinkedIn Proxy Server";
/// Path of the relayed posts endpoint.
pub const POSTS_PATH: &str = "/api/linkedin-posts";

/// Builds the application router with permissive CORS and request tracing.
pub fn router(relay: Arc<Relay>) -> Router {
	Router::new()
		.route("/", get(greeting))
		.route(POSTS_PATH, get(linkedin_posts))
		.layer(CorsLayer::permissive())
		.layer(TraceLayer::new_for_http())
		.with_state(relay)
}

/// Serves the router on `listener` until `shutdown` resolves.
pub async fn serve(
	listener: TcpListener,
	relay: Arc<Relay>,
	shutdown: impl 'static + Send + Future<Output = ()>,
) -> io::Result<()> {
	let addr = listener.local_addr()?;

	tracing::info!(%addr, "LinkedIn relay listening.");

	axum::serve(listener, router(relay)).with_graceful_shutdown(shutdown).await
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(err) = tokio::signal::ctrl_c().await {
			tracing::error!(error = %err, "Failed to listen for Ctrl-C.");
			std::future::pending::<()>().await;
		}
	};
	#[cfg(unix)]
	let terminate = async {
		match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
			Ok(mut signal) => {
				signal.recv().await;
			},
			Err(err) => {
				tracing::error!(error = %err, "Failed to listen for SIGTERM.");
				std::future::pending::<()>().await;
			},
		}
	};
	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}

	tracing::info!("Shutdown signal received.");
}

async fn greeting() -> &'static str {
	GREETING
}

async fn linkedin_posts(State(relay): State<Arc<Relay>>) -> Result<Response, RelayFailure> {
	let posts = relay.fetch_posts().await?;

	Ok(([(header::CONTENT_TYPE, "application/json")], String::from(posts)).into_response())
}

/// Relay error rendered as a plain-text 500.
#[derive(Debug)]
pub struct RelayFailure(Error);
impl From<Error> for RelayFailure {
	fn from(err: Error) -> Self {
		Self(err)
	}
}
impl IntoResponse for RelayFailure {
	fn into_response(self) -> Response {
		(HttpStatus::INTERNAL_SERVER_ERROR, format!("Internal Server Error: {}", self.0))
			.into_response()
	}
}
