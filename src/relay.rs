//! Relay client: forwards the fixed posts query and recovers from rejected access tokens.
//!
//! [`Relay::fetch_posts`] sends the [`PostsRequest`] with the live bearer token. A 401 (or a
//! missing token) triggers [`Relay::refresh_access_token`] followed by a retry, up to the
//! configured refresh cap. Every other failure is terminal for the request.

mod metrics;
mod refresh;

pub use metrics::RelayMetrics;
pub use refresh::RefreshResponse;

// crates.io
use serde_json::value::RawValue;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, AccessTokenCell, Credentials, TokenSecret},
	config::RelayConfig,
	error::TransportError,
	http::{BufferedResponse, ReqwestHttpClient},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	upstream::{LINKEDIN_VERSION_HEADER, PostsRequest, RESTLI_PROTOCOL_HEADER},
};

/// Endpoint label used in errors raised by the data API call.
pub const POSTS_ENDPOINT: &str = "LinkedIn posts";
/// Endpoint label used in errors raised by the token exchange.
pub const TOKEN_ENDPOINT: &str = "LinkedIn token";

/// Upstream posts payload, validated as JSON and kept byte-for-byte.
#[derive(Debug)]
pub struct Posts(Box<RawValue>);
impl Posts {
	/// Validates `body` as a JSON document.
	pub fn from_slice(body: &[u8]) -> Result<Self> {
		serde_json::from_slice(body).map(Self).map_err(|err| Error::malformed(POSTS_ENDPOINT, err))
	}

	/// Raw JSON text exactly as LinkedIn sent it.
	pub fn as_str(&self) -> &str {
		self.0.get()
	}

	/// Parses the payload into a generic JSON value.
	pub fn to_value(&self) -> Result<serde_json::Value> {
		serde_json::from_str(self.as_str()).map_err(|err| Error::malformed(POSTS_ENDPOINT, err))
	}
}
impl From<Posts> for String {
	fn from(posts: Posts) -> Self {
		posts.0.get().to_owned()
	}
}

enum PostsOutcome {
	Posts(Posts),
	Unauthorized,
}

/// Holds the credentials, the live access token, and the outbound client.
///
/// One instance is shared (behind [`Arc`]) by every inbound request. The token cell is the only
/// mutable state; refreshes are serialized through `refresh_guard`.
#[derive(Debug)]
pub struct Relay {
	http_client: ReqwestHttpClient,
	credentials: Credentials,
	posts: PostsRequest,
	posts_url: Url,
	token_url: Url,
	token: AccessTokenCell,
	refresh_guard: AsyncMutex<()>,
	max_refreshes: u32,
	metrics: RelayMetrics,
}
impl Relay {
	/// Builds a relay with an HTTP client configured from `config`.
	pub fn new(config: &RelayConfig) -> Result<Self> {
		let http_client = ReqwestHttpClient::build(config.http_timeout)?;

		Ok(Self::with_http_client(config, http_client))
	}

	/// Builds a relay that reuses the caller-provided HTTP client.
	pub fn with_http_client(config: &RelayConfig, http_client: ReqwestHttpClient) -> Self {
		Self {
			http_client,
			credentials: config.credentials.clone(),
			posts: config.posts.clone(),
			posts_url: config.posts.url(),
			token_url: config.token_url.clone(),
			token: AccessTokenCell::new(config.initial_access_token.clone()),
			refresh_guard: AsyncMutex::new(()),
			max_refreshes: config.max_refreshes,
			metrics: RelayMetrics::default(),
		}
	}

	/// Returns the live access token.
	pub fn token(&self) -> AccessToken {
		self.token.snapshot()
	}

	/// Returns the fixed posts query this relay forwards.
	pub fn posts_request(&self) -> &PostsRequest {
		&self.posts
	}

	/// Returns fetch and refresh counters.
	pub fn metrics(&self) -> &RelayMetrics {
		&self.metrics
	}

	/// Fetches the configured posts, refreshing the access token when LinkedIn rejects it.
	pub async fn fetch_posts(&self) -> Result<Posts> {
		const KIND: FlowKind = FlowKind::FetchPosts;

		let span = FlowSpan::new(KIND, "fetch_posts");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		self.metrics.record_fetch_attempt();

		let result = span.instrument(self.fetch_with_refresh()).await;

		match &result {
			Ok(_) => {
				self.metrics.record_fetch_success();
				obs::record_flow_outcome(KIND, FlowOutcome::Success);
			},
			Err(err) => {
				tracing::error!(error = %err, "Failed to fetch LinkedIn posts.");
				self.metrics.record_fetch_failure();
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
			},
		}

		result
	}

	async fn fetch_with_refresh(&self) -> Result<Posts> {
		let mut token = self.token.snapshot();
		let mut refreshes = 0;

		loop {
			let outcome = match &token.secret {
				Some(secret) => self.request_posts(secret).await?,
				None => PostsOutcome::Unauthorized,
			};

			match outcome {
				PostsOutcome::Posts(posts) => return Ok(posts),
				PostsOutcome::Unauthorized if refreshes >= self.max_refreshes =>
					return Err(Error::Unauthorized { refreshes }),
				PostsOutcome::Unauthorized => {
					tracing::info!(
						version = token.version,
						has_token = token.secret.is_some(),
						"Access token missing or expired, refreshing."
					);

					token = self.refresh_access_token(token.version).await?;
					refreshes += 1;
				},
			}
		}
	}

	async fn request_posts(&self, secret: &TokenSecret) -> Result<PostsOutcome> {
		let response = self
			.http_client
			.get(self.posts_url.clone())
			.bearer_auth(secret.expose())
			.header(RESTLI_PROTOCOL_HEADER.0, RESTLI_PROTOCOL_HEADER.1)
			.header(LINKEDIN_VERSION_HEADER.0, LINKEDIN_VERSION_HEADER.1)
			.send()
			.await
			.map_err(|err| TransportError::network(POSTS_ENDPOINT, err))?;
		let response = BufferedResponse::read(POSTS_ENDPOINT, response).await?;

		if response.status == StatusCode::UNAUTHORIZED {
			return Ok(PostsOutcome::Unauthorized);
		}
		if !response.status.is_success() {
			let body = response.text();

			tracing::error!(
				status = response.status.as_u16(),
				retry_after = ?response.metadata.retry_after,
				body = %body,
				"LinkedIn rejected the posts request."
			);

			return Err(Error::upstream(response.status, body));
		}

		let posts = Posts::from_slice(&response.body)?;

		tracing::debug!(bytes = response.body.len(), "Fetched LinkedIn posts.");

		Ok(PostsOutcome::Posts(posts))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn posts_keep_upstream_bytes() {
		let posts = Posts::from_slice(br#"{"elements":[{"b":1,"a":2}]}"#)
			.expect("Valid JSON should be accepted.");

		assert_eq!(posts.as_str(), r#"{"elements":[{"b":1,"a":2}]}"#);
		assert_eq!(
			posts.to_value().expect("Raw posts should parse into a value.")["elements"][0]["a"],
			2
		);
		assert_eq!(String::from(posts), r#"{"elements":[{"b":1,"a":2}]}"#);
	}

	#[test]
	fn posts_reject_non_json() {
		let err = Posts::from_slice(b"<html>").expect_err("HTML bodies should be rejected.");

		assert!(matches!(err, Error::MalformedResponse { endpoint: POSTS_ENDPOINT, .. }));
	}
}
