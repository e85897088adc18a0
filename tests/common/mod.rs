//! Fixtures shared by the relay and server integration tests.

#![allow(dead_code)]

// std
use std::sync::Arc;
// crates.io
use httpmock::{Mock, prelude::*};
// self
use linkedin_relay::{
	auth::{Credentials, TokenSecret},
	config::RelayConfig,
	relay::Relay,
	upstream::{DEFAULT_AUTHOR_URN, PostsRequest},
	url::Url,
};

pub const CLIENT_ID: &str = "client-relay";
pub const CLIENT_SECRET: &str = "secret-relay";
pub const REFRESH_TOKEN: &str = "refresh-relay";
pub const STALE_TOKEN: &str = "access-stale";
pub const FRESH_TOKEN: &str = "access-fresh";
pub const POSTS_PATH: &str = "/v2/ugcPosts";
pub const TOKEN_PATH: &str = "/oauth/v2/accessToken";
pub const EMPTY_POSTS: &str = "{\"elements\":[]}";

/// Relay configuration pointing both upstreams at `server`.
pub fn config_for(server: &MockServer, access_token: Option<&str>) -> RelayConfig {
	let credentials = Credentials::new(CLIENT_ID, CLIENT_SECRET, REFRESH_TOKEN)
		.expect("Credentials fixture should build successfully.");
	let token_url =
		Url::parse(&server.url(TOKEN_PATH)).expect("Mock token endpoint should parse successfully.");
	let posts = PostsRequest::parse(&server.url(POSTS_PATH), DEFAULT_AUTHOR_URN)
		.expect("Mock posts endpoint should parse successfully.");

	RelayConfig::new(credentials, token_url, posts)
		.with_access_token(access_token.map(TokenSecret::new))
}

/// Relay wired to `server` with the default refresh cap.
pub fn relay_for(server: &MockServer, access_token: Option<&str>) -> Arc<Relay> {
	Arc::new(
		Relay::new(&config_for(server, access_token))
			.expect("Relay should build against the mock server."),
	)
}

/// Posts endpoint answering `status` + `body` to requests bearing `token`.
pub async fn mock_posts<'a>(
	server: &'a MockServer,
	token: &str,
	status: u16,
	body: &str,
) -> Mock<'a> {
	let authorization = format!("Bearer {token}");

	server
		.mock_async(|when, then| {
			when.method(GET)
				.path(POSTS_PATH)
				.query_param("q", "authors")
				.header("authorization", authorization)
				.header("x-restli-protocol-version", "2.0.0")
				.header("linkedin-version", "202305");
			then.status(status).header("content-type", "application/json").body(body);
		})
		.await
}

/// Token endpoint issuing `access_token` for the fixture refresh token.
pub async fn mock_refresh_ok<'a>(server: &'a MockServer, access_token: &str) -> Mock<'a> {
	let body = format!(
		"{{\"access_token\":\"{access_token}\",\"expires_in\":5183999,\"refresh_token\":\"{REFRESH_TOKEN}\",\"refresh_token_expires_in\":31535999}}"
	);

	server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.header("content-type", "application/x-www-form-urlencoded")
				.form_urlencoded_tuple("grant_type", "refresh_token")
				.form_urlencoded_tuple("refresh_token", REFRESH_TOKEN)
				.form_urlencoded_tuple("client_id", CLIENT_ID)
				.form_urlencoded_tuple("client_secret", CLIENT_SECRET);
			then.status(200).header("content-type", "application/json").body(body);
		})
		.await
}

/// Token endpoint failing every exchange with `status` + `body`.
pub async fn mock_refresh_err<'a>(server: &'a MockServer, status: u16, body: &str) -> Mock<'a> {
	server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(status).header("content-type", "application/json").body(body);
		})
		.await
}
