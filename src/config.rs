//! Startup configuration.
//!
//! [`Settings`] is the command-line/environment surface parsed once by the binary.
//! [`Settings::into_config`] validates it into a [`RelayConfig`], which is what the relay and
//! the HTTP front receive. Nothing reads the process environment after startup.

// std
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
// crates.io
use clap::Parser;
// self
use crate::{
	_prelude::*,
	auth::{Credentials, TokenSecret},
	error::ConfigError,
	upstream::{DEFAULT_AUTHOR_URN, DEFAULT_COUNT, DEFAULT_POSTS_URL, PostsRequest},
};

/// Default LinkedIn OAuth token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://www.linkedin.com/oauth/v2/accessToken";
/// Default listen port.
pub const DEFAULT_PORT: u16 = 3000;
/// Default number of refreshes a single request may trigger.
pub const DEFAULT_MAX_REFRESHES: u32 = 1;

/// Command-line flags with environment fallbacks.
#[derive(Clone, Parser)]
#[command(
	name = "linkedin-relay",
	version,
	about = "Relay LinkedIn posts without exposing OAuth credentials"
)]
pub struct Settings {
	/// OAuth client identifier.
	#[arg(long, env = "LINKEDIN_CLIENT_ID")]
	pub client_id: String,
	/// OAuth client secret.
	#[arg(long, env = "LINKEDIN_CLIENT_SECRET", hide_env_values = true)]
	pub client_secret: String,
	/// Long-lived refresh token.
	#[arg(long, env = "LINKEDIN_REFRESH_TOKEN", hide_env_values = true)]
	pub refresh_token: String,
	/// Initial access token; the first request refreshes when omitted.
	#[arg(long, env = "LINKEDIN_ACCESS_TOKEN", hide_env_values = true)]
	pub access_token: Option<String>,
	/// Listen address.
	#[arg(long, env = "RELAY_BIND", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
	pub bind: IpAddr,
	/// Listen port.
	#[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
	pub port: u16,
	/// OAuth token endpoint.
	#[arg(long, env = "LINKEDIN_TOKEN_URL", default_value = DEFAULT_TOKEN_URL)]
	pub token_url: String,
	/// ugcPosts collection endpoint.
	#[arg(long, env = "LINKEDIN_POSTS_URL", default_value = DEFAULT_POSTS_URL)]
	pub posts_url: String,
	/// Author URN the posts are filtered by.
	#[arg(long, env = "LINKEDIN_AUTHOR_URN", default_value = DEFAULT_AUTHOR_URN)]
	pub author_urn: String,
	/// Page size requested from LinkedIn.
	#[arg(long, env = "LINKEDIN_POSTS_COUNT", default_value_t = DEFAULT_COUNT)]
	pub posts_count: u32,
	/// Refreshes a single request may trigger before giving up.
	#[arg(long, env = "RELAY_MAX_REFRESHES", default_value_t = DEFAULT_MAX_REFRESHES)]
	pub max_refreshes: u32,
	/// Timeout for each outbound request; unset means the transport default.
	#[arg(long, env = "RELAY_HTTP_TIMEOUT_SECS")]
	pub http_timeout_secs: Option<u64>,
	/// Log level (trace, debug, info, warn, error); `RUST_LOG` takes precedence.
	#[arg(long, env = "RELAY_LOG", default_value = "info")]
	pub log_level: String,
	/// Output logs as JSON instead of human-readable.
	#[arg(long, env = "RELAY_JSON_LOGS", default_value_t = false)]
	pub json_logs: bool,
}
impl Settings {
	/// Loads `.env` (if present) and parses flags plus environment.
	///
	/// An unreadable `.env` does not abort startup. It is returned alongside the settings so the
	/// caller can report it once tracing is installed.
	pub fn load() -> (Self, Option<dotenvy::Error>) {
		let dotenv_error = dotenv_failure(dotenvy::dotenv());

		(Self::parse(), dotenv_error)
	}

	/// Validates the settings into a [`RelayConfig`].
	pub fn into_config(self) -> Result<RelayConfig, ConfigError> {
		let credentials = Credentials::new(self.client_id, self.client_secret, self.refresh_token)?;
		let token_url = Url::parse(&self.token_url)
			.map_err(|source| ConfigError::InvalidUrl { field: "token", source })?;
		let posts =
			PostsRequest::parse(&self.posts_url, self.author_urn)?.with_count(self.posts_count);
		let access_token =
			self.access_token.map(TokenSecret::new).filter(|secret| !secret.is_blank());

		RelayConfig::new(credentials, token_url, posts)
			.with_access_token(access_token)
			.with_max_refreshes(self.max_refreshes)
			.map(|config| {
				config
					.with_http_timeout(self.http_timeout_secs.map(std::time::Duration::from_secs))
					.with_listen_addr(SocketAddr::new(self.bind, self.port))
			})
	}
}

fn dotenv_failure<T>(result: dotenvy::Result<T>) -> Option<dotenvy::Error> {
	result.err().filter(|err| !err.not_found())
}

/// Validated configuration passed by reference to the relay and the HTTP front.
#[derive(Clone, Debug)]
pub struct RelayConfig {
	/// OAuth credentials for the refresh grant.
	pub credentials: Credentials,
	/// Access token the process starts with.
	pub initial_access_token: Option<TokenSecret>,
	/// OAuth token endpoint.
	pub token_url: Url,
	/// Fixed upstream posts query.
	pub posts: PostsRequest,
	/// Refreshes a single request may trigger.
	pub max_refreshes: u32,
	/// Per-request outbound timeout.
	pub http_timeout: Option<std::time::Duration>,
	/// Address the HTTP front listens on.
	pub listen_addr: SocketAddr,
}
impl RelayConfig {
	/// Creates a configuration with defaults for every optional field.
	pub fn new(credentials: Credentials, token_url: Url, posts: PostsRequest) -> Self {
		Self {
			credentials,
			initial_access_token: None,
			token_url,
			posts,
			max_refreshes: DEFAULT_MAX_REFRESHES,
			http_timeout: None,
			listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
		}
	}

	/// Sets the access token the process starts with.
	pub fn with_access_token(mut self, token: Option<TokenSecret>) -> Self {
		self.initial_access_token = token;

		self
	}

	/// Sets the per-request refresh cap, which must be at least 1.
	pub fn with_max_refreshes(mut self, max_refreshes: u32) -> Result<Self, ConfigError> {
		if max_refreshes == 0 {
			return Err(ConfigError::ZeroRefreshCap);
		}

		self.max_refreshes = max_refreshes;

		Ok(self)
	}

	/// Sets the outbound request timeout.
	pub fn with_http_timeout(mut self, timeout: Option<std::time::Duration>) -> Self {
		self.http_timeout = timeout;

		self
	}

	/// Sets the listen address.
	pub fn with_listen_addr(mut self, addr: SocketAddr) -> Self {
		self.listen_addr = addr;

		self
	}
}
