//! Outbound transport shared by the data API call and the token exchange.
//!
//! [`ReqwestHttpClient`] wraps a [`ReqwestClient`] configured the way both upstreams expect:
//! redirects are never followed and an optional timeout applies to every request.
//! [`ResponseMetadata`] captures the `Retry-After` hint of each response so the relay can log
//! failures with consistent detail.

// std
use std::ops::Deref;
// crates.io
use reqwest::{
	Response,
	header::{HeaderMap, RETRY_AFTER},
	redirect::Policy,
};
use time::format_description::well_known::Rfc2822;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
	obs,
};

/// `User-Agent` sent with every outbound request.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
/// Neither the token endpoint nor the data API should redirect; configure any custom
/// [`ReqwestClient`] passed to [`ReqwestHttpClient::with_client`] accordingly.
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Builds a client that refuses redirects and applies `timeout` when provided.
	pub fn build(timeout: Option<std::time::Duration>) -> Result<Self, ConfigError> {
		let mut builder = ReqwestClient::builder().redirect(Policy::none()).user_agent(USER_AGENT);

		if let Some(timeout) = timeout {
			builder = builder.timeout(timeout);
		}

		builder.build().map(Self).map_err(ConfigError::http_client_build)
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// Header-derived hints captured from an upstream response before its body is consumed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
}
impl ResponseMetadata {
	/// Captures the retry hint from response `headers`.
	pub fn from_headers(headers: &HeaderMap) -> Self {
		Self { retry_after: parse_retry_after(headers) }
	}
}

/// Fully-read upstream response.
#[derive(Debug)]
pub(crate) struct BufferedResponse {
	pub(crate) status: StatusCode,
	pub(crate) metadata: ResponseMetadata,
	pub(crate) body: Vec<u8>,
}
impl BufferedResponse {
	/// Reads `response` to completion, attributing transport failures to `endpoint`.
	pub(crate) async fn read(
		endpoint: &'static str,
		response: Response,
	) -> Result<Self, TransportError> {
		let status = response.status();
		let metadata = ResponseMetadata::from_headers(response.headers());

		obs::record_upstream_response(endpoint, status);

		let body = response
			.bytes()
			.await
			.map_err(|err| TransportError::network(endpoint, err))?
			.to_vec();

		Ok(Self { status, metadata, body })
	}

	/// Body decoded lossily as UTF-8 for error reporting.
	pub(crate) fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX)));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}

#[cfg(test)]
mod tests {
	// crates.io
	use reqwest::header::HeaderValue;
	// self
	use super::*;

	#[test]
	fn retry_after_accepts_seconds() {
		let mut headers = HeaderMap::new();

		headers.insert(RETRY_AFTER, HeaderValue::from_static("120"));

		assert_eq!(parse_retry_after(&headers), Some(Duration::seconds(120)));
	}

	#[test]
	fn retry_after_ignores_past_dates_and_garbage() {
		let mut headers = HeaderMap::new();

		headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));

		assert_eq!(parse_retry_after(&headers), None);

		headers.insert(RETRY_AFTER, HeaderValue::from_static("soon"));

		assert_eq!(parse_retry_after(&headers), None);
		assert_eq!(parse_retry_after(&HeaderMap::new()), None);
	}

	#[test]
	fn metadata_carries_only_header_hints() {
		let mut headers = HeaderMap::new();

		assert_eq!(ResponseMetadata::from_headers(&headers), ResponseMetadata::default());

		headers.insert(RETRY_AFTER, HeaderValue::from_static("30"));

		assert_eq!(
			ResponseMetadata::from_headers(&headers),
			ResponseMetadata { retry_after: Some(Duration::seconds(30)) }
		);
	}

	#[test]
	fn client_builds_with_and_without_timeout() {
		assert!(ReqwestHttpClient::build(None).is_ok());
		assert!(ReqwestHttpClient::build(Some(std::time::Duration::from_secs(5))).is_ok());
	}
}
