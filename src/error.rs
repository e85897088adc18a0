//! Relay-level error types shared across the upstream client, token refresh, and HTTP front.

// self
use crate::_prelude::*;

/// Relay-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical relay error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, body read).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Data API answered with a non-success status other than 401.
	#[error("Failed to fetch LinkedIn posts: {status} {status_text}: {body}")]
	Upstream {
		/// HTTP status code returned by the data API.
		status: u16,
		/// Canonical reason phrase for `status`.
		status_text: String,
		/// Raw response body.
		body: String,
	},
	/// Token endpoint rejected the refresh-token exchange.
	#[error("Failed to refresh access token: {status} {status_text}: {body}")]
	Refresh {
		/// HTTP status code returned by the token endpoint.
		status: u16,
		/// Canonical reason phrase for `status`.
		status_text: String,
		/// Raw response body.
		body: String,
	},
	/// Data API kept rejecting the bearer token after every allowed refresh.
	#[error("LinkedIn still rejected the access token after {refreshes} refresh attempt(s).")]
	Unauthorized {
		/// Number of refreshes performed before giving up.
		refreshes: u32,
	},
	/// A success response carried a body that is not the expected JSON document.
	#[error("The {endpoint} endpoint returned malformed JSON.")]
	MalformedResponse {
		/// Which endpoint produced the body.
		endpoint: &'static str,
		/// Structured parsing failure.
		#[source]
		source: BoxError,
	},
}
impl Error {
	/// Wraps a parsing failure for the named endpoint.
	pub fn malformed(
		endpoint: &'static str,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::MalformedResponse { endpoint, source: Box::new(src) }
	}

	pub(crate) fn upstream(status: StatusCode, body: String) -> Self {
		Self::Upstream { status: status.as_u16(), status_text: status_text(status), body }
	}

	pub(crate) fn refresh(status: StatusCode, body: String) -> Self {
		Self::Refresh { status: status.as_u16(), status_text: status_text(status), body }
	}
}

/// Configuration and validation failures raised while assembling the relay.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A configured endpoint is not a valid absolute URL.
	#[error("The {field} URL is invalid.")]
	InvalidUrl {
		/// Configuration field that failed to parse.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A required credential was empty.
	#[error("The {name} credential must not be blank.")]
	BlankCredential {
		/// Credential label.
		name: &'static str,
	},
	/// The per-request refresh cap must allow at least one refresh.
	#[error("The refresh cap must be at least 1.")]
	ZeroRefreshCap,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the {endpoint} endpoint: {source}")]
	Network {
		/// Which endpoint was being called.
		endpoint: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error raised while calling `endpoint`.
	pub fn network(
		endpoint: &'static str,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}
}

fn status_text(status: StatusCode) -> String {
	status.canonical_reason().unwrap_or_default().to_owned()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn upstream_display_embeds_status_and_body() {
		let err = Error::upstream(StatusCode::INTERNAL_SERVER_ERROR, "boom".into());

		assert_eq!(
			err.to_string(),
			"Failed to fetch LinkedIn posts: 500 Internal Server Error: boom"
		);
	}

	#[test]
	fn refresh_display_embeds_status_and_body() {
		let err = Error::refresh(StatusCode::BAD_REQUEST, "{\"error\":\"invalid_grant\"}".into());

		assert!(matches!(err, Error::Refresh { status: 400, .. }));
		assert_eq!(
			err.to_string(),
			"Failed to refresh access token: 400 Bad Request: {\"error\":\"invalid_grant\"}"
		);
	}

	#[test]
	fn unknown_status_has_empty_reason() {
		let status = StatusCode::from_u16(599).expect("Status 599 should be representable.");

		assert_eq!(status_text(status), "");
	}
}
