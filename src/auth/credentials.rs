//! OAuth client credentials used for the refresh-token grant.

// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Client identity plus the long-lived refresh token, fixed for the process lifetime.
#[derive(Clone, Debug)]
pub struct Credentials {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// OAuth 2.0 client secret.
	pub client_secret: TokenSecret,
	/// Long-lived refresh token exchanged for new access tokens.
	pub refresh_token: TokenSecret,
}
impl Credentials {
	/// Builds credentials, rejecting blank values.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<TokenSecret>,
		refresh_token: impl Into<TokenSecret>,
	) -> Result<Self, ConfigError> {
		let client_id = client_id.into();
		let client_secret = client_secret.into();
		let refresh_token = refresh_token.into();

		if client_id.trim().is_empty() {
			return Err(ConfigError::BlankCredential { name: "client_id" });
		}
		if client_secret.is_blank() {
			return Err(ConfigError::BlankCredential { name: "client_secret" });
		}
		if refresh_token.is_blank() {
			return Err(ConfigError::BlankCredential { name: "refresh_token" });
		}

		Ok(Self { client_id, client_secret, refresh_token })
	}

	/// Form fields for a `grant_type=refresh_token` exchange.
	pub(crate) fn refresh_form(&self) -> [(&'static str, &str); 4] {
		[
			("grant_type", "refresh_token"),
			("refresh_token", self.refresh_token.expose()),
			("client_id", &self.client_id),
			("client_secret", self.client_secret.expose()),
		]
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn blank_values_are_rejected() {
		let err = Credentials::new(" ", "secret", "refresh")
			.expect_err("Blank client identifiers should be rejected.");

		assert!(matches!(err, ConfigError::BlankCredential { name: "client_id" }));

		let err = Credentials::new("client", "secret", "")
			.expect_err("Blank refresh tokens should be rejected.");

		assert!(matches!(err, ConfigError::BlankCredential { name: "refresh_token" }));
	}

	#[test]
	fn refresh_form_carries_every_field() {
		let credentials = Credentials::new("client", "secret", "refresh")
			.expect("Credentials fixture should build successfully.");

		assert_eq!(
			credentials.refresh_form(),
			[
				("grant_type", "refresh_token"),
				("refresh_token", "refresh"),
				("client_id", "client"),
				("client_secret", "secret"),
			]
		);

		let debug = format!("{credentials:?}");

		assert!(debug.contains("<redacted>"));
		assert!(!debug.contains("\"refresh\""));
	}
}
