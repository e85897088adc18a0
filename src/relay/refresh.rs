//! Refresh-token exchange with a singleflight guard and versioned token swaps.
//!
//! [`Relay::refresh_access_token`] takes the version of the token the caller saw rejected.
//! Refreshes run one at a time; a caller that acquires the guard after another request already
//! installed a newer version reuses that token instead of spending another exchange.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, TokenSecret, TokenSwap},
	error::TransportError,
	http::BufferedResponse,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	relay::{Relay, TOKEN_ENDPOINT},
};

/// Successful token endpoint payload.
#[derive(Clone, Debug, Deserialize)]
pub struct RefreshResponse {
	/// Newly issued bearer token.
	pub access_token: TokenSecret,
	/// Lifetime of `access_token` in seconds, when reported.
	#[serde(default)]
	pub expires_in: Option<i64>,
	/// Rotated refresh token, when the provider issues one.
	#[serde(default)]
	pub refresh_token: Option<TokenSecret>,
	/// Lifetime of `refresh_token` in seconds, when reported.
	#[serde(default)]
	pub refresh_token_expires_in: Option<i64>,
	/// Granted scopes.
	#[serde(default)]
	pub scope: Option<String>,
}
impl RefreshResponse {
	/// Parses a token endpoint body, reporting the failing field path on error.
	pub fn parse(body: &[u8]) -> Result<Self> {
		let mut deserializer = serde_json::Deserializer::from_slice(body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|err| Error::malformed(TOKEN_ENDPOINT, err))
	}
}

impl Relay {
	/// Exchanges the refresh token for a new access token unless `observed_version` is already
	/// outdated, in which case the live token is returned without contacting the provider.
	pub async fn refresh_access_token(&self, observed_version: u64) -> Result<AccessToken> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "refresh_access_token");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let _singleflight = self.refresh_guard.lock().await;
				let live = self.token.snapshot();

				if live.version != observed_version {
					self.metrics.record_refresh_reuse();
					tracing::debug!(
						observed_version,
						live_version = live.version,
						"Reusing access token refreshed by a concurrent request."
					);

					return Ok(live);
				}

				self.metrics.record_refresh_attempt();

				let response = self.exchange_refresh_token().await.inspect_err(|_| {
					self.metrics.record_refresh_failure();
				})?;

				if response
					.refresh_token
					.as_ref()
					.is_some_and(|rotated| rotated != &self.credentials.refresh_token)
				{
					tracing::debug!("Provider rotated the refresh token; keeping the configured one.");
				}

				let swap = self.token.compare_and_swap(observed_version, response.access_token);
				let live = match swap {
					TokenSwap::Updated(live) => {
						tracing::info!(
							version = live.version,
							expires_in = response.expires_in,
							"Stored refreshed access token."
						);

						live
					},
					TokenSwap::Stale(live) => {
						tracing::warn!(
							version = live.version,
							"Discarded refreshed access token in favor of a newer one."
						);

						live
					},
				};

				self.metrics.record_refresh_success();

				Ok(live)
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(err) => {
				tracing::error!(error = %err, "Failed to refresh access token.");
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
			},
		}

		result
	}

	async fn exchange_refresh_token(&self) -> Result<RefreshResponse> {
		let form = self.credentials.refresh_form();
		let response = self
			.http_client
			.post(self.token_url.clone())
			.form(&form[..])
			.send()
			.await
			.map_err(|err| TransportError::network(TOKEN_ENDPOINT, err))?;
		let response = BufferedResponse::read(TOKEN_ENDPOINT, response).await?;

		if !response.status.is_success() {
			let body = response.text();

			tracing::error!(
				status = response.status.as_u16(),
				retry_after = ?response.metadata.retry_after,
				body = %body,
				"Token endpoint rejected the refresh request."
			);

			return Err(Error::refresh(response.status, body));
		}

		RefreshResponse::parse(&response.body)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn parses_linkedin_refresh_payload() {
		let body = br#"{"access_token":"fresh","expires_in":5183999,"refresh_token":"rt","refresh_token_expires_in":31535999,"scope":"r_organization_social"}"#;
		let response = RefreshResponse::parse(body).expect("LinkedIn refresh payload should parse.");

		assert_eq!(response.access_token.expose(), "fresh");
		assert_eq!(response.expires_in, Some(5_183_999));
		assert_eq!(response.refresh_token.as_ref().map(TokenSecret::expose), Some("rt"));
		assert_eq!(response.scope.as_deref(), Some("r_organization_social"));
	}

	#[test]
	fn missing_access_token_reports_malformed_json() {
		let err = RefreshResponse::parse(br#"{"expires_in":60}"#)
			.expect_err("Payloads without access_token should be rejected.");

		assert!(matches!(err, Error::MalformedResponse { endpoint: TOKEN_ENDPOINT, .. }));
	}

	#[test]
	fn wrong_field_type_names_the_path() {
		let err = RefreshResponse::parse(br#"{"access_token":"a","expires_in":"soon"}"#)
			.expect_err("String lifetimes should be rejected.");
		let Error::MalformedResponse { source, .. } = err else {
			panic!("Type mismatches should surface as malformed responses.");
		};

		assert!(source.to_string().starts_with("expires_in"));
	}
}
