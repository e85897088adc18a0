//! Single-writer access-token cell with monotonic versions.
//!
//! The relay never tracks expiry. A token is considered stale only after the data API rejects
//! it, at which point the refresh flow installs a replacement through
//! [`AccessTokenCell::compare_and_swap`]. Every accepted replacement bumps the version so a
//! refresh that started from an older snapshot can detect that another request already won.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Point-in-time view of the live access token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessToken {
	/// Bearer secret, absent when none was configured and no refresh has succeeded yet.
	pub secret: Option<TokenSecret>,
	/// Monotonic version; `0` is the configured value.
	pub version: u64,
	/// Instant the value was installed.
	pub stored_at: OffsetDateTime,
}

/// Result of an [`AccessTokenCell::compare_and_swap`] attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenSwap {
	/// The expected version matched and the new token is now live.
	Updated(AccessToken),
	/// Another writer got there first; carries the token that is live instead.
	Stale(AccessToken),
}
impl TokenSwap {
	/// Returns the live token regardless of which writer won.
	pub fn into_live(self) -> AccessToken {
		match self {
			TokenSwap::Updated(token) | TokenSwap::Stale(token) => token,
		}
	}
}

/// Thread-safe holder for the process-wide access token.
#[derive(Debug)]
pub struct AccessTokenCell(RwLock<AccessToken>);
impl AccessTokenCell {
	/// Seeds the cell with the configured token (version `0`).
	pub fn new(initial: Option<TokenSecret>) -> Self {
		Self(RwLock::new(AccessToken {
			secret: initial,
			version: 0,
			stored_at: OffsetDateTime::now_utc(),
		}))
	}

	/// Returns a copy of the live token.
	pub fn snapshot(&self) -> AccessToken {
		self.0.read().clone()
	}

	/// Returns the live version without cloning the secret.
	pub fn version(&self) -> u64 {
		self.0.read().version
	}

	/// Installs `secret` when the live version still equals `expected_version`.
	pub fn compare_and_swap(&self, expected_version: u64, secret: TokenSecret) -> TokenSwap {
		let mut guard = self.0.write();

		if guard.version != expected_version {
			return TokenSwap::Stale(guard.clone());
		}

		*guard = AccessToken {
			secret: Some(secret),
			version: guard.version.saturating_add(1),
			stored_at: OffsetDateTime::now_utc(),
		};

		TokenSwap::Updated(guard.clone())
	}
}
impl Default for AccessTokenCell {
	fn default() -> Self {
		Self::new(None)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn swap_bumps_version_and_replaces_secret() {
		let cell = AccessTokenCell::new(Some(TokenSecret::new("configured")));
		let before = cell.snapshot();

		assert_eq!(before.version, 0);
		assert_eq!(before.secret.as_ref().map(TokenSecret::expose), Some("configured"));

		let swapped = cell.compare_and_swap(0, TokenSecret::new("fresh"));

		assert!(matches!(swapped, TokenSwap::Updated(_)));

		let after = cell.snapshot();

		assert_eq!(after.version, 1);
		assert_eq!(after.secret.as_ref().map(TokenSecret::expose), Some("fresh"));
		assert!(after.stored_at >= before.stored_at);
	}

	#[test]
	fn stale_swap_keeps_the_winning_token() {
		let cell = AccessTokenCell::default();

		cell.compare_and_swap(0, TokenSecret::new("winner"));

		let outcome = cell.compare_and_swap(0, TokenSecret::new("loser"));
		let TokenSwap::Stale(live) = outcome else {
			panic!("A swap from an outdated version should be rejected.");
		};

		assert_eq!(live.version, 1);
		assert_eq!(live.secret.as_ref().map(TokenSecret::expose), Some("winner"));
		assert_eq!(cell.version(), 1);
	}

	#[test]
	fn versions_increase_monotonically() {
		let cell = AccessTokenCell::default();

		for expected in 0..5 {
			let live = cell.compare_and_swap(expected, TokenSecret::new(format!("t{expected}")));

			assert_eq!(live.into_live().version, expected + 1);
		}
	}
}
