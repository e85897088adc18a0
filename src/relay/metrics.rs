// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for relay fetches and token refreshes.
#[derive(Debug, Default)]
pub struct RelayMetrics {
	fetch_attempts: AtomicU64,
	fetch_success: AtomicU64,
	fetch_failure: AtomicU64,
	refresh_attempts: AtomicU64,
	refresh_success: AtomicU64,
	refresh_failure: AtomicU64,
	refresh_reuses: AtomicU64,
}
impl RelayMetrics {
	/// Returns the number of `fetch_posts` calls.
	pub fn fetch_attempts(&self) -> u64 {
		self.fetch_attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of `fetch_posts` calls that returned posts.
	pub fn fetch_successes(&self) -> u64 {
		self.fetch_success.load(Ordering::Relaxed)
	}

	/// Returns the number of `fetch_posts` calls that failed.
	pub fn fetch_failures(&self) -> u64 {
		self.fetch_failure.load(Ordering::Relaxed)
	}

	/// Returns the number of refresh-token exchanges sent to the provider.
	pub fn refresh_attempts(&self) -> u64 {
		self.refresh_attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of exchanges that produced a new access token.
	pub fn refresh_successes(&self) -> u64 {
		self.refresh_success.load(Ordering::Relaxed)
	}

	/// Returns the number of exchanges that failed.
	pub fn refresh_failures(&self) -> u64 {
		self.refresh_failure.load(Ordering::Relaxed)
	}

	/// Returns how often a waiter reused a token another request had just refreshed.
	pub fn refresh_reuses(&self) -> u64 {
		self.refresh_reuses.load(Ordering::Relaxed)
	}

	pub(crate) fn record_fetch_attempt(&self) {
		self.fetch_attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_fetch_success(&self) {
		self.fetch_success.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_fetch_failure(&self) {
		self.fetch_failure.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh_attempt(&self) {
		self.refresh_attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh_success(&self) {
		self.refresh_success.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh_failure(&self) {
		self.refresh_failure.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh_reuse(&self) {
		self.refresh_reuses.fetch_add(1, Ordering::Relaxed);
	}
}
