// self
use crate::{
	_prelude::*,
	obs::{FlowKind, FlowOutcome},
};

/// Counts relay flow transitions on `linkedin_relay_flow_total` when the `metrics` feature is on.
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"linkedin_relay_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	let _ = (kind, outcome);
}

/// Counts upstream responses on `linkedin_relay_upstream_responses_total`, labeled by endpoint
/// and status class, so token rejections can be told apart from LinkedIn outages.
pub fn record_upstream_response(endpoint: &'static str, status: StatusCode) {
	let class = status_class(status);

	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"linkedin_relay_upstream_responses_total",
			"endpoint" => endpoint,
			"class" => class
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	let _ = (endpoint, class);
}

/// Status bucket label; 401 stays separate from the other 4xx statuses.
fn status_class(status: StatusCode) -> &'static str {
	match status.as_u16() {
		401 => "unauthorized",
		200..=299 => "2xx",
		300..=399 => "3xx",
		400..=499 => "4xx",
		500..=599 => "5xx",
		_ => "other",
	}
}
