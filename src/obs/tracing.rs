// crates.io
use tracing::instrument::Instrumented;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
// self
use crate::{_prelude::*, obs::FlowKind};

/// A span builder used by relay flows.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	span: tracing::Span,
}
impl FlowSpan {
	/// Creates a new span tagged with the provided flow kind + stage.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		let span = tracing::info_span!("linkedin_relay.flow", flow = kind.as_str(), stage);

		Self { span }
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> Instrumented<Fut>
	where
		Fut: Future,
	{
		use tracing::Instrument;

		fut.instrument(self.span.clone())
	}
}

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `level` when set. Calling this twice is a no-op for the second call.
pub fn init_tracing(level: &str, json: bool) {
	let registry = tracing_subscriber::registry().with(env_filter(level));
	let result = if json {
		registry.with(fmt::layer().json().with_target(true)).try_init()
	} else {
		registry.with(fmt::layer().with_target(false)).try_init()
	};

	if let Err(err) = result {
		tracing::debug!(error = %err, "Tracing subscriber already installed.");
	}
}

fn env_filter(level: &str) -> EnvFilter {
	EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = FlowSpan::new(FlowKind::Refresh, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}

	#[test]
	fn flow_events_render_inside_a_scoped_subscriber() {
		let subscriber = tracing_subscriber::registry()
			.with(env_filter("debug"))
			.with(fmt::layer().with_test_writer());

		tracing::subscriber::with_default(subscriber, || {
			let flow = FlowSpan::new(FlowKind::FetchPosts, "scoped_subscriber");

			flow.span.in_scope(|| tracing::debug!(bytes = 2, "Fetched LinkedIn posts."));
		});
	}
}
