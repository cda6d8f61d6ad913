// self
use crate::{_prelude::*, error::Error, obs::FlowKind};

/// Future returned by [`FlowSpan::instrument`]; the bare future when `tracing` is off.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`FlowSpan::instrument`]; the bare future when `tracing` is off.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// `goalify_oauth.flow` span covering one step of a login for one registered service.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Opens a span for `step` of `kind` on behalf of `service`.
	pub fn new(kind: FlowKind, step: &'static str, service: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			Self {
				span: tracing::info_span!(
					"goalify_oauth.flow",
					flow = kind.as_str(),
					step,
					service
				),
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, step, service);

			Self {}
		}
	}

	/// Enters the span for the synchronous launch path.
	pub fn entered(self) -> FlowSpanGuard {
		#[cfg(feature = "tracing")]
		{
			FlowSpanGuard { _guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			FlowSpanGuard {}
		}
	}

	/// Attaches the span to a provider call without holding a guard across `.await`.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			tracing::Instrument::instrument(fut, self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Keeps a [`FlowSpan`] entered until dropped.
pub struct FlowSpanGuard {
	#[cfg(feature = "tracing")]
	_guard: tracing::span::EnteredSpan,
}
impl Debug for FlowSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("FlowSpanGuard(..)")
	}
}

/// Debug event emitted when the provider's `expires_in` is replaced by the fixed lifetime.
pub fn note_fixed_token_lifetime(reported_expires_in: Option<i64>) {
	#[cfg(feature = "tracing")]
	{
		if let Some(reported) = reported_expires_in {
			tracing::debug!(
				reported_expires_in = reported,
				fixed_lifetime_secs = crate::auth::FIXED_TOKEN_LIFETIME.whole_seconds(),
				"Ignoring provider-reported token lifetime."
			);
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = reported_expires_in;
	}
}

/// Warning emitted when a login fails, tagged with the failed step.
pub fn note_flow_failure(kind: FlowKind, error: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(
			flow = kind.as_str(),
			step = super::metrics::failed_step(error),
			error = %error,
			"Goalify login failed."
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, error);
	}
}
