// self
use crate::{
	error::Error,
	obs::{FlowKind, FlowOutcome},
};

/// Counter incremented once per login attempt, success, and failure.
pub const FLOW_COUNTER: &str = "goalify_oauth_flow_total";
/// Counter incremented per failed login, labelled with the step that failed.
pub const FLOW_FAILURE_COUNTER: &str = "goalify_oauth_flow_failure_total";

/// Bumps [`FLOW_COUNTER`] for `kind` and `outcome` on the global recorder, if one is installed.
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(FLOW_COUNTER, "flow" => kind.as_str(), "outcome" => outcome.as_str())
			.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Bumps [`FLOW_FAILURE_COUNTER`] with the provider step that failed, or `setup` for failures
/// raised before any provider call.
pub fn record_failed_step(kind: FlowKind, error: &Error) {
	let step = failed_step(error);

	#[cfg(feature = "metrics")]
	{
		metrics::counter!(FLOW_FAILURE_COUNTER, "flow" => kind.as_str(), "step" => step)
			.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, step);
	}
}

pub(crate) fn failed_step(error: &Error) -> &'static str {
	match error {
		Error::Launch { .. } | Error::LoginAborted => "launch",
		_ => error.stage().map_or("setup", |stage| stage.as_str()),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::{ConfigError, FlowStage};

	#[test]
	fn failures_are_labelled_by_step() {
		let rejected =
			Error::ProviderRejected { stage: FlowStage::AccountFetch, reason: "401".into() };
		let missing: Error = ConfigError::Missing { service: "goalify".into() }.into();

		assert_eq!(failed_step(&rejected), "identity_fetch");
		assert_eq!(failed_step(&missing), "setup");
		assert_eq!(failed_step(&Error::LoginAborted), "launch");

		record_flow_outcome(FlowKind::CompleteLogin, FlowOutcome::Failure);
		record_failed_step(FlowKind::CompleteLogin, &rejected);
	}
}
