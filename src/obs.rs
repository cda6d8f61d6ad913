//! Optional observability hooks for the login flows.
//!
//! # Feature Flags
//!
//! - `tracing` emits spans named `goalify_oauth.flow` carrying `flow`, `step`, and `service`
//!   fields, a warning per failed login, and a debug event whenever a provider-reported
//!   `expires_in` is overridden.
//! - `metrics` increments `goalify_oauth_flow_total{flow,outcome}` per attempt and outcome, and
//!   `goalify_oauth_flow_failure_total{flow,step}` per failure.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::{_prelude::*, error::Error};

/// Records a failed login: warning event, failure outcome, and failed-step counter.
pub fn record_flow_failure(kind: FlowKind, error: &Error) {
	note_flow_failure(kind, error);
	record_flow_outcome(kind, FlowOutcome::Failure);
	record_failed_step(kind, error);
}

/// Login flows observed by the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Client-side launch of the authorization request.
	BeginLogin,
	/// Server-side code exchange and account fetch.
	CompleteLogin,
}
impl FlowKind {
	/// Stable label for span and metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::BeginLogin => "begin_login",
			FlowKind::CompleteLogin => "complete_login",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Flow entry.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated to the caller.
	Failure,
}
impl FlowOutcome {
	/// Stable label for span and metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
