//! Optional observability helpers for admissions.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit spans named `quota_governor.admission` with the `governor` (config
//!   name) and `stage` (call site) fields, plus a debug event whenever an admission must wait.
//! - Enable `metrics` to increment the `quota_governor_admission_total` counter, labeled by
//!   `governor` + `outcome`, and to record delayed waits in the `quota_governor_wait_seconds`
//!   histogram.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// How an admission was granted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdmissionOutcome {
	/// A token was available when the caller reached the head of the queue.
	Immediate,
	/// The caller slept until a token accrued.
	Delayed,
}
impl AdmissionOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AdmissionOutcome::Immediate => "immediate",
			AdmissionOutcome::Delayed => "delayed",
		}
	}
}
impl Display for AdmissionOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
