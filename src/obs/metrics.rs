// self
use crate::{_prelude::*, obs::AdmissionOutcome};

/// Records an admission via the global metrics recorder (when enabled).
pub fn record_admission(governor: &str, outcome: AdmissionOutcome, waited: Duration) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"quota_governor_admission_total",
			"governor" => governor.to_owned(),
			"outcome" => outcome.as_str()
		)
		.increment(1);

		if matches!(outcome, AdmissionOutcome::Delayed) {
			metrics::histogram!("quota_governor_wait_seconds", "governor" => governor.to_owned())
				.record(waited.as_seconds_f64());
		}
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (governor, outcome, waited);
	}
}
