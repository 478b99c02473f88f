// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{_prelude::*, obs::AdmissionOutcome};

/// Thread-safe counters for completed admissions.
#[derive(Debug, Default)]
pub struct AdmissionMetrics {
	admitted: AtomicU64,
	delayed: AtomicU64,
	waited_ms: AtomicU64,
}
impl AdmissionMetrics {
	/// Returns the total number of completed admissions.
	pub fn admitted(&self) -> u64 {
		self.admitted.load(Ordering::Relaxed)
	}

	/// Returns the number of admissions that had to sleep for a token.
	pub fn delayed(&self) -> u64 {
		self.delayed.load(Ordering::Relaxed)
	}

	/// Returns the cumulative time admissions spent sleeping for tokens.
	pub fn waited(&self) -> Duration {
		Duration::milliseconds(self.waited_ms.load(Ordering::Relaxed) as i64)
	}

	pub(crate) fn record(&self, outcome: AdmissionOutcome, waited: Duration) {
		self.admitted.fetch_add(1, Ordering::Relaxed);

		if matches!(outcome, AdmissionOutcome::Delayed) {
			self.delayed.fetch_add(1, Ordering::Relaxed);
			self.waited_ms.fetch_add(waited.whole_milliseconds() as u64, Ordering::Relaxed);
		}
	}
}
