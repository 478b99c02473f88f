//! Quota snapshots and their operator-facing rendering.

// self
use crate::_prelude::*;

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60_000;

/// Point-in-time view of a bucket, derived from a single refill.
///
/// Snapshots are advisory. They do not reserve a token and may be stale as soon as another
/// caller is admitted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuotaStatus {
	/// Whole tokens available.
	pub available: u64,
	/// Bucket capacity (requests per hour).
	pub limit: f64,
	/// `limit - available`.
	pub used: f64,
	/// `used / limit` as a rounded percentage.
	pub percent_used: u8,
	/// Whether one request could be admitted without waiting.
	pub can_admit: bool,
	/// Milliseconds until the next whole token.
	pub wait_time_ms: u64,
	/// Milliseconds until the bucket is full again.
	pub reset_time_ms: u64,
}
impl QuotaStatus {
	/// Time until the next whole token.
	pub fn wait_time(&self) -> Duration {
		Duration::milliseconds(self.wait_time_ms as i64)
	}

	/// Time until the bucket is full again.
	pub fn reset_time(&self) -> Duration {
		Duration::milliseconds(self.reset_time_ms as i64)
	}

	/// Converts the snapshot into the coarse units shown to operators.
	pub fn report(&self) -> QuotaReport {
		QuotaReport {
			available: self.available,
			limit: self.limit,
			used: self.used,
			percent_used: self.percent_used,
			can_request_now: self.can_admit,
			wait_seconds: self.wait_time_ms.div_ceil(MS_PER_SECOND),
			reset_minutes: self.reset_time_ms.div_ceil(MS_PER_MINUTE),
		}
	}
}

/// Quota status as rendered to an operator or diagnostic tool.
///
/// Waits are rounded up so the report never promises capacity sooner than the bucket does.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuotaReport {
	/// Requests that can be made right now.
	pub available: u64,
	/// Hourly request limit.
	pub limit: f64,
	/// Requests counted against the current window.
	pub used: f64,
	/// Rounded percentage of the limit in use.
	pub percent_used: u8,
	/// Whether a request would be admitted without waiting.
	pub can_request_now: bool,
	/// Seconds until the next request can be made.
	pub wait_seconds: u64,
	/// Minutes until the full quota is restored.
	pub reset_minutes: u64,
}
impl From<QuotaStatus> for QuotaReport {
	fn from(status: QuotaStatus) -> Self {
		status.report()
	}
}
impl Display for QuotaReport {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(
			f,
			"{}/{} requests available ({}% used); ",
			self.available, self.limit, self.percent_used
		)?;

		if self.can_request_now {
			f.write_str("next request: now; ")?;
		} else {
			write!(f, "next request in {}s; ", self.wait_seconds)?;
		}

		write!(f, "full reset in {} min", self.reset_minutes)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn status(available: u64, wait_time_ms: u64, reset_time_ms: u64) -> QuotaStatus {
		let limit = 100.;
		let used = limit - available as f64;

		QuotaStatus {
			available,
			limit,
			used,
			percent_used: used as u8,
			can_admit: available >= 1,
			wait_time_ms,
			reset_time_ms,
		}
	}

	#[test]
	fn report_rounds_waits_up() {
		let report = status(0, 1_001, 60_001).report();

		assert_eq!(report.wait_seconds, 2);
		assert_eq!(report.reset_minutes, 2);

		let report = status(0, 36_000, 3_600_000).report();

		assert_eq!(report.wait_seconds, 36);
		assert_eq!(report.reset_minutes, 60);
	}

	#[test]
	fn report_display_for_operators() {
		assert_eq!(
			status(0, 36_000, 3_600_000).report().to_string(),
			"0/100 requests available (100% used); next request in 36s; full reset in 60 min"
		);
		assert_eq!(
			QuotaReport::from(status(40, 0, 2_160_000)).to_string(),
			"40/100 requests available (60% used); next request: now; full reset in 36 min"
		);
	}

	#[test]
	fn durations_mirror_millisecond_fields() {
		let status = status(0, 1_800_000, 3_600_000);

		assert_eq!(status.wait_time(), Duration::minutes(30));
		assert_eq!(status.reset_time(), Duration::HOUR);
	}

	#[test]
	fn report_serializes_with_field_names() {
		let value = serde_json::to_value(status(99, 0, 36_000).report())
			.expect("Quota report should serialize to JSON.");

		assert_eq!(value["available"], 99);
		assert_eq!(value["can_request_now"], true);
		assert_eq!(value["reset_minutes"], 1);
	}
}
