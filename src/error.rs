//! Governor-level error types shared across construction and configuration.

// self
use crate::_prelude::*;

/// Governor-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical governor error exposed by public APIs.
///
/// Admission itself never fails once a governor exists, so every variant here is raised before
/// the first call to [`Governor::admit`](crate::governor::Governor::admit).
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
}

/// Configuration and validation failures raised while building a governor.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Requested rate is below one request per hour or not a finite number.
	#[error("Requests per hour must be a finite number of at least 1, got {rate}.")]
	InvalidRate {
		/// Rejected requests-per-hour value.
		rate: f64,
	},
	/// Configuration document could not be deserialized.
	#[error("Governor configuration is malformed at `{path}`.")]
	Parse {
		/// Dotted path to the offending field.
		path: String,
		/// Underlying deserialization failure.
		#[source]
		source: serde_json::Error,
	},
}
impl ConfigError {
	/// Checks that `rate` can back a token bucket.
	///
	/// A bucket must be able to hold at least one whole token, otherwise no admission could ever
	/// complete.
	pub fn check_rate(rate: f64) -> Result<f64, Self> {
		if rate.is_finite() && rate >= 1. { Ok(rate) } else { Err(Self::InvalidRate { rate }) }
	}
}
impl From<serde_path_to_error::Error<serde_json::Error>> for ConfigError {
	fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
		let path = e.path().to_string();

		Self::Parse { path, source: e.into_inner() }
	}
}
