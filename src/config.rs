//! Declarative governor configuration.

// self
use crate::{_prelude::*, error::ConfigError};

/// Settings for one governed resource.
///
/// ```
/// use quota_governor::config::GovernorConfig;
///
/// let config = GovernorConfig::from_json_str(r#"{ "requests_per_hour": 5000, "name": "github" }"#)
/// 	.expect("Config should parse.");
///
/// assert_eq!(config.requests_per_hour, 5_000.);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GovernorConfig {
	/// Hourly quota enforced by the remote API.
	pub requests_per_hour: f64,
	/// Label attached to spans and metrics; defaults to [`GovernorConfig::DEFAULT_NAME`].
	#[serde(default = "GovernorConfig::default_name")]
	pub name: String,
}
impl GovernorConfig {
	/// Label used when none is configured.
	pub const DEFAULT_NAME: &'static str = "default";

	/// Creates a config for the provided hourly quota.
	pub fn new(requests_per_hour: f64) -> Self {
		Self { requests_per_hour, name: Self::default_name() }
	}

	/// Overrides the observability label.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();

		self
	}

	/// Parses and validates a JSON document.
	pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
		let mut de = serde_json::Deserializer::from_str(json);
		let config: Self = serde_path_to_error::deserialize(&mut de)?;

		config.validate()?;

		Ok(config)
	}

	/// Rejects rates that cannot back a bucket.
	pub fn validate(&self) -> Result<(), ConfigError> {
		ConfigError::check_rate(self.requests_per_hour).map(|_| ())
	}

	fn default_name() -> String {
		Self::DEFAULT_NAME.into()
	}
}
