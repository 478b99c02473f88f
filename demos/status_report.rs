//! Drains a small governor, then prints the operator report while waiting for quota.
//!
//! Run with `cargo run --example status_report`.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
// self
use quota_governor::{config::GovernorConfig, governor::Governor};

#[tokio::main(flavor = "current_thread", start_paused = true)]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = GovernorConfig::from_json_str(r#"{ "requests_per_hour": 4, "name": "demo" }"#)?;
	let governor = Arc::new(Governor::from_config(&config)?);

	for call in 1..=6 {
		governor.admit().await;

		println!("call {call} admitted; {}", governor.report());
	}

	println!(
		"{} admissions, {} delayed, {} min spent waiting",
		governor.metrics().admitted(),
		governor.metrics().delayed(),
		governor.metrics().waited().whole_minutes()
	);

	Ok(())
}
