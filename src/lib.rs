//! Client-side request governor for remote APIs with a fixed hourly quota.
//!
//! A [`Governor`](governor::Governor) wraps a lazily refilled token bucket behind a FIFO
//! admission gate. Call [`admit`](governor::Governor::admit) once before every unit of remote
//! work and [`status`](governor::Governor::status) or [`report`](governor::Governor::report)
//! whenever an operator asks how much quota is left.
//!
//! ```
//! # #[tokio::main(flavor = "current_thread")] async fn main() -> quota_governor::error::Result<()> {
//! use std::sync::Arc;
//!
//! use quota_governor::governor::Governor;
//!
//! let governor = Arc::new(Governor::new(5_000.)?);
//!
//! governor.admit().await;
//!
//! assert_eq!(governor.available_tokens(), 4_999);
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod bucket;
pub mod clock;
pub mod config;
pub mod error;
pub mod ext;
pub mod governor;
pub mod obs;
pub mod status;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{clock::ManualClock, governor::Governor};

	/// Builds a governor driven by a [`ManualClock`] starting at the Unix epoch.
	pub fn test_governor(requests_per_hour: f64) -> (Governor, Arc<ManualClock>) {
		let clock = Arc::new(ManualClock::default());
		let governor = Governor::with_clock(requests_per_hour, clock.clone())
			.expect("Failed to build governor for tests.");

		(governor, clock)
	}
}

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use tokio::sync::Mutex as AsyncMutex;

	pub use crate::error::{Error, Result};
}

#[cfg(test)] use color_eyre as _;
