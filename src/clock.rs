//! Time sources used by the governor for refill arithmetic and admission waits.
//!
//! The bucket never runs a background timer; every refill is recomputed from
//! [`Clock::now`] and the stored last-refill instant. Waits go through [`Clock::sleep`] so tests
//! can drive time deterministically with [`ManualClock`] or tokio's paused clock via
//! [`TokioClock`].

// std
use std::time::Duration as StdDuration;
// crates.io
use tokio::time::Instant;
// self
use crate::_prelude::*;

/// Boxed future returned by [`Clock::sleep`].
pub type SleepFuture<'a> = Pin<Box<dyn Future<Output = ()> + 'a + Send>>;

/// Wall-clock source paired with a cooperative sleep primitive.
pub trait Clock
where
	Self: Send + Sync,
{
	/// Returns the current wall-clock instant.
	fn now(&self) -> OffsetDateTime;

	/// Suspends the caller for `duration` without busy-waiting.
	///
	/// Non-positive durations resolve immediately.
	fn sleep(&self, duration: Duration) -> SleepFuture<'_>;
}

/// Default clock backed by the tokio timer.
///
/// Wall time is anchored once at construction and then advanced by
/// [`tokio::time::Instant`], so it is monotonic and honours `tokio::time::pause`.
#[derive(Clone, Debug)]
pub struct TokioClock {
	wall: OffsetDateTime,
	anchor: Instant,
}
impl TokioClock {
	/// Anchors a new clock at the current UTC time.
	pub fn new() -> Self {
		Self { wall: OffsetDateTime::now_utc(), anchor: Instant::now() }
	}
}
impl Default for TokioClock {
	fn default() -> Self {
		Self::new()
	}
}
impl Clock for TokioClock {
	fn now(&self) -> OffsetDateTime {
		self.wall + self.anchor.elapsed()
	}

	fn sleep(&self, duration: Duration) -> SleepFuture<'_> {
		let duration = StdDuration::try_from(duration).unwrap_or_default();

		Box::pin(tokio::time::sleep(duration))
	}
}

/// Manually driven clock for deterministic tests and simulations.
///
/// Time only moves through [`ManualClock::advance`] or when a caller sleeps on it; sleeping
/// advances the clock by the full duration and resolves immediately. Every sleep is recorded.
#[derive(Debug)]
pub struct ManualClock {
	now: Mutex<OffsetDateTime>,
	sleeps: Mutex<Vec<Duration>>,
}
impl ManualClock {
	/// Creates a clock frozen at `start`.
	pub fn new(start: OffsetDateTime) -> Self {
		Self { now: Mutex::new(start), sleeps: Mutex::default() }
	}

	/// Moves the clock forward by `delta`. Negative deltas are ignored.
	pub fn advance(&self, delta: Duration) {
		if delta.is_positive() {
			*self.now.lock() += delta;
		}
	}

	/// Returns every duration passed to [`Clock::sleep`], in call order.
	pub fn sleeps(&self) -> Vec<Duration> {
		self.sleeps.lock().clone()
	}

	/// Returns the sum of all recorded sleeps.
	pub fn total_slept(&self) -> Duration {
		self.sleeps.lock().iter().fold(Duration::ZERO, |acc, d| acc + *d)
	}
}
impl Default for ManualClock {
	fn default() -> Self {
		Self::new(OffsetDateTime::UNIX_EPOCH)
	}
}
impl Clock for ManualClock {
	fn now(&self) -> OffsetDateTime {
		*self.now.lock()
	}

	fn sleep(&self, duration: Duration) -> SleepFuture<'_> {
		self.sleeps.lock().push(duration);
		self.advance(duration);

		Box::pin(std::future::ready(()))
	}
}
