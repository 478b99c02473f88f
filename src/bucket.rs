//! Token bucket arithmetic with lazy, timestamp-driven refill.
//!
//! The bucket holds a fractional token count that refills continuously at
//! `capacity / 3_600_000` tokens per millisecond. Nothing runs in the background: every
//! operation first recomputes the balance from the instant it is given and the stored
//! last-refill instant. External reads floor the balance, the internal value is never
//! truncated so rounding error cannot accumulate across many short intervals.
//!
//! [`Bucket`] is a plain value with `&mut self` methods. Sharing and serialization are the
//! [`Governor`](crate::governor::Governor)'s job.

// self
use crate::{_prelude::*, error::ConfigError, status::QuotaStatus};

/// Milliseconds in the quota window; a full bucket refills over exactly this span.
pub const REFILL_WINDOW_MS: f64 = 3_600_000.;

/// Outcome of [`Bucket::try_acquire`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Acquire {
	/// One token was consumed.
	Granted,
	/// The bucket held less than one token; nothing was consumed.
	Wait {
		/// Minimum milliseconds until one whole token is available.
		wait_ms: u64,
	},
}

/// Hourly token bucket state.
#[derive(Clone, Debug)]
pub struct Bucket {
	capacity: f64,
	tokens: f64,
	refill_rate: f64,
	last_refill_at: OffsetDateTime,
}
impl Bucket {
	/// Creates a full bucket allowing `requests_per_hour` admissions per hour.
	pub fn new(requests_per_hour: f64, now: OffsetDateTime) -> Result<Self, ConfigError> {
		let capacity = ConfigError::check_rate(requests_per_hour)?;

		Ok(Self {
			capacity,
			tokens: capacity,
			refill_rate: capacity / REFILL_WINDOW_MS,
			last_refill_at: now,
		})
	}

	/// Maximum number of tokens.
	pub fn capacity(&self) -> f64 {
		self.capacity
	}

	/// Tokens gained per millisecond.
	pub fn refill_rate(&self) -> f64 {
		self.refill_rate
	}

	/// Raw fractional balance as of the last refill.
	pub fn tokens(&self) -> f64 {
		self.tokens
	}

	/// Instant of the last refill.
	pub fn last_refill_at(&self) -> OffsetDateTime {
		self.last_refill_at
	}

	/// Credits the tokens accrued since the last refill, capped at capacity.
	///
	/// An instant earlier than the last refill credits nothing and leaves the stored instant
	/// untouched, so a wall clock stepping backwards cannot mint tokens later on.
	pub fn refill(&mut self, now: OffsetDateTime) {
		let elapsed_ms = (now - self.last_refill_at).whole_nanoseconds() as f64 / 1_000_000.;

		if elapsed_ms <= 0. {
			return;
		}

		// Multiply before dividing so whole-token boundaries land exactly.
		let accrued = elapsed_ms * self.capacity / REFILL_WINDOW_MS;

		self.tokens = (self.tokens + accrued).min(self.capacity);
		self.last_refill_at = now;
	}

	/// Refills, then returns the whole tokens available.
	pub fn available_tokens(&mut self, now: OffsetDateTime) -> u64 {
		self.refill(now);

		self.floored()
	}

	/// Refills, then reports whether one token could be taken right away.
	pub fn can_admit(&mut self, now: OffsetDateTime) -> bool {
		self.refill(now);

		self.tokens >= 1.
	}

	/// Refills, then returns the milliseconds until one whole token is available.
	pub fn required_wait_ms(&mut self, now: OffsetDateTime) -> u64 {
		self.refill(now);

		self.wait_ms()
	}

	/// Refills, then consumes one token if a whole one is present.
	///
	/// Never blocks. Callers that get [`Acquire::Wait`] sleep for the returned duration and
	/// try again; the [`Governor`](crate::governor::Governor) does so while holding its gate.
	pub fn try_acquire(&mut self, now: OffsetDateTime) -> Acquire {
		self.refill(now);

		if self.tokens >= 1. {
			self.tokens -= 1.;

			Acquire::Granted
		} else {
			Acquire::Wait { wait_ms: self.wait_ms() }
		}
	}

	/// Refills once and derives a mutually consistent [`QuotaStatus`].
	pub fn status(&mut self, now: OffsetDateTime) -> QuotaStatus {
		self.refill(now);

		let available = self.floored();
		let limit = self.capacity;
		let used = limit - available as f64;
		let reset_time_ms = if self.tokens >= self.capacity {
			0
		} else {
			((self.capacity - self.tokens) * REFILL_WINDOW_MS / self.capacity).ceil() as u64
		};

		QuotaStatus {
			available,
			limit,
			used,
			percent_used: (used / limit * 100.).round() as u8,
			can_admit: self.tokens >= 1.,
			wait_time_ms: self.wait_ms(),
			reset_time_ms,
		}
	}

	fn floored(&self) -> u64 {
		self.tokens.floor() as u64
	}

	fn wait_ms(&self) -> u64 {
		if self.tokens >= 1. {
			0
		} else {
			((1. - self.tokens) * REFILL_WINDOW_MS / self.capacity).ceil() as u64
		}
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	const START: OffsetDateTime = macros::datetime!(2025-11-10 12:00 UTC);

	fn at(ms: i64) -> OffsetDateTime {
		START + Duration::milliseconds(ms)
	}

	fn drained(capacity: f64) -> Bucket {
		let mut bucket = Bucket::new(capacity, START).expect("Bucket fixture should build.");

		while bucket.try_acquire(START) == Acquire::Granted {}

		bucket
	}

	#[test]
	fn new_bucket_starts_full() {
		let mut bucket = Bucket::new(100., START).expect("Bucket fixture should build.");

		assert_eq!(bucket.available_tokens(START), 100);
		assert_eq!(bucket.refill_rate(), 100. / REFILL_WINDOW_MS);
		assert!(bucket.can_admit(START));
		assert_eq!(bucket.required_wait_ms(START), 0);
	}

	#[test]
	fn invalid_capacity_is_rejected() {
		for rate in [0., -5., f64::NAN, f64::INFINITY] {
			assert!(Bucket::new(rate, START).is_err(), "Rate {rate} should not build a bucket.");
		}
	}

	#[test]
	fn sequential_acquires_decrement_by_one() {
		let mut bucket = Bucket::new(10., START).expect("Bucket fixture should build.");

		for n in 1..=10 {
			assert_eq!(bucket.try_acquire(START), Acquire::Granted);
			assert_eq!(bucket.available_tokens(START), 10 - n);
		}

		assert_eq!(bucket.try_acquire(START), Acquire::Wait { wait_ms: 360_000 });
		assert_eq!(bucket.tokens(), 0.);
	}

	#[test]
	fn one_token_accrues_after_a_hundredth_of_an_hour() {
		let mut bucket = drained(100.);

		assert_eq!(bucket.available_tokens(at(35_999)), 0);
		assert_eq!(bucket.available_tokens(at(36_000)), 1);
	}

	#[test]
	fn refill_matches_closed_form() {
		for capacity in [1_u64, 7, 100, 250, 5_000] {
			for elapsed in [1_i64, 999, 36_000, 72_001, 1_234_567, 3_599_999, 3_600_000] {
				let mut bucket = drained(capacity as f64);
				let expected = (elapsed as u64 * capacity / 3_600_000).min(capacity);

				assert_eq!(
					bucket.available_tokens(at(elapsed)),
					expected,
					"capacity={capacity} elapsed={elapsed}"
				);
			}
		}
	}

	#[test]
	fn refill_never_exceeds_capacity() {
		let mut bucket = drained(60.);

		assert_eq!(bucket.available_tokens(at(7_200_000)), 60);
		assert_eq!(bucket.tokens(), 60.);
	}

	#[test]
	fn refill_is_lazy_and_incremental() {
		let mut piecewise = drained(3_600.);
		let mut single = drained(3_600.);

		for step in 1..=1_000 {
			piecewise.refill(at(step));
		}

		single.refill(at(1_000));

		assert_eq!(piecewise.available_tokens(at(1_000)), 1);
		assert!((piecewise.tokens() - single.tokens()).abs() < 1e-9);
	}

	#[test]
	fn clock_stepping_backwards_credits_nothing() {
		let mut bucket = drained(3_600.);

		bucket.refill(at(500));
		bucket.refill(at(-10_000));

		assert!((bucket.tokens() - 0.5).abs() < 1e-12);
		assert_eq!(bucket.last_refill_at(), at(500));
	}

	#[test]
	fn wait_covers_fractional_deficit() {
		let mut bucket = drained(3_600.);

		assert_eq!(bucket.required_wait_ms(START), 1_000);
		assert_eq!(bucket.required_wait_ms(at(400)), 600);
		assert_eq!(bucket.try_acquire(at(400)), Acquire::Wait { wait_ms: 600 });
		assert_eq!(bucket.try_acquire(at(1_000)), Acquire::Granted);
		assert_eq!(bucket.tokens(), 0.);
	}

	#[test]
	fn two_per_hour_waits_thirty_minutes() {
		let mut bucket = drained(2.);

		assert_eq!(bucket.required_wait_ms(START), 1_800_000);
		assert_eq!(bucket.try_acquire(at(1_800_000)), Acquire::Granted);
	}

	#[test]
	fn tokens_stay_within_bounds() {
		let mut bucket = Bucket::new(5., START).expect("Bucket fixture should build.");
		let mut now = 0;

		for round in 0..200_i64 {
			now += (round * 7_919) % 1_500_000;

			while let Acquire::Wait { wait_ms } = bucket.try_acquire(at(now)) {
				assert!(wait_ms > 0);

				now += wait_ms as i64;
			}

			assert!((0. ..=5.).contains(&bucket.tokens()), "tokens={}", bucket.tokens());
		}
	}

	#[test]
	fn status_fields_are_consistent() {
		let mut bucket = Bucket::new(10., START).expect("Bucket fixture should build.");

		for _ in 0..3 {
			bucket.try_acquire(START);
		}

		let status = bucket.status(START);

		assert_eq!(status.available, 7);
		assert_eq!(status.limit, 10.);
		assert_eq!(status.used, 3.);
		assert_eq!(status.used + status.available as f64, status.limit);
		assert_eq!(status.percent_used, 30);
		assert!(status.can_admit);
		assert_eq!(status.wait_time_ms, 0);
		assert_eq!(status.reset_time_ms, 1_080_000);
	}

	#[test]
	fn status_of_drained_bucket() {
		let mut bucket = drained(4.);
		let status = bucket.status(at(450_000));

		assert_eq!(status.available, 0);
		assert_eq!(status.used, 4.);
		assert_eq!(status.percent_used, 100);
		assert!(!status.can_admit);
		assert_eq!(status.can_admit, status.available >= 1);
		assert_eq!(status.wait_time_ms, 450_000);
		assert_eq!(status.reset_time_ms, 3_150_000);
	}

	#[test]
	fn status_of_full_bucket_needs_no_reset() {
		let mut bucket = Bucket::new(3., START).expect("Bucket fixture should build.");
		let status = bucket.status(at(60_000));

		assert_eq!(status.reset_time_ms, 0);
		assert_eq!(status.percent_used, 0);
	}
}
