//! FIFO admission gate in front of a shared [`Bucket`].
//!
//! [`Governor::admit`] queues callers on a fair async mutex and runs the refill-wait-decrement
//! sequence for exactly one caller at a time. The wait for an empty bucket happens while the
//! gate is held, so every waiter computes its delay against a bucket that already reflects all
//! callers ahead of it and the balance can never be over-drawn. Under contention admissions
//! become fully sequential, which is acceptable for a safety margin against an externally
//! enforced quota.
//!
//! Read-only queries ([`Governor::status`], [`Governor::available_tokens`], ...) never join the
//! queue. They lock the bucket state only for the duration of one refill and return advisory
//! snapshots.

mod metrics;

pub use metrics::AdmissionMetrics;

// self
use crate::{
	_prelude::*,
	bucket::{Acquire, Bucket},
	clock::{Clock, TokioClock},
	config::GovernorConfig,
	obs::{self, AdmissionOutcome, AdmissionSpan},
	status::{QuotaReport, QuotaStatus},
};

/// Client-side request governor for one hourly quota.
///
/// Construct one instance per governed resource and share it (typically behind an [`Arc`])
/// with every outbound call site.
pub struct Governor {
	name: String,
	bucket: Mutex<Bucket>,
	gate: AsyncMutex<()>,
	clock: Arc<dyn Clock>,
	metrics: AdmissionMetrics,
}
impl Governor {
	/// Creates a full governor allowing `requests_per_hour` admissions per hour, timed by a
	/// [`TokioClock`].
	pub fn new(requests_per_hour: f64) -> Result<Self> {
		Self::with_clock(requests_per_hour, Arc::new(TokioClock::new()))
	}

	/// Creates a governor timed by the caller-provided clock.
	pub fn with_clock(requests_per_hour: f64, clock: Arc<dyn Clock>) -> Result<Self> {
		let bucket = Bucket::new(requests_per_hour, clock.now())?;

		Ok(Self {
			name: GovernorConfig::DEFAULT_NAME.into(),
			bucket: Mutex::new(bucket),
			gate: AsyncMutex::new(()),
			clock,
			metrics: AdmissionMetrics::default(),
		})
	}

	/// Creates a governor from validated settings.
	pub fn from_config(config: &GovernorConfig) -> Result<Self> {
		Self::from_config_with_clock(config, Arc::new(TokioClock::new()))
	}

	/// Creates a governor from settings, timed by the caller-provided clock.
	pub fn from_config_with_clock(config: &GovernorConfig, clock: Arc<dyn Clock>) -> Result<Self> {
		config.validate()?;

		Ok(Self::with_clock(config.requests_per_hour, clock)?.with_name(config.name.clone()))
	}

	/// Sets the label used in spans and metrics.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();

		self
	}

	/// Label used in spans and metrics.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Hourly request limit.
	pub fn limit(&self) -> f64 {
		self.bucket.lock().capacity()
	}

	/// In-process admission counters.
	pub fn metrics(&self) -> &AdmissionMetrics {
		&self.metrics
	}

	/// Waits for the caller's turn, then consumes one token, sleeping first if the bucket is
	/// empty.
	///
	/// Admissions complete in the order they were requested. There is no timeout; a caller
	/// facing an empty bucket may wait up to one full refill period. Dropping the future
	/// releases its place in the queue.
	pub async fn admit(&self) {
		let span = AdmissionSpan::new(&self.name, "admit");

		span.instrument(async {
			let _turn = self.gate.lock().await;

			self.decrement().await;
		})
		.await
	}

	/// Admits the caller, then drives `call` to completion.
	pub async fn admit_then<Fut>(&self, call: Fut) -> Fut::Output
	where
		Fut: Future,
	{
		self.admit().await;

		call.await
	}

	/// Whole tokens available right now.
	pub fn available_tokens(&self) -> u64 {
		let mut bucket = self.bucket.lock();

		bucket.available_tokens(self.clock.now())
	}

	/// Whether an admission requested now would proceed without sleeping, ignoring any queue.
	pub fn can_admit(&self) -> bool {
		let mut bucket = self.bucket.lock();

		bucket.can_admit(self.clock.now())
	}

	/// Time until one whole token is available.
	pub fn required_wait(&self) -> Duration {
		let mut bucket = self.bucket.lock();

		Duration::milliseconds(bucket.required_wait_ms(self.clock.now()) as i64)
	}

	/// Consistent snapshot of the quota, derived from a single refill.
	pub fn status(&self) -> QuotaStatus {
		let mut bucket = self.bucket.lock();

		bucket.status(self.clock.now())
	}

	/// Operator-facing rendering of [`Governor::status`].
	pub fn report(&self) -> QuotaReport {
		self.status().report()
	}

	// Must only run while `gate` is held.
	async fn decrement(&self) {
		let mut waited = Duration::ZERO;

		loop {
			let (wait, tokens) = {
				let mut bucket = self.bucket.lock();

				match bucket.try_acquire(self.clock.now()) {
					Acquire::Granted => break,
					// Float rounding can leave the balance a hair under one after a full wait.
					Acquire::Wait { wait_ms } =>
						(Duration::milliseconds(wait_ms.max(1) as i64), bucket.tokens()),
				}
			};

			obs::trace_wait(&self.name, wait, tokens);

			self.clock.sleep(wait).await;

			waited += wait;
		}

		let outcome =
			if waited.is_zero() { AdmissionOutcome::Immediate } else { AdmissionOutcome::Delayed };

		self.metrics.record(outcome, waited);
		obs::record_admission(&self.name, outcome, waited);
	}
}
impl Debug for Governor {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Governor")
			.field("name", &self.name)
			.field("bucket", &*self.bucket.lock())
			.field("metrics", &self.metrics)
			.finish()
	}
}
