// self
use crate::_prelude::*;

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedAdmission<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedAdmission<F> = F;

/// A span builder used around admissions.
#[derive(Clone, Debug)]
pub struct AdmissionSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl AdmissionSpan {
	/// Creates a new span tagged with the governor name + stage.
	pub fn new(governor: &str, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("quota_governor.admission", governor, stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (governor, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedAdmission<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a debug event before an admission sleeps for a token.
pub fn trace_wait(governor: &str, wait: Duration, tokens: f64) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(
			governor,
			wait_ms = wait.whole_milliseconds() as u64,
			tokens,
			"Waiting for a quota token."
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (governor, wait, tokens);
	}
}
