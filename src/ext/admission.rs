//! Admission contract shared by every outbound call site.

// self
use crate::{_prelude::*, governor::Governor, status::QuotaStatus};

/// Boxed future returned by [`Admission::admit`].
pub type AdmitFuture<'a> = Pin<Box<dyn Future<Output = ()> + 'a + Send>>;

/// Gate consulted once before every unit of remote work.
pub trait Admission
where
	Self: Send + Sync,
{
	/// Resolves once the caller may perform one remote call.
	fn admit(&self) -> AdmitFuture<'_>;

	/// Returns an advisory snapshot of the remaining quota.
	fn status(&self) -> QuotaStatus;
}
impl Admission for Governor {
	fn admit(&self) -> AdmitFuture<'_> {
		Box::pin(Governor::admit(self))
	}

	fn status(&self) -> QuotaStatus {
		Governor::status(self)
	}
}
