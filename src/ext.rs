//! Public extension contracts for code that consumes a governor.
//!
//! Outbound-call collaborators can depend on [`Admission`] instead of the concrete
//! [`Governor`](crate::governor::Governor) so tests and alternative gates can be swapped in.

pub mod admission;

pub use admission::*;
