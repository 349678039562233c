//! Shared plumbing: error taxonomy, colorspace transforms, scratch
//! allocation.

pub(crate) mod colorspace;
/// Error and result types shared by every kernel entry point.
pub mod error;
pub(crate) mod scratch;
