//! Frostpane is a CPU kernel library for frosted-glass image effects.
//!
//! The kernels operate directly on packed premultiplied RGBA8 pixel memory
//! supplied by a host UI layer. Every entry point borrows the memory for
//! exactly one synchronous call and retains nothing:
//!
//! - Wrap host memory in a [`SurfaceRef`] / [`SurfaceMut`]
//! - Blur with [`gaussian_iir`], [`gaussian_iir_lanes`], or the box family
//! - Distort with [`chromatic_aberration`] or [`chromatic_dispersion`]
//!
//! Kernels never spawn threads or touch global state; calls on disjoint
//! buffers may run concurrently. Out-of-range sigma and radius values are
//! clamped with a `tracing` diagnostic rather than rejected, so a stale
//! host parameter degrades output instead of failing a frame.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Blur kernels: recursive Gaussian approximations and the box family.
pub mod blur;
/// Chromatic distortion kernels driven by auxiliary maps.
pub mod glass;
/// Shared bilinear/nearest sampling primitive.
pub mod sample;
/// Borrowed surface views over packed RGBA8 memory.
pub mod surface;

pub use crate::blur::boxblur::{
    FastBlurParams, MAX_FAST_RADIUS, MAX_RADIUS, box_blur, box_blur3, fast_box_blur,
};
pub use crate::blur::deriche::{DericheCoeffs, MAX_SIGMA, MIN_SIGMA, gaussian_iir};
pub use crate::blur::lanes::{gaussian_iir_lanes, lane_support};
pub use crate::foundation::error::{FrostpaneError, FrostpaneResult};
pub use crate::glass::aberration::{AberrationParams, chromatic_aberration};
pub use crate::glass::dispersion::{DispersionParams, chromatic_dispersion};
pub use crate::sample::{SampleMethod, resample, sample_channel};
pub use crate::surface::{BYTES_PER_PIXEL, SurfaceMut, SurfaceRef};
