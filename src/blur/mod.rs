//! Blur kernels: recursive Gaussian approximations and the box family.
//!
//! Both approaches are separable row/column passes with per-pixel cost
//! independent of the blur width; they differ in quality and in how far
//! they can be accelerated.

/// Box blur family: single pass, triple pass, downsample pipeline.
pub mod boxblur;
/// Recursive Gaussian after Deriche, scalar kernel.
pub mod deriche;
/// Vectorized recursive Gaussian, four channels per lane.
pub mod lanes;
