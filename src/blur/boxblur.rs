//! Box blur family: single pass, triple pass, and a downsample-accelerated
//! pipeline.
//!
//! The single pass is a separable moving average with a sliding accumulator,
//! so cost is independent of radius. Window indices clamp to the surface
//! (edge replication, not wraparound). Applied three times the result is
//! close to a Gaussian of sigma ≈ radius/2; the downsample pipeline trades
//! quality for roughly a 1/downscale² speedup.

use serde::{Deserialize, Serialize};

use crate::foundation::error::{FrostpaneError, FrostpaneResult};
use crate::foundation::scratch::alloc_scratch;
use crate::sample::{SampleMethod, resample};
use crate::surface::{SurfaceMut, SurfaceRef};

/// Largest accepted radius for [`box_blur`] and [`box_blur3`]; bigger values
/// clamp here with a diagnostic.
pub const MAX_RADIUS: i32 = 50;

/// Largest accepted radius for [`fast_box_blur`]; bigger values clamp here
/// with a diagnostic.
pub const MAX_FAST_RADIUS: f32 = 25.0;

fn box_pass_h(src: &SurfaceRef<'_>, dst: &mut SurfaceMut<'_>, radius: i32) {
    let w = i64::from(src.width());
    let r = i64::from(radius);
    let inv = 1.0 / (2 * radius + 1) as f32;
    for y in 0..src.height() {
        let src_row = src.row(y);
        let mut sum = [0u32; 4];
        for i in -r..=r {
            let o = i.clamp(0, w - 1) as usize * 4;
            for ch in 0..4 {
                sum[ch] += u32::from(src_row[o + ch]);
            }
        }
        let dst_row = dst.row_mut(y);
        for x in 0..w {
            let o = x as usize * 4;
            for ch in 0..4 {
                dst_row[o + ch] = (sum[ch] as f32 * inv + 0.5) as u8;
            }
            let left = (x - r).max(0) as usize * 4;
            let right = (x + r + 1).min(w - 1) as usize * 4;
            for ch in 0..4 {
                sum[ch] += u32::from(src_row[right + ch]);
                sum[ch] -= u32::from(src_row[left + ch]);
            }
        }
    }
}

fn box_pass_v(src: &SurfaceRef<'_>, dst: &mut SurfaceMut<'_>, radius: i32) {
    let h = i64::from(src.height());
    let r = i64::from(radius);
    let inv = 1.0 / (2 * radius + 1) as f32;
    for x in 0..src.width() {
        let mut sum = [0u32; 4];
        for i in -r..=r {
            let px = src.pixel(x, i.clamp(0, h - 1) as u32);
            for ch in 0..4 {
                sum[ch] += u32::from(px[ch]);
            }
        }
        for y in 0..h {
            let mut out = [0u8; 4];
            for ch in 0..4 {
                out[ch] = (sum[ch] as f32 * inv + 0.5) as u8;
            }
            dst.set_pixel(x, y as u32, out);
            let top = src.pixel(x, (y - r).max(0) as u32);
            let bottom = src.pixel(x, (y + r + 1).min(h - 1) as u32);
            for ch in 0..4 {
                sum[ch] += u32::from(bottom[ch]);
                sum[ch] -= u32::from(top[ch]);
            }
        }
    }
}

// radius <= 0 means no work; above `max` clamps with a diagnostic.
fn effective_radius(radius: i32, max: i32) -> Option<i32> {
    if radius <= 0 {
        return None;
    }
    if radius > max {
        tracing::debug!(radius, max, "radius clamped");
        return Some(max);
    }
    Some(radius)
}

/// Blur `surface` in place with one separable box pass.
///
/// `radius <= 0` returns without touching the buffer; `radius` above
/// [`MAX_RADIUS`] is clamped with a debug diagnostic.
#[tracing::instrument(skip(surface))]
pub fn box_blur(surface: &mut SurfaceMut<'_>, radius: i32) -> FrostpaneResult<()> {
    let Some(radius) = effective_radius(radius, MAX_RADIUS) else {
        return Ok(());
    };
    let (w, h) = (surface.width(), surface.height());
    let mut mid_buf = alloc_scratch(w as usize * 4 * h as usize, 0u8)?;
    let mut mid = SurfaceMut::new(&mut mid_buf, w, h)?;
    box_pass_h(&surface.as_ref(), &mut mid, radius);
    box_pass_v(&mid.as_ref(), surface, radius);
    Ok(())
}

/// Blur `surface` in place with three box passes.
///
/// Three applications of the moving average approximate a Gaussian of
/// sigma ≈ radius/2. Same radius handling as [`box_blur`].
#[tracing::instrument(skip(surface))]
pub fn box_blur3(surface: &mut SurfaceMut<'_>, radius: i32) -> FrostpaneResult<()> {
    let Some(radius) = effective_radius(radius, MAX_RADIUS) else {
        return Ok(());
    };
    let (w, h) = (surface.width(), surface.height());
    let len = w as usize * 4 * h as usize;
    let mut ping_buf = alloc_scratch(len, 0u8)?;
    let mut mid_buf = alloc_scratch(len, 0u8)?;
    let mut ping = SurfaceMut::new(&mut ping_buf, w, h)?;
    let mut mid = SurfaceMut::new(&mut mid_buf, w, h)?;

    box_pass_h(&surface.as_ref(), &mut mid, radius);
    box_pass_v(&mid.as_ref(), &mut ping, radius);
    box_pass_h(&ping.as_ref(), &mut mid, radius);
    box_pass_v(&mid.as_ref(), surface, radius);
    box_pass_h(&surface.as_ref(), &mut mid, radius);
    box_pass_v(&mid.as_ref(), &mut ping, radius);
    surface.copy_from(&ping.as_ref())
}

/// Parameters for [`fast_box_blur`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FastBlurParams {
    /// Blur radius in source pixels, effective range 0 to [`MAX_FAST_RADIUS`].
    pub radius: f32,
    /// Downscale factor in [0.01, 1.0]; smaller is faster and rougher.
    pub downscale: f32,
    /// Resampling method for both the down and the up leg.
    pub method: SampleMethod,
}

impl Default for FastBlurParams {
    fn default() -> Self {
        Self {
            radius: 8.0,
            downscale: 0.5,
            method: SampleMethod::Nearest,
        }
    }
}

/// Blur `surface` in place via downsample, one box pass, upsample.
///
/// The radius is scaled by `downscale` (rounded, at least 1) so the small
/// blur covers the same apparent area. `radius < 0.5` returns without
/// touching the buffer; out-of-range radius/downscale clamp with a debug
/// diagnostic. Quality degrades as `downscale` shrinks while the box pass
/// runs on ~`downscale²` of the pixels.
#[tracing::instrument(skip(surface))]
pub fn fast_box_blur(surface: &mut SurfaceMut<'_>, params: &FastBlurParams) -> FrostpaneResult<()> {
    if !params.radius.is_finite() || !params.downscale.is_finite() {
        return Err(FrostpaneError::invalid_argument(format!(
            "fast blur parameters must be finite, got radius {} downscale {}",
            params.radius, params.downscale
        )));
    }
    let mut radius = params.radius;
    if radius > MAX_FAST_RADIUS {
        tracing::debug!(radius, max = MAX_FAST_RADIUS, "radius clamped");
        radius = MAX_FAST_RADIUS;
    }
    if radius < 0.5 {
        return Ok(());
    }
    let mut downscale = params.downscale;
    if !(0.01..=1.0).contains(&downscale) {
        tracing::debug!(downscale, "downscale clamped into [0.01, 1.0]");
        downscale = downscale.clamp(0.01, 1.0);
    }

    let small_w = ((surface.width() as f32 * downscale + 0.5) as u32).max(1);
    let small_h = ((surface.height() as f32 * downscale + 0.5) as u32).max(1);
    let scaled_radius = ((radius * downscale + 0.5) as i32).max(1);
    tracing::debug!(small_w, small_h, scaled_radius, "downsample pipeline");

    let small_len = small_w as usize * 4 * small_h as usize;
    let mut small_buf = alloc_scratch(small_len, 0u8)?;
    let mut mid_buf = alloc_scratch(small_len, 0u8)?;
    let mut blur_buf = alloc_scratch(small_len, 0u8)?;

    let mut small = SurfaceMut::new(&mut small_buf, small_w, small_h)?;
    resample(&surface.as_ref(), &mut small, params.method);

    let mut mid = SurfaceMut::new(&mut mid_buf, small_w, small_h)?;
    let mut blurred = SurfaceMut::new(&mut blur_buf, small_w, small_h)?;
    box_pass_h(&small.as_ref(), &mut mid, scaled_radius);
    box_pass_v(&mid.as_ref(), &mut blurred, scaled_radius);

    resample(&blurred.as_ref(), surface, params.method);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/blur/boxblur.rs"]
mod tests;
