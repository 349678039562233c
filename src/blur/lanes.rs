//! Vectorized recursive Gaussian: four channels per SIMD lane.
//!
//! Same algorithm as [`crate::blur::deriche`], with each pixel's four
//! channels packed into one `wide::f32x4`. The recursion is serial along the
//! scan direction, so the channel axis is the only parallelism available;
//! decode/encode routes through the scalar kernel's exact helpers and the
//! recurrence applies the same operations in the same order, which keeps the
//! two kernels within the documented ±1 per channel of each other (in
//! practice they agree exactly).

use wide::f32x4;

use crate::blur::deriche::{DericheCoeffs, MAX_SIGMA, MIN_SIGMA};
use crate::foundation::colorspace::{decode_rgba, encode_rgba};
use crate::foundation::error::{FrostpaneError, FrostpaneResult};
use crate::foundation::scratch::alloc_scratch;
use crate::surface::SurfaceMut;

/// Report whether the vector path is available on this hardware.
///
/// Stateless and recomputed per query; nothing is cached in globals. Hosts
/// consult this once and pick a kernel, rather than probing by invoking
/// [`gaussian_iir_lanes`] and handling the error. Targets without a known
/// 128-bit vector ISA report `false`.
pub fn lane_support() -> bool {
    #[cfg(target_arch = "x86_64")]
    {
        std::arch::is_x86_feature_detected!("sse2")
    }
    #[cfg(target_arch = "aarch64")]
    {
        std::arch::is_aarch64_feature_detected!("neon")
    }
    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        false
    }
}

/// Blur `surface` in place with the vectorized recursive Gaussian kernel.
///
/// Contract and parameters match [`crate::blur::deriche::gaussian_iir`];
/// outputs differ from the scalar kernel by at most 1 per channel per pixel.
/// When [`lane_support`] is false this returns a `Capability` error without
/// touching the buffer; it never silently computes a divergent result.
#[tracing::instrument(skip(surface))]
pub fn gaussian_iir_lanes(
    surface: &mut SurfaceMut<'_>,
    sigma: f32,
    linear: bool,
) -> FrostpaneResult<()> {
    if !lane_support() {
        return Err(FrostpaneError::capability(
            "vector lanes unavailable on this target, use the scalar kernel",
        ));
    }
    if !sigma.is_finite() {
        return Err(FrostpaneError::invalid_argument(format!(
            "sigma must be finite, got {sigma}"
        )));
    }
    if sigma <= MIN_SIGMA {
        return Ok(());
    }
    let sigma = if sigma > MAX_SIGMA {
        tracing::debug!(sigma, max = MAX_SIGMA, "sigma clamped");
        MAX_SIGMA
    } else {
        sigma
    };

    let coeffs = DericheCoeffs::from_sigma(sigma);
    let max_dim = surface.width().max(surface.height()) as usize;
    let mut pixels = alloc_scratch(max_dim, f32x4::ZERO)?;
    let mut line = alloc_scratch(max_dim, f32x4::ZERO)?;

    horizontal_pass(surface, &coeffs, &mut pixels, &mut line, linear);
    vertical_pass(surface, &coeffs, &mut pixels, &mut line, linear);
    Ok(())
}

// Identical recurrence to the scalar `filter_line`, lane-wise. Keeping the
// operation order the same is what makes the parity contract hold.
fn filter_line_x4(src: &[f32x4], dst: &mut [f32x4], c: &DericheCoeffs) {
    let len = src.len();
    if len == 0 {
        return;
    }
    let a0 = f32x4::splat(c.a0);
    let a1 = f32x4::splat(c.a1);
    let a2 = f32x4::splat(c.a2);
    let a3 = f32x4::splat(c.a3);
    let b1 = f32x4::splat(c.b1);
    let b2 = f32x4::splat(c.b2);

    let mut xp = src[0];
    let mut yp = xp * f32x4::splat(c.coefp);
    let mut yb = yp;
    for i in 0..len {
        let xc = src[i];
        let yc = a0 * xc + a1 * xp - b1 * yp - b2 * yb;
        dst[i] = yc;
        xp = xc;
        yb = yp;
        yp = yc;
    }

    let mut xn = src[len - 1];
    let mut xa = xn;
    let mut yn = xn * f32x4::splat(c.coefn);
    let mut ya = yn;
    for i in (0..len).rev() {
        let xc = src[i];
        let yc = a2 * xn + a3 * xa - b1 * yn - b2 * ya;
        dst[i] += yc;
        xa = xn;
        xn = xc;
        ya = yn;
        yn = yc;
    }
}

fn filter_pixels(pixels: &mut [f32x4], line: &mut [f32x4], c: &DericheCoeffs) {
    line.copy_from_slice(pixels);
    filter_line_x4(line, pixels, c);
}

fn horizontal_pass(
    surface: &mut SurfaceMut<'_>,
    c: &DericheCoeffs,
    pixels: &mut [f32x4],
    line: &mut [f32x4],
    linear: bool,
) {
    let w = surface.width() as usize;
    for y in 0..surface.height() {
        for (x, px) in surface.row(y).chunks_exact(4).enumerate() {
            pixels[x] = f32x4::from(decode_rgba([px[0], px[1], px[2], px[3]], linear));
        }

        filter_pixels(&mut pixels[..w], &mut line[..w], c);

        for (x, px) in surface.row_mut(y).chunks_exact_mut(4).enumerate() {
            px.copy_from_slice(&encode_rgba(pixels[x].to_array(), linear));
        }
    }
}

fn vertical_pass(
    surface: &mut SurfaceMut<'_>,
    c: &DericheCoeffs,
    pixels: &mut [f32x4],
    line: &mut [f32x4],
    linear: bool,
) {
    let h = surface.height();
    for x in 0..surface.width() {
        for y in 0..h {
            pixels[y as usize] = f32x4::from(decode_rgba(surface.pixel(x, y), linear));
        }

        filter_pixels(&mut pixels[..h as usize], &mut line[..h as usize], c);

        for y in 0..h {
            surface.set_pixel(x, y, encode_rgba(pixels[y as usize].to_array(), linear));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/blur/lanes.rs"]
mod tests;
