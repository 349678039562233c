//! Recursive Gaussian approximation after Deriche.
//!
//! A causal and an anti-causal second-order recursion are run along every row
//! and then every column of the row-blurred result; their sum approximates a
//! Gaussian with per-pixel cost independent of sigma. Filter history is
//! seeded with the steady-state response to the boundary pixel, so flat
//! regions stay flat right up to the edges.

use crate::foundation::colorspace::{decode_rgba, encode_rgba};
use crate::foundation::error::{FrostpaneError, FrostpaneResult};
use crate::foundation::scratch::alloc_scratch;
use crate::surface::SurfaceMut;

/// Sigma at or below this is a no-op; the kernel would be narrower than a
/// pixel.
pub const MIN_SIGMA: f32 = 0.1;

/// Largest accepted sigma; bigger values clamp here with a diagnostic.
pub const MAX_SIGMA: f32 = 50.0;

/// Recursive filter coefficients derived from one sigma.
///
/// A pure function of sigma, rebuilt fresh per call and never cached. The
/// internal derivation runs in double precision before rounding to f32.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DericheCoeffs {
    /// Causal feed-forward tap for x[n].
    pub a0: f32,
    /// Causal feed-forward tap for x[n-1].
    pub a1: f32,
    /// Anti-causal feed-forward tap for x[n+1].
    pub a2: f32,
    /// Anti-causal feed-forward tap for x[n+2].
    pub a3: f32,
    /// Recursive tap for y[n-1], shared by both passes.
    pub b1: f32,
    /// Recursive tap for y[n-2], shared by both passes.
    pub b2: f32,
    /// Steady-state boundary gain seeding the causal pass.
    pub coefp: f32,
    /// Steady-state boundary gain seeding the anti-causal pass.
    pub coefn: f32,
}

impl DericheCoeffs {
    /// Derive the coefficient set for `sigma`.
    ///
    /// Callers are expected to keep sigma in (`MIN_SIGMA`, `MAX_SIGMA`]; the
    /// constructor itself accepts any positive finite value.
    pub fn from_sigma(sigma: f32) -> Self {
        let alpha = 1.695 / f64::from(sigma);
        let ema = (-alpha).exp();
        let ema2 = ema * ema;
        let b1 = (-2.0 * ema) as f32;
        let b2 = ema2 as f32;
        let k = (1.0 - ema) * (1.0 - ema) / (1.0 + 2.0 * alpha * ema - ema2);
        let a0 = k as f32;
        let a1 = (k * ema * (alpha - 1.0)) as f32;
        let a2 = (k * ema * (alpha + 1.0)) as f32;
        let a3 = (-k * ema2) as f32;
        let gain = 1.0 + f64::from(b1) + f64::from(b2);
        let coefp = ((f64::from(a0) + f64::from(a1)) / gain) as f32;
        let coefn = ((f64::from(a2) + f64::from(a3)) / gain) as f32;
        Self {
            a0,
            a1,
            a2,
            a3,
            b1,
            b2,
            coefp,
            coefn,
        }
    }
}

// One 1-D filter application: causal sweep writes `dst`, anti-causal sweep
// accumulates on top. `src` must stay the unfiltered input for the second
// sweep, which is why the two slices are separate.
pub(crate) fn filter_line(src: &[f32], dst: &mut [f32], c: &DericheCoeffs) {
    let len = src.len();
    if len == 0 {
        return;
    }

    let mut xp = src[0];
    let mut yp = xp * c.coefp;
    let mut yb = yp;
    for i in 0..len {
        let xc = src[i];
        let yc = c.a0 * xc + c.a1 * xp - c.b1 * yp - c.b2 * yb;
        dst[i] = yc;
        xp = xc;
        yb = yp;
        yp = yc;
    }

    let mut xn = src[len - 1];
    let mut xa = xn;
    let mut yn = xn * c.coefn;
    let mut ya = yn;
    for i in (0..len).rev() {
        let xc = src[i];
        let yc = c.a2 * xn + c.a3 * xa - c.b1 * yn - c.b2 * ya;
        dst[i] += yc;
        xa = xn;
        xn = xc;
        ya = yn;
        yn = yc;
    }
}

/// Blur `surface` in place with the scalar recursive Gaussian kernel.
///
/// `sigma <= MIN_SIGMA` returns without touching the buffer; values above
/// [`MAX_SIGMA`] are clamped with a debug diagnostic. With `linear` set,
/// color channels are un-premultiplied and filtered in approximately linear
/// light (see [`crate`] docs on the fixed transfer pair). Alpha is filtered
/// like the color channels in both modes.
#[tracing::instrument(skip(surface))]
pub fn gaussian_iir(surface: &mut SurfaceMut<'_>, sigma: f32, linear: bool) -> FrostpaneResult<()> {
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
    let mut planes = alloc_scratch(max_dim * 4, 0.0f32)?;
    let mut line = alloc_scratch(max_dim, 0.0f32)?;

    horizontal_pass(surface, &coeffs, &mut planes, &mut line, linear);
    vertical_pass(surface, &coeffs, &mut planes, &mut line, linear);
    Ok(())
}

fn filter_planes(planes: &mut [f32], line: &mut [f32], len: usize, c: &DericheCoeffs) {
    for ch in 0..4 {
        let plane = &mut planes[ch * len..(ch + 1) * len];
        line[..len].copy_from_slice(plane);
        filter_line(&line[..len], plane, c);
    }
}

fn horizontal_pass(
    surface: &mut SurfaceMut<'_>,
    c: &DericheCoeffs,
    planes: &mut [f32],
    line: &mut [f32],
    linear: bool,
) {
    let w = surface.width() as usize;
    for y in 0..surface.height() {
        for (x, px) in surface.row(y).chunks_exact(4).enumerate() {
            let [r, g, b, a] = decode_rgba([px[0], px[1], px[2], px[3]], linear);
            planes[x] = r;
            planes[w + x] = g;
            planes[2 * w + x] = b;
            planes[3 * w + x] = a;
        }

        filter_planes(planes, line, w, c);

        for (x, px) in surface.row_mut(y).chunks_exact_mut(4).enumerate() {
            let bytes = encode_rgba(
                [planes[x], planes[w + x], planes[2 * w + x], planes[3 * w + x]],
                linear,
            );
            px.copy_from_slice(&bytes);
        }
    }
}

fn vertical_pass(
    surface: &mut SurfaceMut<'_>,
    c: &DericheCoeffs,
    planes: &mut [f32],
    line: &mut [f32],
    linear: bool,
) {
    let h = surface.height() as usize;
    for x in 0..surface.width() {
        for y in 0..h {
            let [r, g, b, a] = decode_rgba(surface.pixel(x, y as u32), linear);
            planes[y] = r;
            planes[h + y] = g;
            planes[2 * h + y] = b;
            planes[3 * h + y] = a;
        }

        filter_planes(planes, line, h, c);

        for y in 0..h {
            let bytes = encode_rgba(
                [planes[y], planes[h + y], planes[2 * h + y], planes[3 * h + y]],
                linear,
            );
            surface.set_pixel(x, y as u32, bytes);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/blur/deriche.rs"]
mod tests;
