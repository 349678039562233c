//! Physically motivated chromatic dispersion along glass edges.
//!
//! Refraction strength comes from Snell's law evaluated against an
//! edge-distance field: rays near an edge bend hardest, and each color
//! channel carries a slightly different refractive index, so the bent rays
//! separate into fringes. An optional normal field steers the bend; without
//! one the direction is radial from the image center.

use serde::{Deserialize, Serialize};

use crate::foundation::error::{FrostpaneError, FrostpaneResult};
use crate::sample::{SampleMethod, sample_channel};
use crate::surface::{SurfaceMut, SurfaceRef, require_same_size};

// Per-channel relative refractive indices, red through blue.
const CHANNEL_INDICES: [f32; 3] = [0.98, 1.0, 1.02];

// Edge-distance bytes rescale from [0, 255] to this many field units.
const EDGE_DISTANCE_RANGE: f32 = 500.0;

// Fixed amplification of the refraction offset, before device scaling.
const OFFSET_SCALE: f32 = 5.0;

/// Parameters for [`chromatic_dispersion`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispersionParams {
    /// Distance from the edge, in field units, over which refraction acts.
    /// Useful range is roughly 50 to 200.
    pub thickness: f32,
    /// Relative refractive index of the glass, about 1.5 for crown glass.
    /// Values below 1.0 clamp up with a diagnostic.
    pub refractive_factor: f32,
    /// How far the per-channel indices spread the offsets; glass sits
    /// around 7, zero disables the color separation entirely.
    pub dispersion_gain: f32,
    /// Device pixel ratio multiplied into every offset.
    pub device_pixel_ratio: f32,
    /// How refracted sample points resolve to bytes.
    pub method: SampleMethod,
}

impl Default for DispersionParams {
    fn default() -> Self {
        Self {
            thickness: 100.0,
            refractive_factor: 1.5,
            dispersion_gain: 7.0,
            device_pixel_ratio: 1.0,
            method: SampleMethod::Bilinear,
        }
    }
}

// Snell's-law bend factor. Zero at or beyond `thickness`, growing toward
// the edge; `refractive` must already be >= 1 so the asin stays in domain.
fn edge_factor(distance: f32, thickness: f32, refractive: f32) -> f32 {
    if distance >= thickness {
        return 0.0;
    }
    let t = 1.0 - distance / thickness;
    let theta_i = (t * t).asin();
    let theta_t = (theta_i.sin() / refractive).clamp(-1.0, 1.0).asin();
    (-(theta_t - theta_i).tan()).max(0.0)
}

// Unit-range surface normal at (x, y): decoded from the field when one is
// supplied (128 = zero component), radial from the image center otherwise.
fn normal_at(normals: Option<&SurfaceRef<'_>>, x: u32, y: u32, center: (f32, f32)) -> (f32, f32) {
    if let Some(field) = normals {
        let px = field.pixel(x, y);
        return (
            (f32::from(px[0]) - 128.0) / 127.0,
            (f32::from(px[1]) - 128.0) / 127.0,
        );
    }
    let dx = x as f32 - center.0;
    let dy = y as f32 - center.1;
    let len = (dx * dx + dy * dy).sqrt();
    if len > 0.0 { (dx / len, dy / len) } else { (0.0, 0.0) }
}

/// Refract the color channels of `src` near edges of a glass shape.
///
/// `edge_distance` encodes distance to the nearest edge in its red byte
/// (0 = on the edge, 255 = deep interior), rescaled internally to
/// `[0, 500]` field units. Within `thickness` of an edge, a Snell's-law
/// factor bends each channel along the local normal, scaled by that
/// channel's refractive index spread; interior pixels pass through
/// untouched. Alpha always comes from the unrefracted source pixel.
///
/// `normals` may be omitted, in which case the bend direction is radial
/// from the image center. All supplied buffers must share dimensions with
/// `dst`; a mismatch reports `InvalidArgument` before any pixel is written.
#[tracing::instrument(skip(src, edge_distance, normals, dst))]
pub fn chromatic_dispersion(
    src: &SurfaceRef<'_>,
    edge_distance: &SurfaceRef<'_>,
    normals: Option<&SurfaceRef<'_>>,
    dst: &mut SurfaceMut<'_>,
    params: &DispersionParams,
) -> FrostpaneResult<()> {
    if !params.thickness.is_finite()
        || !params.refractive_factor.is_finite()
        || !params.dispersion_gain.is_finite()
        || !params.device_pixel_ratio.is_finite()
    {
        return Err(FrostpaneError::invalid_argument(format!(
            "dispersion parameters must be finite, got thickness {} refractive {} gain {} dpr {}",
            params.thickness,
            params.refractive_factor,
            params.dispersion_gain,
            params.device_pixel_ratio
        )));
    }
    require_same_size("source", src, dst)?;
    require_same_size("edge distance field", edge_distance, dst)?;
    if let Some(field) = normals {
        require_same_size("normal field", field, dst)?;
    }

    let mut refractive = params.refractive_factor;
    if refractive < 1.0 {
        tracing::debug!(refractive, "refractive factor clamped to 1.0");
        refractive = 1.0;
    }

    let aspect = dst.width() as f32 / dst.height() as f32;
    let center = (
        (dst.width() as f32 - 1.0) * 0.5,
        (dst.height() as f32 - 1.0) * 0.5,
    );
    for y in 0..dst.height() {
        for x in 0..dst.width() {
            let distance =
                f32::from(edge_distance.pixel(x, y)[0]) / 255.0 * EDGE_DISTANCE_RANGE;
            let factor = edge_factor(distance, params.thickness, refractive);
            let mut out = src.pixel(x, y);
            if factor > 0.0 {
                let (nx, ny) = normal_at(normals, x, y, center);
                let strength = factor * OFFSET_SCALE * params.device_pixel_ratio;
                let base_dx = -nx * strength * aspect;
                let base_dy = -ny * strength;
                for (ch, index) in CHANNEL_INDICES.into_iter().enumerate() {
                    let spread = 1.0 - (index - 1.0) * params.dispersion_gain;
                    out[ch] = sample_channel(
                        src,
                        x as f32 + base_dx * spread,
                        y as f32 + base_dy * spread,
                        ch,
                        params.method,
                    );
                }
            }
            dst.set_pixel(x, y, out);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/glass/dispersion.rs"]
mod tests;
