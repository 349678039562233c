//! Chromatic aberration driven by a displacement map.
//!
//! Each pixel reads a 2-D displacement from the map (red byte = X, green
//! byte = Y, 128 = none) scaled by `displacement_scale / 255`, then samples
//! the three color channels from slightly different spots along it, fringing
//! edges the way an uncorrected lens does. The per-channel offset is one
//! scalar added to both axes; hosts wanting independent axes bake the
//! difference into the map itself.

use serde::{Deserialize, Serialize};

use crate::foundation::error::{FrostpaneError, FrostpaneResult};
use crate::sample::{SampleMethod, sample_channel};
use crate::surface::{SurfaceMut, SurfaceRef, require_same_size};

/// Parameters for [`chromatic_aberration`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AberrationParams {
    /// Displacement strength; a full-scale map delta of 128 moves the
    /// sample point by about `displacement_scale / 2` pixels. Useful range
    /// is roughly 10 to 100.
    pub displacement_scale: f32,
    /// Extra pixels added to the red sample position on both axes.
    pub red_offset: f32,
    /// Extra pixels added to the green sample position on both axes.
    pub green_offset: f32,
    /// Extra pixels added to the blue sample position on both axes.
    pub blue_offset: f32,
    /// How displaced sample points resolve to bytes. Nearest is two to
    /// three times faster, bilinear avoids mosaic artifacts.
    pub method: SampleMethod,
}

impl Default for AberrationParams {
    fn default() -> Self {
        Self {
            displacement_scale: 70.0,
            red_offset: 0.0,
            green_offset: -0.05,
            blue_offset: -0.1,
            method: SampleMethod::Bilinear,
        }
    }
}

/// Separate the color channels of `src` along a displacement map.
///
/// The map encodes per-pixel direction in its red (X) and green (Y) bytes
/// with 128 meaning zero. Each color channel of the output is sampled at
/// `(x, y) + base + offset` with the channel's scalar offset added to X and
/// Y alike; alpha is copied from the undisplaced source pixel so coverage
/// never shifts. `src`, `displacement` and `dst` must share dimensions;
/// a mismatch reports `InvalidArgument` before any pixel is written.
#[tracing::instrument(skip(src, displacement, dst))]
pub fn chromatic_aberration(
    src: &SurfaceRef<'_>,
    displacement: &SurfaceRef<'_>,
    dst: &mut SurfaceMut<'_>,
    params: &AberrationParams,
) -> FrostpaneResult<()> {
    if !params.displacement_scale.is_finite()
        || !params.red_offset.is_finite()
        || !params.green_offset.is_finite()
        || !params.blue_offset.is_finite()
    {
        return Err(FrostpaneError::invalid_argument(format!(
            "aberration parameters must be finite, got scale {} offsets {} {} {}",
            params.displacement_scale, params.red_offset, params.green_offset, params.blue_offset
        )));
    }
    require_same_size("source", src, dst)?;
    require_same_size("displacement map", displacement, dst)?;

    let scale = params.displacement_scale / 255.0;
    for y in 0..dst.height() {
        for x in 0..dst.width() {
            let map = displacement.pixel(x, y);
            let base_dx = (f32::from(map[0]) - 128.0) * scale;
            let base_dy = (f32::from(map[1]) - 128.0) * scale;
            let fx = x as f32;
            let fy = y as f32;
            let sample = |offset: f32, ch: usize| {
                sample_channel(
                    src,
                    fx + base_dx + offset,
                    fy + base_dy + offset,
                    ch,
                    params.method,
                )
            };
            let out = [
                sample(params.red_offset, 0),
                sample(params.green_offset, 1),
                sample(params.blue_offset, 2),
                src.pixel(x, y)[3],
            ];
            dst.set_pixel(x, y, out);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/glass/aberration.rs"]
mod tests;
