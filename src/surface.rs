//! Borrowed views over packed premultiplied RGBA8 pixel memory.
//!
//! Hosts own the backing memory; kernels borrow a [`SurfaceRef`] or
//! [`SurfaceMut`] for exactly one call and never retain it. Geometry (width,
//! height, row stride) is validated once at construction, so a view that
//! exists is always safe to index and kernels never fail partway through a
//! write because of bad bounds.

use crate::foundation::error::{FrostpaneError, FrostpaneResult};

/// Bytes per packed RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Immutable view over packed premultiplied RGBA8 pixels.
///
/// Channel order is RGBA with red at byte offset 0. `stride` is in bytes and
/// may exceed `width * 4` for hosts that pad rows.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceRef<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    stride: usize,
}

/// Mutable view over packed premultiplied RGBA8 pixels.
///
/// Same geometry rules as [`SurfaceRef`]. Because the view borrows the
/// backing slice mutably, a kernel's source and destination can never alias.
#[derive(Debug)]
pub struct SurfaceMut<'a> {
    data: &'a mut [u8],
    width: u32,
    height: u32,
    stride: usize,
}

fn checked_row_bytes(width: u32) -> FrostpaneResult<usize> {
    (width as usize)
        .checked_mul(BYTES_PER_PIXEL)
        .ok_or_else(|| FrostpaneError::invalid_argument("surface width overflows"))
}

fn checked_geometry(len: usize, width: u32, height: u32, stride: usize) -> FrostpaneResult<()> {
    if width == 0 || height == 0 {
        return Err(FrostpaneError::invalid_argument(format!(
            "surface dimensions must be positive, got {width}x{height}"
        )));
    }
    let row_bytes = checked_row_bytes(width)?;
    if stride < row_bytes {
        return Err(FrostpaneError::invalid_argument(format!(
            "stride {stride} is smaller than row bytes {row_bytes}"
        )));
    }
    let required = (height as usize)
        .checked_mul(stride)
        .ok_or_else(|| FrostpaneError::invalid_argument("surface size overflows"))?;
    if len < required {
        return Err(FrostpaneError::invalid_argument(format!(
            "surface data holds {len} bytes, geometry requires {required}"
        )));
    }
    Ok(())
}

impl<'a> SurfaceRef<'a> {
    /// Wrap a tightly packed buffer (`stride == width * 4`).
    ///
    /// The slice length must be exactly `width * height * 4` bytes.
    pub fn new(data: &'a [u8], width: u32, height: u32) -> FrostpaneResult<Self> {
        let stride = checked_row_bytes(width)?;
        let expected = (height as usize)
            .checked_mul(stride)
            .ok_or_else(|| FrostpaneError::invalid_argument("surface size overflows"))?;
        if data.len() != expected {
            return Err(FrostpaneError::invalid_argument(format!(
                "packed surface expects {expected} bytes for {width}x{height}, got {}",
                data.len()
            )));
        }
        Self::with_stride(data, width, height, stride)
    }

    /// Wrap a row-padded buffer with an explicit stride in bytes.
    ///
    /// The slice must hold at least `height * stride` bytes.
    pub fn with_stride(
        data: &'a [u8],
        width: u32,
        height: u32,
        stride: usize,
    ) -> FrostpaneResult<Self> {
        checked_geometry(data.len(), width, height, stride)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Backing bytes, including any row padding.
    pub fn data(&self) -> &[u8] {
        self.data
    }

    pub(crate) fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.width as usize * BYTES_PER_PIXEL]
    }

    pub(crate) fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let o = y as usize * self.stride + x as usize * BYTES_PER_PIXEL;
        [
            self.data[o],
            self.data[o + 1],
            self.data[o + 2],
            self.data[o + 3],
        ]
    }
}

impl<'a> SurfaceMut<'a> {
    /// Wrap a tightly packed mutable buffer (`stride == width * 4`).
    ///
    /// The slice length must be exactly `width * height * 4` bytes.
    pub fn new(data: &'a mut [u8], width: u32, height: u32) -> FrostpaneResult<Self> {
        let stride = checked_row_bytes(width)?;
        let expected = (height as usize)
            .checked_mul(stride)
            .ok_or_else(|| FrostpaneError::invalid_argument("surface size overflows"))?;
        if data.len() != expected {
            return Err(FrostpaneError::invalid_argument(format!(
                "packed surface expects {expected} bytes for {width}x{height}, got {}",
                data.len()
            )));
        }
        Self::with_stride(data, width, height, stride)
    }

    /// Wrap a row-padded mutable buffer with an explicit stride in bytes.
    ///
    /// The slice must hold at least `height * stride` bytes.
    pub fn with_stride(
        data: &'a mut [u8],
        width: u32,
        height: u32,
        stride: usize,
    ) -> FrostpaneResult<Self> {
        checked_geometry(data.len(), width, height, stride)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Reborrow as an immutable view for the lifetime of the borrow.
    pub fn as_ref(&self) -> SurfaceRef<'_> {
        SurfaceRef {
            data: self.data,
            width: self.width,
            height: self.height,
            stride: self.stride,
        }
    }

    /// Copy every pixel from `src`, which must have the same dimensions.
    ///
    /// Strides may differ; row padding in either buffer is left alone.
    pub fn copy_from(&mut self, src: &SurfaceRef<'_>) -> FrostpaneResult<()> {
        if src.width() != self.width || src.height() != self.height {
            return Err(FrostpaneError::invalid_argument(format!(
                "copy between {}x{} and {}x{} surfaces",
                src.width(),
                src.height(),
                self.width,
                self.height
            )));
        }
        for y in 0..self.height {
            let dst = self.row_mut(y);
            dst.copy_from_slice(src.row(y));
        }
        Ok(())
    }

    pub(crate) fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.width as usize * BYTES_PER_PIXEL]
    }

    pub(crate) fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.stride;
        let row_bytes = self.width as usize * BYTES_PER_PIXEL;
        &mut self.data[start..start + row_bytes]
    }

    pub(crate) fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let o = y as usize * self.stride + x as usize * BYTES_PER_PIXEL;
        [
            self.data[o],
            self.data[o + 1],
            self.data[o + 2],
            self.data[o + 3],
        ]
    }

    pub(crate) fn set_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) {
        let o = y as usize * self.stride + x as usize * BYTES_PER_PIXEL;
        self.data[o..o + BYTES_PER_PIXEL].copy_from_slice(&px);
    }
}

// Auxiliary maps must cover the destination exactly; checked before any
// pixel write so a mismatch mutates nothing.
pub(crate) fn require_same_size(
    label: &str,
    map: &SurfaceRef<'_>,
    dst: &SurfaceMut<'_>,
) -> FrostpaneResult<()> {
    if map.width() != dst.width() || map.height() != dst.height() {
        return Err(FrostpaneError::invalid_argument(format!(
            "{label} is {}x{}, destination is {}x{}",
            map.width(),
            map.height(),
            dst.width(),
            dst.height()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/surface.rs"]
mod tests;
