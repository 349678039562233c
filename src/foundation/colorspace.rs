// Fast sRGB <-> linear pair plus the packed-pixel decode/encode used by both
// IIR kernels. The scalar and lanes kernels must route through these exact
// functions so their conversions agree bit for bit.

// Alpha below this is treated as fully transparent when un-premultiplying.
pub(crate) const UNPREMUL_EPSILON: f32 = 0.001;

// pow(x, 2.2) approximation, exact at 0 and 1.
pub(crate) fn srgb_to_linear(s: f32) -> f32 {
    s * s * (s * 0.2 + 0.8)
}

// pow(x, 1/2.2) approximation. Not the exact inverse of `srgb_to_linear`;
// the pair shifts midtones slightly and that shift is part of the contract.
pub(crate) fn linear_to_srgb(l: f32) -> f32 {
    l.sqrt() * (1.0 - 0.2 * l)
}

// Decode one packed premultiplied pixel to normalized floats. With `linear`
// set, color channels are un-premultiplied (zeroed when alpha is below
// `UNPREMUL_EPSILON`) and moved to linear space; alpha stays normalized.
pub(crate) fn decode_rgba(px: [u8; 4], linear: bool) -> [f32; 4] {
    let mut r = f32::from(px[0]) / 255.0;
    let mut g = f32::from(px[1]) / 255.0;
    let mut b = f32::from(px[2]) / 255.0;
    let a = f32::from(px[3]) / 255.0;
    if linear {
        if a > UNPREMUL_EPSILON {
            r = srgb_to_linear(r / a);
            g = srgb_to_linear(g / a);
            b = srgb_to_linear(b / a);
        } else {
            r = 0.0;
            g = 0.0;
            b = 0.0;
        }
    }
    [r, g, b, a]
}

// Inverse of `decode_rgba` up to quantization: back to sRGB, re-premultiply,
// round and clamp into bytes.
pub(crate) fn encode_rgba(px: [f32; 4], linear: bool) -> [u8; 4] {
    let [mut r, mut g, mut b, mut a] = px;
    if linear {
        a = a.clamp(0.0, 1.0);
        r = linear_to_srgb(r) * a;
        g = linear_to_srgb(g) * a;
        b = linear_to_srgb(b) * a;
    }
    [quantize(r), quantize(g), quantize(b), quantize(a)]
}

fn quantize(v: f32) -> u8 {
    (v * 255.0 + 0.5).clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/colorspace.rs"]
mod tests;
