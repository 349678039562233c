use super::*;

use crate::foundation::error::FrostpaneError;

fn bytes(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1664525).wrapping_add(1013904223);
            (state >> 24) as u8
        })
        .collect()
}

fn column_ramp(w: u32, h: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for _y in 0..h {
        for x in 0..w {
            let v = (x * 20) as u8;
            data.extend_from_slice(&[v, v, v, 255]);
        }
    }
    data
}

fn edge_field(w: u32, h: u32, value: u8) -> Vec<u8> {
    [value, 0, 0, 255].repeat((w * h) as usize)
}

#[test]
fn interior_pixels_pass_through() {
    let (w, h) = (6u32, 5u32);
    let src_data = bytes((w * h * 4) as usize, 91);
    let edge_data = edge_field(w, h, 255);
    let mut out = vec![0u8; src_data.len()];

    let src = SurfaceRef::new(&src_data, w, h).unwrap();
    let edge = SurfaceRef::new(&edge_data, w, h).unwrap();
    let mut dst = SurfaceMut::new(&mut out, w, h).unwrap();
    chromatic_dispersion(&src, &edge, None, &mut dst, &DispersionParams::default()).unwrap();
    assert_eq!(out, src_data);
}

#[test]
fn edge_band_refracts_along_radial_normal() {
    // On the right edge of a 9x9 image the radial normal is (1, 0), so the
    // bend pulls samples leftward down the column ramp, red hardest.
    let (w, h) = (9u32, 9u32);
    let src_data = column_ramp(w, h);
    let edge_data = edge_field(w, h, 0);
    let mut out = vec![0u8; src_data.len()];

    let src = SurfaceRef::new(&src_data, w, h).unwrap();
    let edge = SurfaceRef::new(&edge_data, w, h).unwrap();
    let mut dst = SurfaceMut::new(&mut out, w, h).unwrap();
    let params = DispersionParams {
        method: SampleMethod::Nearest,
        ..DispersionParams::default()
    };
    chromatic_dispersion(&src, &edge, None, &mut dst, &params).unwrap();

    let refracted = dst.pixel(8, 4);
    let original = src.pixel(8, 4);
    assert!(refracted[0] < original[0]);
    assert_eq!(refracted, [40, 40, 60, 255]);
}

#[test]
fn zero_gain_moves_channels_together() {
    let (w, h) = (9u32, 1u32);
    let src_data = column_ramp(w, h);
    let edge_data = edge_field(w, h, 0);
    let mut out = vec![0u8; src_data.len()];

    let src = SurfaceRef::new(&src_data, w, h).unwrap();
    let edge = SurfaceRef::new(&edge_data, w, h).unwrap();
    let mut dst = SurfaceMut::new(&mut out, w, h).unwrap();
    let params = DispersionParams {
        dispersion_gain: 0.0,
        ..DispersionParams::default()
    };
    chromatic_dispersion(&src, &edge, None, &mut dst, &params).unwrap();

    for x in 0..w {
        let px = dst.pixel(x, 0);
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
        assert_eq!(px[3], 255);
    }
}

#[test]
fn normal_field_overrides_radial_direction() {
    let (w, h) = (5u32, 5u32);
    let src_data = column_ramp(w, h);
    let edge_data = edge_field(w, h, 0);

    // Radially the exact center has no direction, so it stays put.
    let mut out = vec![0u8; src_data.len()];
    let src = SurfaceRef::new(&src_data, w, h).unwrap();
    let edge = SurfaceRef::new(&edge_data, w, h).unwrap();
    let mut dst = SurfaceMut::new(&mut out, w, h).unwrap();
    chromatic_dispersion(&src, &edge, None, &mut dst, &DispersionParams::default()).unwrap();
    assert_eq!(dst.pixel(2, 2), src.pixel(2, 2));

    // A supplied normal field gives the center a direction and it moves.
    let normal_data: Vec<u8> = [255, 128, 0, 255].repeat((w * h) as usize);
    let normals = SurfaceRef::new(&normal_data, w, h).unwrap();
    let mut out = vec![0u8; src_data.len()];
    let mut dst = SurfaceMut::new(&mut out, w, h).unwrap();
    chromatic_dispersion(&src, &edge, Some(&normals), &mut dst, &DispersionParams::default())
        .unwrap();
    assert_ne!(dst.pixel(2, 2)[1], src.pixel(2, 2)[1]);
}

#[test]
fn refractive_below_one_clamps_to_identity() {
    let (w, h) = (5u32, 5u32);
    let src_data = column_ramp(w, h);
    let edge_data = edge_field(w, h, 0);
    let mut out = vec![0u8; src_data.len()];

    let src = SurfaceRef::new(&src_data, w, h).unwrap();
    let edge = SurfaceRef::new(&edge_data, w, h).unwrap();
    let mut dst = SurfaceMut::new(&mut out, w, h).unwrap();
    let params = DispersionParams {
        refractive_factor: 0.5,
        ..DispersionParams::default()
    };
    chromatic_dispersion(&src, &edge, None, &mut dst, &params).unwrap();
    assert_eq!(out, src_data);
}

#[test]
fn mismatched_edge_field_writes_nothing() {
    let src_data = bytes(4 * 4 * 4, 92);
    let edge_data = edge_field(3, 4, 0);
    let mut out = vec![0xCD; src_data.len()];

    let src = SurfaceRef::new(&src_data, 4, 4).unwrap();
    let edge = SurfaceRef::new(&edge_data, 3, 4).unwrap();
    let mut dst = SurfaceMut::new(&mut out, 4, 4).unwrap();
    let err =
        chromatic_dispersion(&src, &edge, None, &mut dst, &DispersionParams::default())
            .unwrap_err();
    assert!(matches!(err, FrostpaneError::InvalidArgument(_)));
    assert!(out.iter().all(|&b| b == 0xCD));
}

#[test]
fn mismatched_normal_field_is_rejected() {
    let src_data = bytes(4 * 4 * 4, 93);
    let edge_data = edge_field(4, 4, 0);
    let normal_data: Vec<u8> = [128, 128, 0, 255].repeat(4 * 3);
    let mut out = vec![0u8; src_data.len()];

    let src = SurfaceRef::new(&src_data, 4, 4).unwrap();
    let edge = SurfaceRef::new(&edge_data, 4, 4).unwrap();
    let normals = SurfaceRef::new(&normal_data, 4, 3).unwrap();
    let mut dst = SurfaceMut::new(&mut out, 4, 4).unwrap();
    let err = chromatic_dispersion(&src, &edge, Some(&normals), &mut dst, &DispersionParams::default())
        .unwrap_err();
    assert!(err.to_string().contains("normal field"));
}

#[test]
fn non_finite_parameters_are_rejected_untouched() {
    let (w, h) = (4u32, 4u32);
    let src_data = bytes((w * h * 4) as usize, 94);
    let edge_data = edge_field(w, h, 0);
    let mut out = vec![0xEE; src_data.len()];

    let src = SurfaceRef::new(&src_data, w, h).unwrap();
    let edge = SurfaceRef::new(&edge_data, w, h).unwrap();
    let mut dst = SurfaceMut::new(&mut out, w, h).unwrap();
    let params = DispersionParams {
        thickness: f32::NAN,
        ..DispersionParams::default()
    };
    let err = chromatic_dispersion(&src, &edge, None, &mut dst, &params).unwrap_err();
    assert!(matches!(err, FrostpaneError::InvalidArgument(_)));
    assert!(out.iter().all(|&b| b == 0xEE));
}

#[test]
fn one_pixel_surface_is_stable() {
    let src_data = vec![90, 120, 150, 255];
    let edge_data = edge_field(1, 1, 0);
    let mut out = vec![0u8; 4];

    let src = SurfaceRef::new(&src_data, 1, 1).unwrap();
    let edge = SurfaceRef::new(&edge_data, 1, 1).unwrap();
    let mut dst = SurfaceMut::new(&mut out, 1, 1).unwrap();
    chromatic_dispersion(&src, &edge, None, &mut dst, &DispersionParams::default()).unwrap();
    assert_eq!(out, src_data);
}

#[test]
fn defaults_deserialize_from_empty_json() {
    let parsed: DispersionParams = serde_json::from_str("{}").unwrap();
    assert_eq!(parsed, DispersionParams::default());
    assert_eq!(parsed.dispersion_gain, 7.0);
    assert_eq!(parsed.method, SampleMethod::Bilinear);
}
