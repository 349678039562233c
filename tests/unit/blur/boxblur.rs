use super::*;

fn bytes(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1664525).wrapping_add(1013904223);
            (state >> 24) as u8
        })
        .collect()
}

#[test]
fn radius_zero_or_negative_is_identity() {
    let mut data = bytes(6 * 5 * 4, 11);
    let before = data.clone();
    let mut surface = SurfaceMut::new(&mut data, 6, 5).unwrap();
    box_blur(&mut surface, 0).unwrap();
    box_blur(&mut surface, -3).unwrap();
    box_blur3(&mut surface, 0).unwrap();
    assert_eq!(data, before);
}

#[test]
fn constant_image_is_identity() {
    let (w, h) = (4u32, 3u32);
    let mut data: Vec<u8> = [10, 20, 30, 40].repeat((w * h) as usize);
    let before = data.clone();

    let mut surface = SurfaceMut::new(&mut data, w, h).unwrap();
    box_blur(&mut surface, 3).unwrap();
    assert_eq!(data, before);

    let mut surface = SurfaceMut::new(&mut data, w, h).unwrap();
    box_blur3(&mut surface, 2).unwrap();
    assert_eq!(data, before);
}

#[test]
fn single_pass_averages_the_window() {
    // 5x1 strip with one bright pixel; radius 1 averages three columns.
    let mut data = vec![0u8; 5 * 4];
    data[2 * 4] = 255;
    let mut surface = SurfaceMut::new(&mut data, 5, 1).unwrap();
    box_blur(&mut surface, 1).unwrap();

    let red: Vec<u8> = data.chunks_exact(4).map(|px| px[0]).collect();
    assert_eq!(red, vec![0, 85, 85, 85, 0]);
}

#[test]
fn edge_replication_weights_the_border() {
    // 3x1 ramp; the left window clamps to [0, 0, 1], the right to [1, 2, 2].
    let mut data = vec![0u8; 3 * 4];
    data[0] = 30;
    data[4] = 60;
    data[8] = 90;
    let mut surface = SurfaceMut::new(&mut data, 3, 1).unwrap();
    box_blur(&mut surface, 1).unwrap();

    let red: Vec<u8> = data.chunks_exact(4).map(|px| px[0]).collect();
    assert_eq!(red, vec![40, 60, 80]);
}

#[test]
fn triple_pass_equals_three_single_passes() {
    let mut a = bytes(8 * 6 * 4, 21);
    let mut b = a.clone();

    let mut sa = SurfaceMut::new(&mut a, 8, 6).unwrap();
    box_blur3(&mut sa, 2).unwrap();

    let mut sb = SurfaceMut::new(&mut b, 8, 6).unwrap();
    for _ in 0..3 {
        box_blur(&mut sb, 2).unwrap();
    }
    assert_eq!(a, b);
}

#[test]
fn oversized_radius_clamps_to_max() {
    let mut clamped = bytes(16 * 4 * 4, 31);
    let mut explicit = clamped.clone();

    let mut sc = SurfaceMut::new(&mut clamped, 16, 4).unwrap();
    box_blur(&mut sc, 80).unwrap();

    let mut se = SurfaceMut::new(&mut explicit, 16, 4).unwrap();
    box_blur(&mut se, MAX_RADIUS).unwrap();
    assert_eq!(clamped, explicit);
}

#[test]
fn fast_blur_below_half_pixel_is_identity() {
    let mut data = bytes(7 * 7 * 4, 41);
    let before = data.clone();
    let mut surface = SurfaceMut::new(&mut data, 7, 7).unwrap();
    let params = FastBlurParams {
        radius: 0.3,
        ..FastBlurParams::default()
    };
    fast_box_blur(&mut surface, &params).unwrap();
    assert_eq!(data, before);
}

#[test]
fn fast_blur_rejects_non_finite_parameters() {
    let mut data = bytes(4 * 4 * 4, 51);
    let before = data.clone();
    let mut surface = SurfaceMut::new(&mut data, 4, 4).unwrap();
    let params = FastBlurParams {
        radius: f32::NAN,
        ..FastBlurParams::default()
    };
    let err = fast_box_blur(&mut surface, &params).unwrap_err();
    assert!(matches!(err, FrostpaneError::InvalidArgument(_)));
    assert_eq!(data, before);
}

#[test]
fn fast_blur_keeps_uniform_surfaces() {
    let (w, h) = (10u32, 8u32);
    let mut data: Vec<u8> = [90, 140, 190, 255].repeat((w * h) as usize);
    let before = data.clone();
    let mut surface = SurfaceMut::new(&mut data, w, h).unwrap();
    fast_box_blur(&mut surface, &FastBlurParams::default()).unwrap();
    assert_eq!(data, before);
}

#[test]
fn fast_blur_at_full_scale_matches_plain_box() {
    let mut fast = bytes(12 * 9 * 4, 61);
    let mut plain = fast.clone();

    let mut sf = SurfaceMut::new(&mut fast, 12, 9).unwrap();
    let params = FastBlurParams {
        radius: 4.0,
        downscale: 1.0,
        method: SampleMethod::Nearest,
    };
    fast_box_blur(&mut sf, &params).unwrap();

    let mut sp = SurfaceMut::new(&mut plain, 12, 9).unwrap();
    box_blur(&mut sp, 4).unwrap();
    assert_eq!(fast, plain);
}

#[test]
fn default_params_deserialize_from_empty_json() {
    let parsed: FastBlurParams = serde_json::from_str("{}").unwrap();
    assert_eq!(parsed, FastBlurParams::default());
}
