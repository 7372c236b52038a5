use super::*;

#[test]
fn over_opaque_src_replaces_dst() {
    let out = over([10, 20, 30, 255], [200, 100, 50, 255], 1.0);
    assert_eq!(out, [200, 100, 50, 255]);
}

#[test]
fn over_zero_opacity_keeps_dst() {
    let dst = [10, 20, 30, 255];
    assert_eq!(over(dst, [200, 100, 50, 255], 0.0), dst);
    assert_eq!(over(dst, [0, 0, 0, 0], 1.0), dst);
}

#[test]
fn over_half_opacity_blends() {
    let out = over([0, 0, 0, 255], [255, 255, 255, 255], 0.5);
    assert!(out[0] >= 127 && out[0] <= 129);
    assert_eq!(out[3], 255);
}

#[test]
fn fade_darkens_and_accumulates_alpha() {
    let mut px = vec![200u8, 100, 50, 255, 0, 0, 0, 0];
    fade_to_black_in_place(&mut px, 0.15);
    assert!(px[0] < 200 && px[1] < 100 && px[2] < 50);
    assert_eq!(px[3], 255);
    // A transparent pixel becomes a faint black, like a canvas under a translucent fill.
    assert_eq!(&px[4..7], &[0, 0, 0]);
    assert!(px[7] > 0);
}

#[test]
fn repeated_fade_converges_towards_black() {
    let mut px = vec![255u8, 255, 255, 255];
    for _ in 0..200 {
        fade_to_black_in_place(&mut px, 0.15);
    }
    assert!(px[0] <= 4);
}

#[test]
fn over_in_place_rejects_mismatched_buffers() {
    let mut a = vec![0u8; 8];
    let b = vec![0u8; 4];
    assert!(over_in_place(&mut a, &b, 1.0).is_err());
}
