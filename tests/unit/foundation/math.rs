use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn ping_pong_reverses_every_period() {
    assert!((ping_pong(0.25, 1.0) - 0.25).abs() < 1e-12);
    assert!((ping_pong(1.25, 1.0) - 0.75).abs() < 1e-12);
    assert!((ping_pong(2.25, 1.0) - 0.25).abs() < 1e-12);
    assert_eq!(ping_pong(3.0, 0.0), 0.0);
}

#[test]
fn there_and_back_peaks_mid_period() {
    assert!(there_and_back(0.0, 4.0).abs() < 1e-12);
    assert!((there_and_back(2.0, 4.0) - 1.0).abs() < 1e-12);
    assert!((there_and_back(3.0, 4.0) - 0.5).abs() < 1e-12);
}

#[test]
fn unit_to_u8_clamps() {
    assert_eq!(unit_to_u8(-1.0), 0);
    assert_eq!(unit_to_u8(2.0), 255);
    assert_eq!(unit_to_u8(0.5), 128);
}
