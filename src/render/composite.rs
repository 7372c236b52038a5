use crate::foundation::error::{DeckError, DeckResult};
use crate::foundation::math::{mul_div255_u8, unit_to_u8};

pub type PremulRgba8 = [u8; 4];

const OPAQUE_BLACK: PremulRgba8 = [0, 0, 0, 255];

/// Premultiplied source-over with an extra layer opacity.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let op = unit_to_u8(opacity);
    if op == 0 || src[3] == 0 {
        return dst;
    }

    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> DeckResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(DeckError::surface(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    if unit_to_u8(opacity) == 0 {
        return Ok(());
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Trail fade: composite black at `alpha` over every pixel.
pub fn fade_to_black_in_place(dst: &mut [u8], alpha: f32) {
    if unit_to_u8(alpha) == 0 {
        return;
    }
    for d in dst.chunks_exact_mut(4) {
        let out = over([d[0], d[1], d[2], d[3]], OPAQUE_BLACK, alpha);
        d.copy_from_slice(&out);
    }
}

pub fn fill_in_place(dst: &mut [u8], rgba: PremulRgba8) {
    for px in dst.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    mul_div255_u8(x, y)
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
