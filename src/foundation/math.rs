pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

pub(crate) fn unit_to_u8(v: f32) -> u16 {
    ((v.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16
}

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Ping-pong phase in `[0,1]`: rises over one period, falls over the next.
pub(crate) fn ping_pong(secs: f64, period_secs: f64) -> f64 {
    if period_secs <= 0.0 {
        return 0.0;
    }
    let cycle = (secs / period_secs).max(0.0);
    let whole = cycle.floor();
    let frac = cycle - whole;
    if (whole as u64).is_multiple_of(2) {
        frac
    } else {
        1.0 - frac
    }
}

/// Triangle wave `0 -> 1 -> 0` over one period, used for keyframes `[a, b, a]`.
pub(crate) fn there_and_back(secs: f64, period_secs: f64) -> f64 {
    if period_secs <= 0.0 {
        return 0.0;
    }
    let frac = (secs / period_secs).max(0.0).fract();
    if frac < 0.5 { frac * 2.0 } else { 2.0 - frac * 2.0 }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
