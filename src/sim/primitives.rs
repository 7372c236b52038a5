//! Pure helpers shared by every simulation: randomness, fields, projection.

use crate::foundation::core::{Point, Vec2, Viewport};
use std::f64::consts::{PI, TAU};

/// Deterministic SplitMix64 source. Every simulation owns one, seeded at mount.
#[derive(Clone, Copy, Debug)]
pub struct Rng64 {
    state: u64,
}

impl Rng64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        // SplitMix64
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0,1)` with 53 bits of precision.
    pub fn next_f64_01(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }

    /// Uniform in `[lo,hi)`.
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64_01()
    }

    /// Uniform in `[-half,half)`.
    pub fn symmetric(&mut self, half: f64) -> f64 {
        (self.next_f64_01() - 0.5) * 2.0 * half
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        ((self.next_f64_01() * len as f64) as usize).min(len.saturating_sub(1))
    }

    pub fn angle(&mut self) -> f64 {
        self.next_f64_01() * TAU
    }

    pub fn point_in(&mut self, viewport: Viewport) -> Point {
        Point::new(
            self.next_f64_01() * viewport.w(),
            self.next_f64_01() * viewport.h(),
        )
    }

    /// Derive an independent stream, e.g. one per mounted simulation.
    pub fn fork(&mut self, salt: u64) -> Self {
        Self::new(self.next_u64() ^ salt.wrapping_mul(0xD6E8_FEB8_6659_FD93))
    }
}

pub fn polar(angle: f64, len: f64) -> Vec2 {
    Vec2::new(angle.cos() * len, angle.sin() * len)
}

/// Position-derived sinusoidal angle field: 2 turns across x, half a turn down y.
pub fn flow_field_angle(p: Point, viewport: Viewport) -> f64 {
    (p.x / viewport.w()) * PI * 4.0 + (p.y / viewport.h()) * PI
}

/// Closed-form pseudo-noise heading in `[-2pi, 2pi]`, drifting with `t`.
pub fn pseudo_noise_angle(p: Point, t: f64) -> f64 {
    (p.x * 0.005 + t).sin() * (p.y * 0.005 + t).cos() * TAU
}

/// Exponential smoothing of `current` toward `target` by `rate` of the raw difference.
pub fn approach_angle(current: f64, target: f64, rate: f64) -> f64 {
    current + (target - current) * rate
}

/// Hard wrap onto the opposite edge; the result always lies in `[0,w] x [0,h]`.
pub fn wrap_edges(mut p: Point, viewport: Viewport) -> Point {
    let (w, h) = (viewport.w(), viewport.h());
    if p.x < 0.0 {
        p.x = w;
    }
    if p.x > w {
        p.x = 0.0;
    }
    if p.y < 0.0 {
        p.y = h;
    }
    if p.y > h {
        p.y = 0.0;
    }
    p
}

/// Wrap with an off-screen margin so points leave the frame before they reappear.
pub fn wrap_with_margin(mut p: Point, viewport: Viewport, margin: f64) -> Point {
    let (w, h) = (viewport.w(), viewport.h());
    if p.x < -margin {
        p.x = w + margin;
    }
    if p.x > w + margin {
        p.x = -margin;
    }
    if p.y < -margin {
        p.y = h + margin;
    }
    if p.y > h + margin {
        p.y = -margin;
    }
    p
}

/// Pinhole projection with the eye `focal_length` in front of the `z = 0` plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Perspective {
    pub focal_length: f64,
    pub center: Point,
}

/// A projected point with its uniform scale factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub pos: Point,
    pub scale: f64,
}

impl Perspective {
    pub fn new(focal_length: f64, center: Point) -> Self {
        Self {
            focal_length,
            center,
        }
    }

    /// `focal / (focal + depth)`; `None` at or behind the eye, where it is undefined.
    pub fn scale(&self, depth: f64) -> Option<f64> {
        let denom = self.focal_length + depth;
        if denom <= 0.0 || !denom.is_finite() {
            return None;
        }
        let s = self.focal_length / denom;
        s.is_finite().then_some(s)
    }

    pub fn project(&self, x: f64, y: f64, depth: f64) -> Option<Projected> {
        let scale = self.scale(depth)?;
        Some(Projected {
            pos: Point::new(x * scale + self.center.x, y * scale + self.center.y),
            scale,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/primitives.rs"]
mod tests;
