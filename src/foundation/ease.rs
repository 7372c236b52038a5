/// Easing curves applied to normalized animation progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ease {
    /// Quadratic ease-out.
    OutQuad,
    /// Sinusoidal ease-in-out, the closest analytic match to CSS `ease-in-out`.
    InOutSine,
}

impl Ease {
    /// Map `t` (clamped to `0..=1`) through the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutSine => -((std::f64::consts::PI * t).cos() - 1.0) / 2.0,
        }
    }
}
