use crate::foundation::error::{DeckError, DeckResult};

pub use kurbo::{Point, Rect, Vec2};

/// Viewports narrower than this are treated as mobile-class devices.
pub const MOBILE_BREAKPOINT_PX: u32 = 768;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> DeckResult<Self> {
        if den == 0 {
            return Err(DeckError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(DeckError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 60, den: 1 }
    }
}

/// Pixel dimensions of the drawing surface every simulation renders into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> DeckResult<Self> {
        if width == 0 || height == 0 {
            return Err(DeckError::validation(format!(
                "viewport must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn w(self) -> f64 {
        f64::from(self.width)
    }

    pub fn h(self) -> f64 {
        f64::from(self.height)
    }

    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn aspect(self) -> f64 {
        if self.height == 0 {
            return 1.0;
        }
        self.w() / self.h()
    }

    pub fn center(self) -> Point {
        Point::new(self.w() / 2.0, self.h() / 2.0)
    }

    /// Closed-interval containment, `[0,w] x [0,h]`.
    pub fn contains(self, p: Point) -> bool {
        p.x >= 0.0 && p.x <= self.w() && p.y >= 0.0 && p.y <= self.h()
    }

    /// Open-interval containment, `(0,w) x (0,h)`.
    pub fn contains_strict(self, p: Point) -> bool {
        p.x > 0.0 && p.x < self.w() && p.y > 0.0 && p.y < self.h()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Opaque sRGB color, used for beat accents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn with_alpha(self, a: f32) -> Rgba {
        Rgba {
            rgb: self,
            a: a.clamp(0.0, 1.0),
        }
    }

    pub fn opaque(self) -> Rgba {
        self.with_alpha(1.0)
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Straight-alpha draw color. Alpha plays the role of a canvas `globalAlpha`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb8,
    pub a: f32,
}

impl Rgba {
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            rgb: self.rgb,
            a: a.clamp(0.0, 1.0),
        }
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let a = (self.a.clamp(0.0, 1.0) * 255.0).round() as u8;
        [self.rgb.r, self.rgb.g, self.rgb.b, a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
