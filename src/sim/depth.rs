//! Billboarded 16:9 sprites streaming toward the viewer, recycled at the near plane.

use crate::foundation::color::hsl_to_rgb8;
use crate::foundation::core::{Point, Rect, Rgb8, Viewport};
use crate::render::surface::Surface;
use crate::sim::primitives::{Perspective, Projected, Rng64};
use crate::sim::{FrameCtx, Simulation};

pub(crate) const SPRITE_COUNT: usize = 15;
pub(crate) const FOCAL_LENGTH: f64 = 400.0;
pub(crate) const FAR_PLANE: f64 = 1000.0;
const NEAR_MARGIN: f64 = 50.0;
const SPRITE_W: f64 = 160.0;
const SPRITE_H: f64 = 90.0;
const STREAM_MIN_SCALE: f64 = 0.1;
const STREAM_DROP: f64 = 200.0;
const STREAM_SWAY: f64 = 100.0;
const PANEL: Rgb8 = Rgb8::BLACK;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DepthSprite {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) z: f64,
    pub(crate) speed: f64,
    pub(crate) w: f64,
    pub(crate) h: f64,
    pub(crate) color: Rgb8,
}

/// Sprites cross the near threshold at `-focal + 50` and reappear on the far plane.
#[derive(Debug)]
pub struct DepthStream {
    seed: u64,
    rng: Rng64,
    viewport: Viewport,
    lens: Perspective,
    pub(crate) sprites: Vec<DepthSprite>,
}

impl DepthStream {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Rng64::new(seed),
            viewport: Viewport::default(),
            lens: Perspective::new(FOCAL_LENGTH, Viewport::default().center()),
            sprites: Vec::new(),
        }
    }

    pub(crate) fn near_threshold(&self) -> f64 {
        -self.lens.focal_length + NEAR_MARGIN
    }

    pub(crate) fn project(&self, sprite: &DepthSprite) -> Option<Projected> {
        self.lens.project(sprite.x, sprite.y, sprite.z)
    }

    fn spawn_sprite(rng: &mut Rng64, viewport: Viewport) -> DepthSprite {
        DepthSprite {
            x: rng.symmetric(viewport.w() / 2.0),
            y: rng.symmetric(viewport.h() / 2.0),
            z: rng.range(0.0, FAR_PLANE),
            speed: rng.range(2.0, 5.0),
            w: SPRITE_W,
            h: SPRITE_H,
            color: hsl_to_rgb8(rng.range(140.0, 180.0), 0.7, 0.5),
        }
    }
}

impl Simulation for DepthStream {
    fn name(&self) -> &'static str {
        "depth_stream"
    }

    fn init(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.lens = Perspective::new(FOCAL_LENGTH, viewport.center());
        self.rng = Rng64::new(self.seed);
        let rng = &mut self.rng;
        self.sprites = (0..SPRITE_COUNT)
            .map(|_| Self::spawn_sprite(rng, viewport))
            .collect();
    }

    fn step(&mut self, _frame: &FrameCtx) {
        let near = self.near_threshold();
        let (w, h) = (self.viewport.w(), self.viewport.h());
        for s in &mut self.sprites {
            s.z -= s.speed;
            if s.z < near {
                s.z = FAR_PLANE;
                s.x = self.rng.symmetric(w * 0.75);
                s.y = self.rng.symmetric(h * 0.75);
            }
        }
    }

    fn render(&mut self, frame: &FrameCtx, surface: &mut Surface) {
        surface.clear();
        let center = self.lens.center;
        let sink = Point::new(center.x, center.y + STREAM_DROP);
        let f = frame.local_frame as f64;
        let drawn: Vec<(DepthSprite, Projected)> = self
            .sprites
            .iter()
            .filter_map(|s| self.project(s).map(|p| (*s, p)))
            .collect();

        let painted = surface.paint(|painter| {
            for (s, p) in &drawn {
                let scale = p.scale;
                if scale > STREAM_MIN_SCALE {
                    let phase = f * 0.05 + s.z;
                    let ctrl = Point::new(
                        center.x + phase.sin() * STREAM_SWAY,
                        center.y + phase.cos() * STREAM_SWAY,
                    );
                    let alpha = (0.2 * scale) as f32;
                    painter.stroke_quad(p.pos, ctrl, sink, scale, s.color.with_alpha(alpha));
                }

                let alpha = scale.min(1.0) as f32;
                let (w2d, h2d) = (s.w * scale, s.h * scale);
                let rect = Rect::from_center_size(p.pos, (w2d, h2d));
                painter.fill_rect(rect, PANEL.with_alpha(0.8 * alpha));
                painter.stroke_rect(rect, 2.0 * scale, s.color.with_alpha(alpha));

                if h2d > 0.0 {
                    let scan_y = (f * 2.0) % h2d;
                    let line = Rect::new(
                        rect.x0,
                        rect.y0 + scan_y,
                        rect.x1,
                        rect.y0 + scan_y + 2.0 * scale,
                    );
                    painter.fill_rect(line, s.color.with_alpha(alpha));
                }
            }
        });
        if let Err(err) = painted {
            tracing::warn!(error = %err, "depth stream paint failed");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/depth.rs"]
mod tests;
