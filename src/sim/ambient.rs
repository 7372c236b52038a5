//! Lightweight keyframed illustrations for the Grid, Chaos and Flow beats.
//!
//! Unlike the simulations these carry no per-frame state beyond their spawn parameters: every
//! frame is a pure function of the time since mount, so they redraw from a cleared surface.

use crate::deck::beat::VisualMode;
use crate::foundation::core::{Point, Rect, Rgb8, Vec2, Viewport};
use crate::foundation::ease::Ease;
use crate::foundation::math::{lerp, ping_pong, there_and_back};
use crate::render::surface::{Painter, Surface};
use crate::sim::primitives::Rng64;
use crate::sim::{FrameCtx, Simulation};
use kurbo::ParamCurve as _;

fn paint_or_warn(name: &str, surface: &mut Surface, f: impl FnOnce(&mut Painter<'_>)) {
    if let Err(err) = surface.paint(f) {
        tracing::warn!(layer = name, error = %err, "illustration paint failed");
    }
}

/// Progress of a keyframe cycle that starts after `delay` seconds (0 before it starts).
fn delayed(secs: f64, delay: f64) -> f64 {
    (secs - delay).max(0.0)
}

// --- framed card ---

const FRAME_SIZE: (f64, f64) = (384.0, 256.0);
const FRAME_INSET: f64 = 16.0;
const CARD_SIZE: (f64, f64) = (128.0, 80.0);
const CARD_BOB: f64 = 5.0;
const CARD_BOB_PERIOD: f64 = 4.0;
const ENTER_SECS: f64 = 1.0;

/// A wireframe with a hovering card, fading and scaling in on mount.
#[derive(Debug)]
pub struct FramedCard {
    color: Rgb8,
    viewport: Viewport,
}

impl FramedCard {
    pub fn new(color: Rgb8) -> Self {
        Self {
            color,
            viewport: Viewport::default(),
        }
    }

    /// `(opacity, scale)` of the entry transition.
    pub(crate) fn entry(secs: f64) -> (f32, f64) {
        let k = Ease::OutQuad.apply(secs / ENTER_SECS);
        (k as f32, lerp(0.9, 1.0, k))
    }

    /// Vertical offset of the card, `0 -> -5 -> 0` every cycle.
    pub(crate) fn card_offset(secs: f64) -> f64 {
        -CARD_BOB * Ease::InOutSine.apply(there_and_back(secs, CARD_BOB_PERIOD))
    }
}

impl Simulation for FramedCard {
    fn name(&self) -> &'static str {
        "framed_card"
    }

    fn init(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn step(&mut self, _frame: &FrameCtx) {}

    fn render(&mut self, frame: &FrameCtx, surface: &mut Surface) {
        surface.clear();
        let (opacity, scale) = Self::entry(frame.local_secs);
        let c = self.viewport.center();
        let outer = Rect::from_center_size(c, (FRAME_SIZE.0 * scale, FRAME_SIZE.1 * scale));
        let inner = outer.inset(-FRAME_INSET * scale);
        let card = Rect::from_center_size(
            c + Vec2::new(0.0, Self::card_offset(frame.local_secs) * scale),
            (CARD_SIZE.0 * scale, CARD_SIZE.1 * scale),
        );
        let color = self.color;
        paint_or_warn(self.name(), surface, |p| {
            p.stroke_rect(outer, 2.0, color.with_alpha(0.3 * opacity));
            p.stroke_rect(inner, 1.0, color.with_alpha(0.2 * opacity));
            p.stroke_line(
                Point::new(outer.x0, c.y),
                Point::new(outer.x1, c.y),
                1.0,
                color.with_alpha(0.2 * opacity),
            );
            p.stroke_line(
                Point::new(c.x, outer.y0),
                Point::new(c.x, outer.y1),
                1.0,
                color.with_alpha(0.2 * opacity),
            );
            p.fill_rect(card, color.with_alpha(0.1 * opacity));
            p.stroke_rect(card, 1.0, color.with_alpha(0.3 * opacity));
        });
    }

    fn retune(&mut self, _mode: VisualMode, accent: Rgb8) {
        self.color = accent;
    }
}

// --- drifting shards ---

const SHARD_COUNT: usize = 6;
const SHARD_TRAVEL_SECS: f64 = 20.0;
const SHARD_SPREAD: f64 = 200.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Shard {
    pub(crate) size: (f64, f64),
    pub(crate) target: Vec2,
    pub(crate) spin_deg: f64,
}

/// Translucent rectangles drifting out from the centre and back.
#[derive(Debug)]
pub struct DriftingShards {
    color: Rgb8,
    seed: u64,
    viewport: Viewport,
    pub(crate) shards: Vec<Shard>,
}

impl DriftingShards {
    pub fn new(color: Rgb8, seed: u64) -> Self {
        Self {
            color,
            seed,
            viewport: Viewport::default(),
            shards: Vec::new(),
        }
    }

    /// Corner points of `shard` at `secs`. The shard's top-left corner starts at the centre.
    pub(crate) fn corners(&self, shard: &Shard, secs: f64) -> [Point; 4] {
        let k = ping_pong(secs, SHARD_TRAVEL_SECS);
        let (w, h) = shard.size;
        let origin = self.viewport.center() + shard.target * k;
        let mid = origin + Vec2::new(w / 2.0, h / 2.0);
        let rot = kurbo::Affine::rotate_about((shard.spin_deg * k).to_radians(), mid);
        [
            rot * origin,
            rot * (origin + Vec2::new(w, 0.0)),
            rot * (origin + Vec2::new(w, h)),
            rot * (origin + Vec2::new(0.0, h)),
        ]
    }
}

impl Simulation for DriftingShards {
    fn name(&self) -> &'static str {
        "drifting_shards"
    }

    fn init(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let mut rng = Rng64::new(self.seed);
        self.shards = (0..SHARD_COUNT)
            .map(|_| Shard {
                size: (rng.range(60.0, 120.0), rng.range(60.0, 120.0)),
                target: Vec2::new(rng.symmetric(SHARD_SPREAD), rng.symmetric(SHARD_SPREAD)),
                spin_deg: rng.range(0.0, 360.0),
            })
            .collect();
    }

    fn step(&mut self, _frame: &FrameCtx) {}

    fn render(&mut self, frame: &FrameCtx, surface: &mut Surface) {
        surface.clear();
        let polys: Vec<[Point; 4]> = self
            .shards
            .iter()
            .map(|s| self.corners(s, frame.local_secs))
            .collect();
        let color = self.color;
        paint_or_warn(self.name(), surface, |p| {
            for poly in &polys {
                p.fill_polygon(poly, color.with_alpha(0.2));
                p.stroke_polygon(poly, 1.0, color.with_alpha(0.4));
            }
        });
    }

    fn retune(&mut self, _mode: VisualMode, accent: Rgb8) {
        self.color = accent;
    }
}

// --- flow ribbons ---

const RIBBONS: usize = 5;
const VIEW_BOX: f64 = 100.0;

/// One keyframed ribbon in view-box units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Ribbon {
    pub(crate) baseline: f64,
    pub(crate) ctrl_from: f64,
    pub(crate) ctrl_to: f64,
    pub(crate) period: f64,
    pub(crate) delay: f64,
    pub(crate) width: f64,
    pub(crate) primary: bool,
}

impl Ribbon {
    fn phase(&self, secs: f64) -> f64 {
        Ease::InOutSine.apply(there_and_back(delayed(secs, self.delay), self.period))
    }

    /// Control point height at `secs`, view-box units.
    pub(crate) fn ctrl_y(&self, secs: f64) -> f64 {
        lerp(self.ctrl_from, self.ctrl_to, self.phase(secs))
    }

    /// Primary ribbons pulse `0.3 -> 0.6 -> 0.3`; secondary ones are steady.
    pub(crate) fn opacity(&self, secs: f64) -> f32 {
        if self.primary {
            lerp(0.3, 0.6, self.phase(secs)) as f32
        } else {
            1.0
        }
    }

    /// Fraction of the path drawn. Primary ribbons draw in over their first cycle.
    pub(crate) fn reveal(&self, secs: f64) -> f64 {
        if self.primary {
            Ease::InOutSine.apply(delayed(secs, self.delay) / self.period)
        } else {
            1.0
        }
    }
}

pub(crate) fn ribbon_set() -> Vec<Ribbon> {
    let mut out = Vec::with_capacity(RIBBONS * 2);
    for i in 0..RIBBONS {
        let o = 15.0 * i as f64;
        out.push(Ribbon {
            baseline: 20.0 + o,
            ctrl_from: 10.0 + o,
            ctrl_to: 30.0 + o,
            period: 5.0 + i as f64,
            delay: 0.5 * i as f64,
            width: 0.5,
            primary: true,
        });
    }
    for i in 0..RIBBONS {
        let o = 15.0 * i as f64;
        out.push(Ribbon {
            baseline: 25.0 + o,
            ctrl_from: 35.0 + o,
            ctrl_to: 15.0 + o,
            period: 7.0 + i as f64,
            delay: 0.3 * i as f64,
            width: 0.2,
            primary: false,
        });
    }
    out
}

/// Lighter tint of `c` for the secondary ribbons.
fn tint(c: Rgb8) -> Rgb8 {
    let up = |v: u8| v.saturating_add(((255 - u16::from(v)) / 4) as u8);
    Rgb8::new(up(c.r), up(c.g), up(c.b))
}

/// Quadratic ribbons swaying across a stretched 100x100 view box.
#[derive(Debug)]
pub struct FlowRibbons {
    color: Rgb8,
    viewport: Viewport,
    ribbons: Vec<Ribbon>,
}

impl FlowRibbons {
    pub fn new(color: Rgb8) -> Self {
        Self {
            color,
            viewport: Viewport::default(),
            ribbons: ribbon_set(),
        }
    }

    fn to_screen(&self, x: f64, y: f64) -> kurbo::Point {
        kurbo::Point::new(
            x / VIEW_BOX * self.viewport.w(),
            y / VIEW_BOX * self.viewport.h(),
        )
    }

    /// Screen-space curve of `ribbon` at `secs`, truncated to its reveal fraction.
    pub(crate) fn curve(&self, ribbon: &Ribbon, secs: f64) -> Option<kurbo::QuadBez> {
        let reveal = ribbon.reveal(secs);
        if reveal <= 0.0 {
            return None;
        }
        let full = kurbo::QuadBez::new(
            self.to_screen(0.0, ribbon.baseline),
            self.to_screen(VIEW_BOX / 2.0, ribbon.ctrl_y(secs)),
            self.to_screen(VIEW_BOX, ribbon.baseline),
        );
        Some(full.subsegment(0.0..reveal.min(1.0)))
    }
}

impl Simulation for FlowRibbons {
    fn name(&self) -> &'static str {
        "flow_ribbons"
    }

    fn init(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn step(&mut self, _frame: &FrameCtx) {}

    fn render(&mut self, frame: &FrameCtx, surface: &mut Surface) {
        surface.clear();
        let secs = frame.local_secs;
        let strokes: Vec<(kurbo::QuadBez, f64, Rgb8, f32)> = self
            .ribbons
            .iter()
            .filter_map(|r| {
                let color = if r.primary { self.color } else { tint(self.color) };
                self.curve(r, secs)
                    .map(|q| (q, r.width, color, r.opacity(secs)))
            })
            .collect();
        paint_or_warn(self.name(), surface, |p| {
            for (q, width, color, alpha) in &strokes {
                p.stroke_quad(q.p0, q.p1, q.p2, *width, color.with_alpha(*alpha));
            }
        });
    }

    fn retune(&mut self, _mode: VisualMode, accent: Rgb8) {
        self.color = accent;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/ambient.rs"]
mod tests;
