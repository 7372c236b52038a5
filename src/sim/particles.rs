//! Full-screen particle field, one update rule per [`VisualMode`].

use crate::deck::beat::VisualMode;
use crate::foundation::core::{MOBILE_BREAKPOINT_PX, Point, Rgb8, Vec2, Viewport};
use crate::render::surface::Surface;
use crate::sim::primitives::{Rng64, flow_field_angle, wrap_with_margin};
use crate::sim::{FrameCtx, Simulation};

const TRAIL_FADE: f32 = 0.15;
const SPRING: f64 = 0.05;
const CHAOS_SPEED: f64 = 3.0;
const DRIFT_SPEED: f64 = 0.5;
const FLOW_SPEED: f64 = 2.0;
const FLOW_FADE_IN: f64 = 0.01;
const FLOW_MAX_ALPHA: f64 = 0.6;
const NETWORK_MARGIN: f64 = 50.0;
const NETWORK_LINK_DIST_SQ: f64 = 10_000.0;
const NETWORK_SOURCE_EVERY: usize = 4;
const NETWORK_PARTNER_STRIDE: usize = 10;
const SPIRAL_TWIST: f64 = 0.2;
const SPIRAL_SPEED: f64 = 2.0;
const SPIRAL_RESPAWN_DIST: f64 = 10.0;
const NETWORK_NODE: Rgb8 = Rgb8::new(200, 200, 255);

/// Sizing knobs for the particle pool.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParticleFieldOpts {
    /// Particles per 1000 px² of viewport area.
    pub density_per_kpx: f64,
    /// Upper bound on desktop-class viewports; halved below `mobile_breakpoint`.
    pub desktop_cap: usize,
    /// Viewports narrower than this are mobile-class.
    pub mobile_breakpoint: u32,
}

impl Default for ParticleFieldOpts {
    fn default() -> Self {
        Self {
            density_per_kpx: 1.0,
            desktop_cap: 800,
            mobile_breakpoint: MOBILE_BREAKPOINT_PX,
        }
    }
}

impl ParticleFieldOpts {
    pub fn cap_for(&self, viewport: Viewport) -> usize {
        if viewport.width < self.mobile_breakpoint {
            self.desktop_cap / 2
        } else {
            self.desktop_cap
        }
    }

    /// Pool size for `viewport`: area times density, clamped to `1..=cap`.
    pub fn particle_count(&self, viewport: Viewport) -> usize {
        let wanted = (viewport.area() as f64 / 1000.0 * self.density_per_kpx.max(0.0)).floor();
        let cap = self.cap_for(viewport).max(1);
        (wanted as usize).clamp(1, cap)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Particle {
    pub(crate) pos: Point,
    pub(crate) vel: Vec2,
    pub(crate) home: Point,
    pub(crate) size: f64,
    pub(crate) phase: f64,
    pub(crate) alpha: f64,
    pub(crate) life: f64,
}

/// Implicit lattice the Grid rule springs particles onto.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Lattice {
    pub(crate) cols: usize,
    pub(crate) rows: usize,
    pub(crate) spacing: Vec2,
}

impl Lattice {
    pub(crate) fn for_count(count: usize, viewport: Viewport) -> Self {
        let cols = ((count as f64 * viewport.aspect()).sqrt().floor() as usize).max(1);
        let rows = (count / cols).max(1);
        Self {
            cols,
            rows,
            spacing: Vec2::new(viewport.w() / cols as f64, viewport.h() / rows as f64),
        }
    }

    pub(crate) fn home(&self, i: usize) -> Point {
        let col = (i % self.cols) as f64;
        let row = (i / self.cols) as f64;
        Point::new(
            col * self.spacing.x + self.spacing.x / 2.0,
            row * self.spacing.y + self.spacing.y / 2.0,
        )
    }
}

/// The always-mounted background layer.
///
/// A mode change restarts the pool and clears the surface; the layer itself stays mounted.
#[derive(Debug)]
pub struct ParticleField {
    opts: ParticleFieldOpts,
    mode: VisualMode,
    accent: Rgb8,
    seed: u64,
    rng: Rng64,
    viewport: Viewport,
    pub(crate) particles: Vec<Particle>,
    pending_clear: bool,
}

impl ParticleField {
    pub fn new(mode: VisualMode, accent: Rgb8, seed: u64, opts: ParticleFieldOpts) -> Self {
        Self {
            opts,
            mode,
            accent,
            seed,
            rng: Rng64::new(seed),
            viewport: Viewport::default(),
            particles: Vec::new(),
            pending_clear: true,
        }
    }

    pub fn mode(&self) -> VisualMode {
        self.mode
    }

    pub fn accent(&self) -> Rgb8 {
        self.accent
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    fn spawn(&mut self) {
        let count = self.opts.particle_count(self.viewport);
        let lattice = Lattice::for_count(count, self.viewport);
        let vp = self.viewport;
        let rng = &mut self.rng;
        self.particles = (0..count)
            .map(|i| Particle {
                pos: rng.point_in(vp),
                vel: Vec2::new(rng.symmetric(1.0), rng.symmetric(1.0)),
                home: lattice.home(i),
                size: rng.range(1.0, 3.0),
                phase: rng.range(0.0, 100.0),
                alpha: rng.next_f64_01(),
                life: rng.range(0.0, 100.0),
            })
            .collect();
    }

    fn step_particle(&mut self, i: usize, t: f64) {
        let vp = self.viewport;
        let (w, h) = (vp.w(), vp.h());
        let mode = self.mode;
        let p = &mut self.particles[i];
        match mode {
            VisualMode::Grid => {
                p.pos += (p.home - p.pos) * SPRING;
            }
            VisualMode::Chaos => {
                p.pos += p.vel * CHAOS_SPEED;
                bounce(p, w, h);
            }
            VisualMode::Flow => {
                let angle = flow_field_angle(p.pos, vp);
                p.vel = Vec2::new(angle.cos(), angle.sin()) * FLOW_SPEED;
                p.pos += p.vel;
                if vp.contains(p.pos) {
                    if p.alpha < FLOW_MAX_ALPHA {
                        p.alpha = (p.alpha + FLOW_FADE_IN).min(FLOW_MAX_ALPHA);
                    }
                } else {
                    // Respawned particles start invisible and fade in from the next frame.
                    p.pos = self.rng.point_in(vp);
                    p.alpha = 0.0;
                }
            }
            VisualMode::Network => {
                p.pos.x += (t + p.phase).sin() * DRIFT_SPEED;
                p.pos.y += (t * 0.5 + p.phase).cos() * DRIFT_SPEED;
                p.pos = wrap_with_margin(p.pos, vp, NETWORK_MARGIN);
            }
            VisualMode::Convergence => {
                let d = p.pos - vp.center();
                let dist = d.hypot();
                let angle = d.y.atan2(d.x) + SPIRAL_TWIST;
                p.pos -= Vec2::new(angle.cos(), angle.sin()) * SPIRAL_SPEED;
                if dist < SPIRAL_RESPAWN_DIST {
                    p.pos = self.rng.point_in(vp);
                }
            }
            VisualMode::Explosion => {
                p.pos += p.vel * DRIFT_SPEED;
                bounce(p, w, h);
            }
        }
    }

    fn network_edges(&self) -> Vec<(Point, Point, f32)> {
        let mut edges = Vec::new();
        for i in (0..self.particles.len()).step_by(NETWORK_SOURCE_EVERY) {
            let a = self.particles[i].pos;
            for j in (i + 1..self.particles.len()).step_by(NETWORK_PARTNER_STRIDE) {
                let b = self.particles[j].pos;
                let d2 = (a - b).hypot2();
                if d2 < NETWORK_LINK_DIST_SQ {
                    edges.push((a, b, (1.0 - d2 / NETWORK_LINK_DIST_SQ) as f32));
                }
            }
        }
        edges
    }
}

fn bounce(p: &mut Particle, w: f64, h: f64) {
    if p.pos.x < 0.0 || p.pos.x > w {
        p.vel.x = -p.vel.x;
    }
    if p.pos.y < 0.0 || p.pos.y > h {
        p.vel.y = -p.vel.y;
    }
}

impl Simulation for ParticleField {
    fn name(&self) -> &'static str {
        "particle_field"
    }

    fn init(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.rng = Rng64::new(self.seed);
        self.spawn();
        self.pending_clear = true;
    }

    fn step(&mut self, frame: &FrameCtx) {
        if frame.viewport != self.viewport {
            self.init(frame.viewport);
        }
        for i in 0..self.particles.len() {
            self.step_particle(i, frame.clock_secs);
        }
    }

    fn render(&mut self, _frame: &FrameCtx, surface: &mut Surface) {
        if std::mem::take(&mut self.pending_clear) {
            surface.clear();
        }
        surface.fade(TRAIL_FADE);

        let mode = self.mode;
        let accent = self.accent;
        let edges = if mode == VisualMode::Network {
            self.network_edges()
        } else {
            Vec::new()
        };
        let particles = &self.particles;
        let painted = surface.paint(|painter| {
            for p in particles {
                let color = match mode {
                    VisualMode::Grid => Rgb8::WHITE.with_alpha(0.3),
                    VisualMode::Chaos | VisualMode::Convergence => accent.opaque(),
                    VisualMode::Flow => accent.with_alpha(p.alpha as f32),
                    VisualMode::Network => NETWORK_NODE.with_alpha(0.3),
                    VisualMode::Explosion => accent.with_alpha(0.3),
                };
                painter.fill_circle(p.pos, p.size, color);
            }
            for (a, b, alpha) in &edges {
                painter.stroke_line(*a, *b, 0.5, accent.with_alpha(*alpha));
            }
        });
        if let Err(err) = painted {
            tracing::warn!(error = %err, "particle field paint failed");
        }
    }

    fn retune(&mut self, mode: VisualMode, accent: Rgb8) {
        self.mode = mode;
        self.accent = accent;
        // Same viewport, same seed: identical pool, fresh state.
        self.init(self.viewport);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/particles.rs"]
mod tests;
