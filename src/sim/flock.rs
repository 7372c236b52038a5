//! Agents steered by a drifting pseudo-noise angle field.

use crate::deck::beat::VisualMode;
use crate::foundation::core::{Point, Rgb8, Viewport};
use crate::render::surface::Surface;
use crate::sim::primitives::{
    Rng64, approach_angle, polar, pseudo_noise_angle, wrap_edges,
};
use crate::sim::{FrameCtx, Simulation};

pub(crate) const AGENT_COUNT: usize = 200;
pub(crate) const TURN_RATE: f64 = 0.05;
const FIELD_DRIFT: f64 = 0.005;
const TRAIL_FADE: f32 = 0.1;
const AGENT_RADIUS: f64 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct FlockAgent {
    pub(crate) pos: Point,
    pub(crate) heading: f64,
    pub(crate) speed: f64,
}

#[derive(Debug)]
pub struct FlowFlock {
    color: Rgb8,
    seed: u64,
    rng: Rng64,
    viewport: Viewport,
    /// Field time, advanced by a fixed amount per frame.
    t: f64,
    pub(crate) agents: Vec<FlockAgent>,
    cleared: bool,
}

impl FlowFlock {
    pub fn new(color: Rgb8, seed: u64) -> Self {
        Self {
            color,
            seed,
            rng: Rng64::new(seed),
            viewport: Viewport::default(),
            t: 0.0,
            agents: Vec::new(),
            cleared: false,
        }
    }

    pub(crate) fn field_time(&self) -> f64 {
        self.t
    }
}

impl Simulation for FlowFlock {
    fn name(&self) -> &'static str {
        "flow_flock"
    }

    fn init(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.rng = Rng64::new(self.seed);
        self.t = 0.0;
        let rng = &mut self.rng;
        self.agents = (0..AGENT_COUNT)
            .map(|_| FlockAgent {
                pos: rng.point_in(viewport),
                heading: rng.angle(),
                speed: rng.range(1.0, 3.0),
            })
            .collect();
        self.cleared = false;
    }

    fn step(&mut self, _frame: &FrameCtx) {
        self.t += FIELD_DRIFT;
        let t = self.t;
        let vp = self.viewport;
        for a in &mut self.agents {
            let field = pseudo_noise_angle(a.pos, t);
            a.heading = approach_angle(a.heading, field, TURN_RATE);
            a.pos += polar(a.heading, a.speed);
            a.pos = wrap_edges(a.pos, vp);
        }
    }

    fn render(&mut self, _frame: &FrameCtx, surface: &mut Surface) {
        if !std::mem::replace(&mut self.cleared, true) {
            surface.clear();
        }
        surface.fade(TRAIL_FADE);
        let color = self.color.opaque();
        let agents = &self.agents;
        let painted = surface.paint(|painter| {
            for a in agents {
                painter.fill_circle(a.pos, AGENT_RADIUS, color);
            }
        });
        if let Err(err) = painted {
            tracing::warn!(error = %err, "flock paint failed");
        }
    }

    fn retune(&mut self, _mode: VisualMode, accent: Rgb8) {
        self.color = accent;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/flock.rs"]
mod tests;
