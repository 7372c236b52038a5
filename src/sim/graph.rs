//! Self-propagating node graph grown a branch at a time from a central seed.

use crate::deck::beat::VisualMode;
use crate::foundation::core::{Point, Rgb8, Viewport};
use crate::render::surface::Surface;
use crate::sim::primitives::{Rng64, polar};
use crate::sim::{FrameCtx, Simulation};

const TRAIL_FADE: f32 = 0.05;
const BRANCH_MIN: f64 = 30.0;
const BRANCH_MAX: f64 = 80.0;
const NODE_RADIUS: f64 = 3.0;
const VISIBLE_AGE: u32 = 100;

/// Growth and eviction knobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphOpts {
    /// Attempt one branch every this many frames.
    pub growth_interval: u64,
    /// Stop attempting growth once the graph holds this many nodes.
    pub growth_limit: usize,
    /// Nodes younger than this are preferred as branch sources.
    pub young_age: u32,
    /// Evict once the graph holds more than this many nodes.
    pub max_nodes: usize,
    /// Oldest nodes dropped per eviction.
    pub evict_block: usize,
}

impl Default for GraphOpts {
    fn default() -> Self {
        Self {
            growth_interval: 5,
            growth_limit: 200,
            young_age: 50,
            max_nodes: 300,
            evict_block: 10,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct GraphNode {
    pub(crate) pos: Point,
    pub(crate) radius: f64,
    /// Index of the node this one branched from. Not rewritten on eviction, so after one it
    /// may point at an unrelated node or past the end.
    pub(crate) parent: Option<usize>,
    pub(crate) age: u32,
}

#[derive(Debug)]
pub struct GraphAutomaton {
    opts: GraphOpts,
    color: Rgb8,
    seed: u64,
    rng: Rng64,
    viewport: Viewport,
    pub(crate) nodes: Vec<GraphNode>,
    cleared: bool,
}

impl GraphAutomaton {
    pub fn new(color: Rgb8, seed: u64, opts: GraphOpts) -> Self {
        Self {
            opts,
            color,
            seed,
            rng: Rng64::new(seed),
            viewport: Viewport::default(),
            nodes: Vec::new(),
            cleared: false,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn try_grow(&mut self) {
        if self.nodes.is_empty() {
            return;
        }
        let young: Vec<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.age < self.opts.young_age)
            .map(|(i, _)| i)
            .collect();
        let source = if young.is_empty() {
            self.rng.index(self.nodes.len())
        } else {
            young[self.rng.index(young.len())]
        };

        let angle = self.rng.angle();
        let len = self.rng.range(BRANCH_MIN, BRANCH_MAX);
        let candidate = self.nodes[source].pos + polar(angle, len);
        if !self.viewport.contains_strict(candidate) {
            return;
        }
        self.nodes.push(GraphNode {
            pos: candidate,
            radius: NODE_RADIUS,
            parent: Some(source),
            age: 0,
        });
    }
}

impl Simulation for GraphAutomaton {
    fn name(&self) -> &'static str {
        "graph_automaton"
    }

    fn init(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.rng = Rng64::new(self.seed);
        self.nodes.clear();
        self.nodes.push(GraphNode {
            pos: viewport.center(),
            radius: 0.0,
            parent: None,
            age: 0,
        });
        self.cleared = false;
    }

    fn step(&mut self, frame: &FrameCtx) {
        let interval = self.opts.growth_interval.max(1);
        if frame.local_frame.is_multiple_of(interval) && self.nodes.len() < self.opts.growth_limit {
            self.try_grow();
        }
        for node in &mut self.nodes {
            node.age = node.age.saturating_add(1);
        }
        if self.nodes.len() > self.opts.max_nodes {
            let n = self.opts.evict_block.min(self.nodes.len());
            self.nodes.drain(..n);
        }
    }

    fn render(&mut self, frame: &FrameCtx, surface: &mut Surface) {
        if !std::mem::replace(&mut self.cleared, true) {
            surface.clear();
        }
        surface.fade(TRAIL_FADE);

        let color = self.color.opaque();
        let nodes = &self.nodes;
        let t = frame.local_frame as f64 * 0.1;
        let painted = surface.paint(|painter| {
            for node in nodes {
                if let Some(parent) = node.parent.and_then(|i| nodes.get(i)) {
                    let width = (2.0 - f64::from(node.age) * 0.05).max(0.1);
                    painter.stroke_line(parent.pos, node.pos, width, color);
                }
                if node.age < VISIBLE_AGE {
                    let r = (node.radius + (t + node.pos.x).sin() * 2.0).max(0.0);
                    painter.fill_circle(node.pos, r, color);
                }
            }
        });
        if let Err(err) = painted {
            tracing::warn!(error = %err, "graph paint failed");
        }
    }

    fn retune(&mut self, _mode: VisualMode, accent: Rgb8) {
        self.color = accent;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/graph.rs"]
mod tests;
