//! Frame-driven simulations and the contract the scheduler drives them through.

pub mod ambient;
pub mod depth;
pub mod flock;
pub mod graph;
pub mod particles;
pub(crate) mod primitives;

use crate::deck::beat::VisualMode;
use crate::foundation::core::{Rgb8, Viewport};
use crate::render::surface::Surface;

/// Per-tick timing handed to every mounted simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameCtx {
    /// Frames since the simulation was mounted (0 on its first tick).
    pub local_frame: u64,
    /// Seconds since the simulation was mounted.
    pub local_secs: f64,
    /// Seconds since the scheduler started; shared by all layers.
    pub clock_secs: f64,
    /// Current surface dimensions.
    pub viewport: Viewport,
}

/// A mounted visual: owns its state, is stepped and rendered once per tick.
///
/// `init` (re)provisions all state for a viewport and is called on mount and on every resize.
/// `step` advances state; `render` draws into the simulation's exclusive surface. A layer
/// without a surface is still stepped but never rendered.
pub trait Simulation: Send {
    /// Short stable name for logs.
    fn name(&self) -> &'static str;

    /// (Re)initialize all state for `viewport`.
    fn init(&mut self, viewport: Viewport);

    /// Advance one frame.
    fn step(&mut self, frame: &FrameCtx);

    /// Draw the current state.
    fn render(&mut self, frame: &FrameCtx, surface: &mut Surface);

    /// Receive a new beat mode/accent while staying mounted. Defaults to ignoring it.
    fn retune(&mut self, _mode: VisualMode, _accent: Rgb8) {}

    /// Release anything beyond plain owned state. Called once, right before the layer is dropped.
    fn teardown(&mut self) {}
}
