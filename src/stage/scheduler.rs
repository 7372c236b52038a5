use crate::deck::beat::VisualMode;
use crate::foundation::core::{Fps, Rgb8, Viewport};
use crate::foundation::error::DeckResult;
use crate::render::frame::FrameRGBA;
use crate::render::surface::Surface;
use crate::sim::{FrameCtx, Simulation};

/// Identifies one mounted layer. Handles are never reused within a scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// Counters for one scheduler's lifetime.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub ticks: u64,
    pub mounts: u64,
    pub cancels: u64,
    pub resizes: u64,
    /// Layers that have run without a surface at some point.
    pub degraded_layers: u64,
}

struct Layer {
    handle: FrameHandle,
    sim: Box<dyn Simulation>,
    opacity: f32,
    surface: Option<Surface>,
    mounted_at: u64,
    warned: bool,
}

impl Layer {
    fn provision(&mut self, viewport: Viewport, stats: &mut SchedulerStats) {
        self.sim.init(viewport);
        self.surface = match Surface::new(viewport) {
            Ok(s) => Some(s),
            Err(err) => {
                if !self.warned {
                    self.warned = true;
                    stats.degraded_layers = stats.degraded_layers.saturating_add(1);
                    tracing::warn!(
                        layer = self.sim.name(),
                        handle = self.handle.0,
                        error = %err,
                        "no surface for layer; stepping without drawing"
                    );
                }
                None
            }
        };
    }
}

/// Drives every mounted simulation once per tick, in mount order.
///
/// Each tick a layer is stepped and then rendered before the next layer runs, so state from
/// frame `N` is what frame `N + 1` starts from. Cancelling a layer removes it synchronously.
pub struct FrameScheduler {
    viewport: Viewport,
    fps: Fps,
    frame: u64,
    next_handle: u64,
    layers: Vec<Layer>,
    stats: SchedulerStats,
}

impl std::fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("viewport", &self.viewport)
            .field("frame", &self.frame)
            .field("layers", &self.layer_names())
            .finish()
    }
}

impl FrameScheduler {
    pub fn new(viewport: Viewport, fps: Fps) -> Self {
        Self {
            viewport,
            fps,
            frame: 0,
            next_handle: 0,
            layers: Vec::new(),
            stats: SchedulerStats::default(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Ticks completed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats.clone()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer_names(&self) -> Vec<&'static str> {
        self.layers.iter().map(|l| l.sim.name()).collect()
    }

    pub fn is_live(&self, handle: FrameHandle) -> bool {
        self.layers.iter().any(|l| l.handle == handle)
    }

    /// Initialize `sim` for the current viewport and start ticking it. Layers composite in
    /// mount order, each at `opacity`.
    pub fn mount(&mut self, sim: Box<dyn Simulation>, opacity: f32) -> FrameHandle {
        let handle = FrameHandle(self.next_handle);
        self.next_handle = self.next_handle.saturating_add(1);
        let mut layer = Layer {
            handle,
            sim,
            opacity: opacity.clamp(0.0, 1.0),
            surface: None,
            mounted_at: self.frame,
            warned: false,
        };
        layer.provision(self.viewport, &mut self.stats);
        tracing::debug!(layer = layer.sim.name(), handle = handle.0, "mount");
        self.layers.push(layer);
        self.stats.mounts = self.stats.mounts.saturating_add(1);
        handle
    }

    /// Stop and drop a layer with its surface. Returns `false` for unknown or already
    /// cancelled handles.
    pub fn cancel(&mut self, handle: FrameHandle) -> bool {
        let Some(i) = self.layers.iter().position(|l| l.handle == handle) else {
            return false;
        };
        let mut layer = self.layers.remove(i);
        layer.sim.teardown();
        tracing::debug!(layer = layer.sim.name(), handle = handle.0, "cancel");
        self.stats.cancels = self.stats.cancels.saturating_add(1);
        true
    }

    pub fn retune(&mut self, handle: FrameHandle, mode: VisualMode, accent: Rgb8) -> bool {
        match self.layers.iter_mut().find(|l| l.handle == handle) {
            Some(layer) => {
                layer.sim.retune(mode, accent);
                true
            }
            None => false,
        }
    }

    pub fn retune_all(&mut self, mode: VisualMode, accent: Rgb8) {
        for layer in &mut self.layers {
            layer.sim.retune(mode, accent);
        }
    }

    /// Reprovision every surface and re-initialize every simulation. A no-op for the current size.
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            layers = self.layers.len(),
            "resize"
        );
        self.viewport = viewport;
        for layer in &mut self.layers {
            layer.provision(viewport, &mut self.stats);
        }
        self.stats.resizes = self.stats.resizes.saturating_add(1);
    }

    /// Step then render each layer, in mount order.
    pub fn tick(&mut self) {
        let clock_secs = self.fps.frames_to_secs(self.frame);
        for layer in &mut self.layers {
            let local_frame = self.frame.saturating_sub(layer.mounted_at);
            let ctx = FrameCtx {
                local_frame,
                local_secs: self.fps.frames_to_secs(local_frame),
                clock_secs,
                viewport: self.viewport,
            };
            layer.sim.step(&ctx);
            if let Some(surface) = layer.surface.as_mut() {
                layer.sim.render(&ctx, surface);
            }
        }
        self.frame = self.frame.saturating_add(1);
        self.stats.ticks = self.stats.ticks.saturating_add(1);
    }

    /// Flatten every layer over opaque black.
    pub fn composite(&self) -> DeckResult<FrameRGBA> {
        let mut out = FrameRGBA::solid(self.viewport, [0, 0, 0]);
        for layer in &self.layers {
            if let Some(surface) = &layer.surface {
                out.composite_layer(surface.data(), layer.opacity)?;
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stage/scheduler.rs"]
mod tests;
