use crate::deck::beat::{Beat, VisualMode};
use crate::foundation::core::{Fps, Rgb8, Viewport};
use crate::foundation::error::DeckResult;
use crate::render::frame::FrameRGBA;
use crate::sim::Simulation;
use crate::sim::ambient::{DriftingShards, FlowRibbons, FramedCard};
use crate::sim::depth::DepthStream;
use crate::sim::flock::FlowFlock;
use crate::sim::graph::{GraphAutomaton, GraphOpts};
use crate::sim::particles::{ParticleField, ParticleFieldOpts};
use crate::sim::primitives::Rng64;
use crate::stage::scheduler::{FrameHandle, FrameScheduler, SchedulerStats};

/// An illustration ready to mount, with the opacity its layer composites at.
pub struct Illustration {
    pub sim: Box<dyn Simulation>,
    pub opacity: f32,
}

impl std::fmt::Debug for Illustration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Illustration")
            .field("sim", &self.sim.name())
            .field("opacity", &self.opacity)
            .finish()
    }
}

/// Build the illustration a beat's mode calls for.
pub fn illustration_for(mode: VisualMode, accent: Rgb8, seed: u64) -> Illustration {
    let (sim, opacity): (Box<dyn Simulation>, f32) = match mode {
        VisualMode::Grid => (Box::new(FramedCard::new(accent)), 1.0),
        VisualMode::Chaos => (Box::new(DriftingShards::new(accent, seed)), 1.0),
        VisualMode::Flow => (Box::new(FlowRibbons::new(accent)), 0.4),
        VisualMode::Network => (
            Box::new(GraphAutomaton::new(accent, seed, GraphOpts::default())),
            0.6,
        ),
        VisualMode::Convergence => (Box::new(DepthStream::new(seed)), 1.0),
        VisualMode::Explosion => (Box::new(FlowFlock::new(accent, seed)), 0.8),
    };
    Illustration { sim, opacity }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Active {
    beat: usize,
    mode: VisualMode,
    handle: FrameHandle,
}

/// The particle field plus at most one illustration, swapped as the active beat changes.
#[derive(Debug)]
pub struct Stage {
    scheduler: FrameScheduler,
    seed: u64,
    background: FrameHandle,
    active: Option<Active>,
}

impl Stage {
    pub fn new(viewport: Viewport, fps: Fps, seed: u64, particles: ParticleFieldOpts) -> Self {
        let mut scheduler = FrameScheduler::new(viewport, fps);
        let field = ParticleField::new(VisualMode::Grid, Rgb8::WHITE, seed, particles);
        let background = scheduler.mount(Box::new(field), 1.0);
        Self {
            scheduler,
            seed,
            background,
            active: None,
        }
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn stats(&self) -> SchedulerStats {
        self.scheduler.stats()
    }

    pub fn viewport(&self) -> Viewport {
        self.scheduler.viewport()
    }

    pub fn active_beat(&self) -> Option<usize> {
        self.active.map(|a| a.beat)
    }

    pub fn active_mode(&self) -> Option<VisualMode> {
        self.active.map(|a| a.mode)
    }

    /// Handle of the mounted illustration, if any.
    pub fn illustration_handle(&self) -> Option<FrameHandle> {
        self.active.map(|a| a.handle)
    }

    pub fn background_handle(&self) -> FrameHandle {
        self.background
    }

    /// Seed for the illustration of `beat`; stable across runs and sessions.
    fn illustration_seed(&self, beat: usize) -> u64 {
        Rng64::new(self.seed).fork(beat as u64).next_u64()
    }

    /// Make `beat` (at `index` in the deck) the active one. Returns `false` if it already was.
    ///
    /// The old illustration is cancelled before the new one is mounted, so at no point are two
    /// illustrations live.
    #[tracing::instrument(skip(self, beat), fields(mode = %beat.visual_mode))]
    pub fn show(&mut self, index: usize, beat: &Beat) -> bool {
        if self.active.is_some_and(|a| a.beat == index) {
            return false;
        }
        if let Some(old) = self.active.take() {
            self.scheduler.cancel(old.handle);
        }
        self.scheduler
            .retune(self.background, beat.visual_mode, beat.accent);

        let ill = illustration_for(beat.visual_mode, beat.accent, self.illustration_seed(index));
        let handle = self.scheduler.mount(ill.sim, ill.opacity);
        self.active = Some(Active {
            beat: index,
            mode: beat.visual_mode,
            handle,
        });
        true
    }

    /// Unmount the current illustration so the next `show` mounts it afresh, even for the
    /// same beat. Returns `false` when nothing was mounted.
    pub fn release(&mut self) -> bool {
        match self.active.take() {
            Some(old) => self.scheduler.cancel(old.handle),
            None => false,
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.scheduler.resize(viewport);
    }

    pub fn tick(&mut self) {
        self.scheduler.tick();
    }

    pub fn composite(&self) -> DeckResult<FrameRGBA> {
        self.scheduler.composite()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stage/dispatcher.rs"]
mod tests;
