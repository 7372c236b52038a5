//! Presentation sessions: one deck, one stage, driven frame by frame.

use crate::config::DeckConfig;
use crate::deck::beat::Beat;
use crate::deck::nav::{Navigator, action_for_key};
use crate::deck::script::{CODE_LISTING, DEFAULT_PROMPT, TypingScript};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, Viewport};
use crate::foundation::error::{DeckError, DeckResult};
use crate::render::frame::FrameRGBA;
use crate::sim::primitives::Rng64;
use crate::stage::dispatcher::Stage;

use rayon::prelude::*;

/// Autoplay/clip statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub beats: u64,
    pub frames: u64,
    /// Layers that ran without a surface at any point.
    pub degraded_layers: u64,
}

impl RenderStats {
    fn absorb(&mut self, other: RenderStats) {
        self.beats = self.beats.saturating_add(other.beats);
        self.frames = self.frames.saturating_add(other.frames);
        self.degraded_layers = self.degraded_layers.saturating_add(other.degraded_layers);
    }
}

/// Options for [`render_beat_clips`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClipOpts {
    /// Frames rendered per beat.
    pub frames: u64,
    /// Render beats concurrently, one session per beat.
    pub parallel: bool,
    /// Worker count when `parallel`; `None` lets rayon decide.
    pub threads: Option<usize>,
}

impl Default for ClipOpts {
    fn default() -> Self {
        Self {
            frames: 120,
            parallel: false,
            threads: None,
        }
    }
}

/// A running deck: the beat table, the navigator, the stage and the typing script of the
/// current beat (present only when that beat carries a code snippet).
pub struct Presentation {
    config: DeckConfig,
    beats: Vec<Beat>,
    nav: Navigator,
    stage: Stage,
    script: Option<TypingScript>,
    frames_in_beat: u64,
}

impl std::fmt::Debug for Presentation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Presentation")
            .field("beat", &self.nav.index())
            .field("beats", &self.beats.len())
            .field("frames_in_beat", &self.frames_in_beat)
            .field("stage", &self.stage)
            .finish()
    }
}

impl Presentation {
    /// Validate `config` and open the deck on its first beat.
    #[tracing::instrument(skip(config), fields(width = config.viewport.width, height = config.viewport.height))]
    pub fn new(config: &DeckConfig) -> DeckResult<Self> {
        config.validate()?;
        let beats = config.beats();
        let nav = Navigator::new(beats.len())?;
        let stage = Stage::new(
            config.viewport,
            config.fps,
            config.seed,
            config.particles,
        );
        let mut out = Self {
            config: config.clone(),
            beats,
            nav,
            stage,
            script: None,
            frames_in_beat: 0,
        };
        out.activate();
        Ok(out)
    }

    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    pub fn beats(&self) -> &[Beat] {
        &self.beats
    }

    pub fn index(&self) -> usize {
        self.nav.index()
    }

    pub fn current(&self) -> &Beat {
        &self.beats[self.nav.index()]
    }

    pub fn navigator(&self) -> &Navigator {
        &self.nav
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn script(&self) -> Option<&TypingScript> {
        self.script.as_ref()
    }

    /// Frames advanced since the current beat became active.
    pub fn frames_in_beat(&self) -> u64 {
        self.frames_in_beat
    }

    /// Jump to `index` (clamped). Returns whether the beat changed.
    pub fn goto(&mut self, index: usize) -> bool {
        let changed = self.nav.goto(index);
        if changed {
            self.activate();
        }
        changed
    }

    pub fn next(&mut self) -> bool {
        self.goto(self.nav.index().saturating_add(1))
    }

    pub fn prev(&mut self) -> bool {
        self.goto(self.nav.index().saturating_sub(1))
    }

    /// Apply a keyboard event code (`"ArrowRight"`, `"Space"`, ...). Unmapped keys are ignored.
    pub fn handle_key(&mut self, code: &str) -> bool {
        match action_for_key(code) {
            Some(action) => {
                let changed = self.nav.apply(action);
                if changed {
                    self.activate();
                }
                changed
            }
            None => false,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) -> DeckResult<()> {
        let viewport = Viewport::new(width, height)?;
        self.stage.resize(viewport);
        Ok(())
    }

    /// Advance every mounted layer and the typing script by one frame.
    pub fn advance(&mut self) {
        self.stage.tick();
        if let Some(script) = self.script.as_mut() {
            script.advance(self.config.fps.frame_duration_secs() * 1000.0);
        }
        self.frames_in_beat = self.frames_in_beat.saturating_add(1);
    }

    /// Composite the current layer state.
    pub fn frame(&self) -> DeckResult<FrameRGBA> {
        self.stage.composite()
    }

    /// Advance one frame, then composite it.
    pub fn render_frame(&mut self) -> DeckResult<FrameRGBA> {
        self.advance();
        self.frame()
    }

    /// Play the deck from its first beat, `frames_per_beat` frames each, into `sink`.
    #[tracing::instrument(skip(self, sink))]
    pub fn play_autoplay(
        &mut self,
        frames_per_beat: u64,
        sink: &mut dyn FrameSink,
    ) -> DeckResult<RenderStats> {
        if frames_per_beat == 0 {
            return Err(DeckError::validation("frames_per_beat must be > 0"));
        }
        self.nav.goto(0);
        self.restart_beat();
        let viewport = self.stage.viewport();
        sink.begin(SinkConfig {
            width: viewport.width,
            height: viewport.height,
            fps: self.config.fps,
        })?;

        let mut stats = RenderStats::default();
        let mut idx = 0u64;
        for beat in 0..self.beats.len() {
            if beat > 0 {
                self.goto(beat);
            }
            for _ in 0..frames_per_beat {
                let frame = self.render_frame()?;
                sink.push_frame(FrameIndex(idx), &frame)?;
                idx += 1;
            }
            stats.beats += 1;
            tracing::debug!(beat, frames = idx, "beat rendered");
        }
        sink.end()?;

        stats.frames = idx;
        stats.degraded_layers = self.stage.stats().degraded_layers;
        Ok(stats)
    }

    /// Start the current beat over: fresh illustration, reset background and typing script.
    pub fn restart_beat(&mut self) {
        self.stage.release();
        self.activate();
    }

    fn activate(&mut self) {
        let index = self.nav.index();
        let beat = &self.beats[index];
        self.stage.show(index, beat);
        // Beats with a code snippet get the typing overlay, which always types the full listing.
        self.script = beat.code_snippet.is_some().then(|| {
            let seed = Rng64::new(self.config.seed)
                .fork(0x7F00 + index as u64)
                .next_u64();
            TypingScript::new(DEFAULT_PROMPT, CODE_LISTING, seed)
        });
        self.frames_in_beat = 0;
    }
}

/// Render frame `frame` (0-based) of beat `beat` in a fresh session.
pub fn render_beat_frame(config: &DeckConfig, beat: usize, frame: u64) -> DeckResult<FrameRGBA> {
    let mut p = Presentation::new(config)?;
    if beat >= p.beats().len() {
        return Err(DeckError::validation(format!(
            "beat {beat} out of range (deck has {} beats)",
            p.beats().len()
        )));
    }
    p.goto(beat);
    for _ in 0..frame {
        p.advance();
    }
    p.render_frame()
}

/// Render every beat as an independent clip. `make_sink` is called once per beat with its
/// index; each beat gets its own session, so beats may render concurrently.
#[tracing::instrument(skip(config, make_sink))]
pub fn render_beat_clips<S, F>(
    config: &DeckConfig,
    opts: ClipOpts,
    make_sink: F,
) -> DeckResult<RenderStats>
where
    S: FrameSink,
    F: Fn(usize, &Beat) -> DeckResult<S> + Sync,
{
    if opts.frames == 0 {
        return Err(DeckError::validation("clip frames must be > 0"));
    }
    config.validate()?;
    let beats = config.beats();

    let render_one = |index: usize| -> DeckResult<RenderStats> {
        let mut sink = make_sink(index, &beats[index])?;
        render_clip(config, index, opts.frames, &mut sink)
    };

    let per_beat: Vec<DeckResult<RenderStats>> = if opts.parallel {
        let pool = build_thread_pool(opts.threads)?;
        pool.install(|| (0..beats.len()).into_par_iter().map(render_one).collect())
    } else {
        (0..beats.len()).map(render_one).collect()
    };

    let mut total = RenderStats::default();
    for stats in per_beat {
        total.absorb(stats?);
    }
    Ok(total)
}

fn render_clip(
    config: &DeckConfig,
    beat: usize,
    frames: u64,
    sink: &mut dyn FrameSink,
) -> DeckResult<RenderStats> {
    let mut p = Presentation::new(config)?;
    p.goto(beat);
    sink.begin(SinkConfig {
        width: config.viewport.width,
        height: config.viewport.height,
        fps: config.fps,
    })?;
    for f in 0..frames {
        let frame = p.render_frame()?;
        sink.push_frame(FrameIndex(f), &frame)?;
    }
    sink.end()?;
    Ok(RenderStats {
        beats: 1,
        frames,
        degraded_layers: p.stage().stats().degraded_layers,
    })
}

fn build_thread_pool(threads: Option<usize>) -> DeckResult<rayon::ThreadPool> {
    if threads == Some(0) {
        return Err(DeckError::validation("threads must be >= 1 when set"));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| DeckError::validation(format!("build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
