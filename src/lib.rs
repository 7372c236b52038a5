//! Vibedeck renders beat-driven presentation visuals on the CPU.
//!
//! A deck is an ordered table of [`Beat`]s, each tagged with a [`VisualMode`] and an accent
//! color. A [`Presentation`] owns one [`Stage`]: a particle field that is always mounted and
//! follows the active mode, plus exactly one illustration chosen by that mode (framed card,
//! drifting shards, flow ribbons, graph automaton, depth stream or flocking field).
//!
//! - Load and validate a [`DeckConfig`]
//! - Create a [`Presentation`] and navigate it like a slide deck
//! - Render single frames, autoplay the deck into a [`FrameSink`], or render every beat as an
//!   independent clip with [`render_beat_clips`]
#![forbid(unsafe_code)]

mod foundation;

/// Deck configuration.
pub mod config;
/// Beat table, navigation and the typing script.
pub mod deck;
/// Frame sinks.
pub mod encode;
/// Raster surfaces and composited frames.
pub mod render;
/// Presentation sessions.
pub mod session;
/// Frame-driven simulations.
pub mod sim;
/// Layer scheduling and beat dispatch.
pub mod stage;

pub use crate::foundation::core::{Fps, FrameIndex, Point, Rgb8, Rgba, Vec2, Viewport};
pub use crate::foundation::error::{DeckError, DeckResult};

pub use crate::config::DeckConfig;
pub use crate::deck::beat::{Beat, VisualMode, default_beats};
pub use crate::deck::nav::{NavAction, Navigator};
pub use crate::deck::script::{TypingPhase, TypingScript, TypingView};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{
    FrameSink, InMemorySink, PngSequenceSink, SinkConfig, ensure_parent_dir,
};
pub use crate::render::frame::FrameRGBA;
pub use crate::render::surface::Surface;
pub use crate::session::{
    ClipOpts, Presentation, RenderStats, render_beat_clips, render_beat_frame,
};
pub use crate::sim::particles::ParticleFieldOpts;
pub use crate::sim::{FrameCtx, Simulation};
pub use crate::stage::dispatcher::Stage;
pub use crate::stage::scheduler::{FrameHandle, FrameScheduler, SchedulerStats};
