use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::deck::beat::{Beat, default_beats, validate_beats};
use crate::foundation::core::{Fps, Viewport};
use crate::foundation::error::{DeckError, DeckResult};
use crate::sim::particles::ParticleFieldOpts;

/// Largest surface edge the rasterizer addresses.
pub const MAX_SURFACE_EDGE: u32 = u16::MAX as u32;

/// Everything a presentation run needs besides the frame sink. Every field has a default, so
/// `{}` is a valid configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeckConfig {
    pub viewport: Viewport,
    pub fps: Fps,
    /// Root seed; every simulation derives its own stream from it.
    pub seed: u64,
    /// Autoplay dwell per beat.
    pub frames_per_beat: u64,
    /// Replaces the built-in beat table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beats: Option<Vec<Beat>>,
    pub particles: ParticleFieldOpts,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            fps: Fps::default(),
            seed: 0x5EED,
            frames_per_beat: 180,
            beats: None,
            particles: ParticleFieldOpts::default(),
        }
    }
}

impl DeckConfig {
    /// Parse a configuration from JSON.
    pub fn from_reader<R: std::io::Read>(r: R) -> DeckResult<Self> {
        serde_json::from_reader(r).map_err(|e| DeckError::serde(format!("parse deck config JSON: {e}")))
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> DeckResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            DeckError::validation(format!("open deck config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> DeckResult<()> {
        let Viewport { width, height } = self.viewport;
        if width == 0 || height == 0 {
            return Err(DeckError::validation(format!(
                "viewport must be non-empty, got {width}x{height}"
            )));
        }
        if width > MAX_SURFACE_EDGE || height > MAX_SURFACE_EDGE {
            return Err(DeckError::validation(format!(
                "viewport {width}x{height} exceeds {MAX_SURFACE_EDGE} px per edge"
            )));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        if self.frames_per_beat == 0 {
            return Err(DeckError::validation("frames_per_beat must be > 0"));
        }
        let p = &self.particles;
        if !p.density_per_kpx.is_finite() || p.density_per_kpx < 0.0 {
            return Err(DeckError::validation(
                "particles.density_per_kpx must be finite and >= 0",
            ));
        }
        if p.desktop_cap == 0 {
            return Err(DeckError::validation("particles.desktop_cap must be > 0"));
        }
        if let Some(beats) = &self.beats {
            validate_beats(beats)?;
        }
        Ok(())
    }

    /// The beat table in effect: the override if present, else the built-in deck.
    pub fn beats(&self) -> Vec<Beat> {
        self.beats.clone().unwrap_or_else(default_beats)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
