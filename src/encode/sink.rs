use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{DeckError, DeckResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::frame::FrameRGBA;
use std::path::{Path, PathBuf};

/// Stream geometry handed to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
}

/// Consumer of composited frames.
///
/// `push_frame` is called with strictly increasing `FrameIndex` values between one `begin` and
/// its matching `end`.
pub trait FrameSink: Send {
    fn begin(&mut self, cfg: SinkConfig) -> DeckResult<()>;
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> DeckResult<()>;
    fn end(&mut self) -> DeckResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> DeckResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> DeckResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> DeckResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Writes each frame as `<dir>/<prefix><index:06>.png`.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    prefix: String,
    cfg: Option<SinkConfig>,
    scratch: Vec<u8>,
    written: u64,
}

impl PngSequenceSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: "frame_".to_owned(),
            cfg: None,
            scratch: Vec::new(),
            written: 0,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn path_for(&self, idx: FrameIndex) -> PathBuf {
        self.dir.join(format!("{}{:06}.png", self.prefix, idx.0))
    }

    pub fn written(&self) -> u64 {
        self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> DeckResult<()> {
        check_geometry(cfg)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            DeckError::encode(format!(
                "create png output dir '{}': {e}",
                self.dir.display()
            ))
        })?;
        self.scratch = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4];
        self.cfg = Some(cfg);
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> DeckResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| DeckError::encode("png sink not started"))?;
        check_frame(cfg, frame)?;
        flatten_premul_over_bg(&mut self.scratch, &frame.data, [0, 0, 0])?;
        let path = self.path_for(idx);
        image::save_buffer_with_format(
            &path,
            &self.scratch,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| DeckError::encode(format!("write png '{}': {e}", path.display())))?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> DeckResult<()> {
        self.cfg = None;
        Ok(())
    }
}

pub(crate) fn check_geometry(cfg: SinkConfig) -> DeckResult<()> {
    if cfg.fps.num == 0 || cfg.fps.den == 0 {
        return Err(DeckError::validation("fps must be non-zero"));
    }
    if cfg.width == 0 || cfg.height == 0 {
        return Err(DeckError::validation("sink width/height must be non-zero"));
    }
    Ok(())
}

pub(crate) fn check_frame(cfg: SinkConfig, frame: &FrameRGBA) -> DeckResult<()> {
    if frame.width != cfg.width || frame.height != cfg.height {
        return Err(DeckError::validation(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.width, frame.height, cfg.width, cfg.height
        )));
    }
    if frame.data.len() != (cfg.width as usize) * (cfg.height as usize) * 4 {
        return Err(DeckError::validation(
            "frame.data size mismatch with width*height*4",
        ));
    }
    Ok(())
}

/// Flatten premultiplied RGBA8 over an opaque background; output alpha is always 255.
pub(crate) fn flatten_premul_over_bg(dst: &mut [u8], src: &[u8], bg: [u8; 3]) -> DeckResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(DeckError::encode(
            "flatten expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let inv = 255 - u16::from(s[3]);
        for c in 0..3 {
            let v = u16::from(s[c]) + mul_div255_u16(u16::from(bg[c]), inv);
            d[c] = v.min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

/// Create the parent directory of `path` if needed.
pub fn ensure_parent_dir(path: &Path) -> DeckResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
