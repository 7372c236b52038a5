use crate::encode::sink::{
    FrameSink, SinkConfig, check_frame, check_geometry, ensure_parent_dir,
    flatten_premul_over_bg,
};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{DeckError, DeckResult};
use crate::render::frame::FrameRGBA;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};

/// Options for [`FfmpegSink`].
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    pub out_path: PathBuf,
    pub overwrite: bool,
    /// x264 constant rate factor; lower is higher quality.
    pub crf: u8,
    pub bg_rgb: [u8; 3],
}

impl FfmpegSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            crf: 20,
            bg_rgb: [0, 0, 0],
        }
    }
}

/// Streams raw frames into a system `ffmpeg` process producing an H.264 MP4.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    frames: u64,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            last_idx: None,
            frames: 0,
        }
    }

    /// Frames written since the last `begin`.
    pub fn frames_written(&self) -> u64 {
        self.frames
    }

    fn command(&self, cfg: SinkConfig) -> Command {
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.arg(if self.opts.overwrite { "-y" } else { "-n" });
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &format!("{}/{}", cfg.fps.num, cfg.fps.den),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-crf",
            &self.opts.crf.to_string(),
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ]);
        cmd.arg(&self.opts.out_path);
        cmd
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> DeckResult<()> {
        check_geometry(cfg)?;
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(DeckError::validation(
                "mp4 output needs even width/height (yuv420p)",
            ));
        }
        if self.opts.crf > 51 {
            return Err(DeckError::validation("crf must be in 0..=51"));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(DeckError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(DeckError::encode(
                "ffmpeg is required for MP4 output, but was not found on PATH",
            ));
        }

        let mut child = self
            .command(cfg)
            .spawn()
            .map_err(|e| DeckError::encode(format!("spawn ffmpeg: {e}")))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| DeckError::encode("ffmpeg stdin unavailable"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| DeckError::encode("ffmpeg stderr unavailable"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut buf = Vec::new();
            stderr.read_to_end(&mut buf)?;
            Ok(buf)
        });

        tracing::debug!(
            out = %self.opts.out_path.display(),
            width = cfg.width,
            height = cfg.height,
            "ffmpeg started"
        );
        self.scratch = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.frames = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> DeckResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| DeckError::encode("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(DeckError::encode(format!(
                "frame {} pushed after frame {}",
                idx.0, last.0
            )));
        }
        check_frame(cfg, frame)?;
        self.last_idx = Some(idx);

        flatten_premul_over_bg(&mut self.scratch, &frame.data, self.opts.bg_rgb)?;
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(DeckError::encode("ffmpeg sink already finished"));
        };
        use std::io::Write as _;
        stdin
            .write_all(&self.scratch)
            .map_err(|e| DeckError::encode(format!("write frame to ffmpeg: {e}")))?;
        self.frames = self.frames.saturating_add(1);
        Ok(())
    }

    fn end(&mut self) -> DeckResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| DeckError::encode("ffmpeg sink not started"))?;
        let status = child
            .wait()
            .map_err(|e| DeckError::encode(format!("wait for ffmpeg: {e}")))?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| DeckError::encode("ffmpeg stderr drain panicked"))?
                .map_err(|e| DeckError::encode(format!("read ffmpeg stderr: {e}")))?,
            None => Vec::new(),
        };
        self.cfg = None;
        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(DeckError::encode(format!(
                "ffmpeg exited with {status}: {}",
                stderr.trim()
            )));
        }
        tracing::debug!(frames = self.frames, "ffmpeg finished");
        Ok(())
    }
}

/// `true` when `ffmpeg -version` runs successfully.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
