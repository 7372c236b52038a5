use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use vibedeck::{
    ClipOpts, DeckConfig, FfmpegSink, FfmpegSinkOpts, FrameSink, PngSequenceSink, Presentation,
};

#[derive(Parser, Debug)]
#[command(name = "vibedeck", version, about = "Render generative presentation decks")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the beat table as JSON.
    Beats(BeatsArgs),
    /// Render a single frame of one beat as a PNG.
    Frame(FrameArgs),
    /// Autoplay the whole deck into an MP4 (requires `ffmpeg`) or a PNG sequence.
    Render(RenderArgs),
    /// Render every beat as its own PNG sequence.
    Clips(ClipsArgs),
}

#[derive(Parser, Debug)]
struct BeatsArgs {
    /// Deck configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Beat index (0-based).
    #[arg(long)]
    beat: usize,

    /// Frame within the beat (0-based).
    #[arg(long, default_value_t = 0)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Output MP4 path, or output directory with `--png-dir`.
    #[arg(long)]
    out: PathBuf,

    /// Write a PNG sequence into `--out` instead of an MP4.
    #[arg(long, default_value_t = false)]
    png_dir: bool,

    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the autoplay dwell per beat.
    #[arg(long)]
    frames_per_beat: Option<u64>,
}

#[derive(Parser, Debug)]
struct ClipsArgs {
    /// Directory receiving one `beatNN_*.png` sequence per beat.
    #[arg(long)]
    out_dir: PathBuf,

    /// Render beats concurrently.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Frames per clip.
    #[arg(long, default_value_t = 120)]
    frames: u64,

    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Beats(args) => cmd_beats(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Clips(args) => cmd_clips(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<DeckConfig> {
    let cfg = match path {
        Some(p) => DeckConfig::from_path(p)
            .with_context(|| format!("load deck config '{}'", p.display()))?,
        None => DeckConfig::default(),
    };
    Ok(cfg)
}

fn cmd_beats(args: BeatsArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    cfg.validate()?;
    let json = serde_json::to_string_pretty(&cfg.beats()).context("serialize beats")?;
    println!("{json}");
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(args.config.as_deref())?;
    if let Some(w) = args.width {
        cfg.viewport.width = w;
    }
    if let Some(h) = args.height {
        cfg.viewport.height = h;
    }
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }

    let frame = vibedeck::render_beat_frame(&cfg, args.beat, args.frame)?;
    vibedeck::ensure_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let frames_per_beat = args.frames_per_beat.unwrap_or(cfg.frames_per_beat);
    let mut session = Presentation::new(&cfg)?;

    let mut sink: Box<dyn FrameSink> = if args.png_dir {
        Box::new(PngSequenceSink::new(&args.out))
    } else {
        Box::new(FfmpegSink::new(FfmpegSinkOpts::new(&args.out)))
    };
    let stats = session.play_autoplay(frames_per_beat, sink.as_mut())?;

    eprintln!(
        "wrote {} ({} beats, {} frames)",
        args.out.display(),
        stats.beats,
        stats.frames
    );
    Ok(())
}

fn cmd_clips(args: ClipsArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let opts = ClipOpts {
        frames: args.frames,
        parallel: args.parallel,
        threads: args.threads,
    };
    let out_dir = args.out_dir.clone();
    let stats = vibedeck::render_beat_clips(&cfg, opts, |index, _beat| {
        Ok(PngSequenceSink::new(&out_dir).with_prefix(format!("beat{index:02}_")))
    })?;

    eprintln!(
        "wrote {} clips ({} frames) to {}",
        stats.beats,
        stats.frames,
        args.out_dir.display()
    );
    Ok(())
}
