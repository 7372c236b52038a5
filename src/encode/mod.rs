//! Frame sinks.
//!
//! A sink receives composited frames in order between `begin` and `end`. [`sink::InMemorySink`]
//! keeps them for tests, [`sink::PngSequenceSink`] writes numbered PNGs and
//! [`ffmpeg::FfmpegSink`] streams into a system `ffmpeg` for MP4 output.

pub mod ffmpeg;
pub mod sink;
