//! Frame sinks: rendered frames are pushed here in timeline order.

/// MP4 output through the system `ffmpeg`.
pub mod ffmpeg;
/// The sink trait, an in-memory sink and a PNG sequence sink.
pub mod sink;

pub use ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use sink::{FrameSink, InMemorySink, PngSequenceSink, SinkConfig};
