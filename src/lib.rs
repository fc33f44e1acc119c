//! derivative-reel renders a short educational video that explains derivatives.
//!
//! The presentation is five fixed slides (title, slope definition, car speed, limit definition
//! and a secant line converging to the tangent on a sampled curve). The crate plays them through
//! its own small animation engine:
//!
//! - [`Presentation`] builds the slides and drives them as an instruction stream
//! - [`Evaluator`] turns a frame index into object states and reactive geometry
//! - [`compile_frame`] lays the frame out into pixel-space draw ops
//! - [`Renderer`] rasterizes on the CPU and pushes frames into a [`FrameSink`]
#![forbid(unsafe_code)]

pub mod animation;
pub mod assets;
pub mod calculus;
pub mod compile;
pub mod config;
pub mod encode;
pub mod eval;
pub mod foundation;
pub mod layout;
pub mod render;
pub mod scene;
pub mod script;
pub mod timeline;

pub use crate::assets::{FontChoice, PreparedAssetStore};
pub use crate::calculus::curve::{Secant, central_difference, curve};
pub use crate::compile::{DrawOp, RenderPlan, Viewport, compile_frame};
pub use crate::config::RenderConfig;
pub use crate::encode::{FfmpegSink, FfmpegSinkOpts, FrameSink, InMemorySink, PngSequenceSink};
pub use crate::eval::{EvaluatedFrame, Evaluator};
pub use crate::foundation::core::{Canvas, Color, Fps, FrameIndex, FrameRange};
pub use crate::foundation::error::{ReelError, ReelResult};
pub use crate::render::{
    BackendKind, FrameRGBA, RenderBackend, RenderStats, Renderer, create_backend, render_to_mp4,
};
pub use crate::scene::dsl::SegmentKind;
pub use crate::script::Presentation;
pub use crate::timeline::{
    Timeline,
    instructions::{Instruction, InstructionSink, RecordingSink},
};
