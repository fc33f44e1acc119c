pub mod backend;
pub mod cpu;
pub mod pipeline;

pub use backend::{BackendKind, FrameRGBA, RenderBackend, create_backend};
pub use pipeline::{RenderStats, Renderer, render_to_mp4};
