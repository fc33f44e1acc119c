pub mod plan;

pub use plan::{DrawOp, RenderPlan, SceneMeasure, Viewport, compile_frame};
