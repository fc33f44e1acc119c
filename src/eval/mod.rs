pub mod evaluator;

pub use evaluator::{EvaluatedFrame, EvaluatedObject, Evaluator, ObjectState};
