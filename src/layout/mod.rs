//! Placement resolution: turn `to_edge` / `to_corner` / `next_to` into scene translations.

pub mod solver;

pub use solver::{Measure, Placed, SceneFrame, natural_bounds, resolve_placements};
