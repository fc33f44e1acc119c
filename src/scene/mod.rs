pub mod axes;
pub mod dsl;
pub mod model;
pub mod secant;
