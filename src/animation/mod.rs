pub mod ease;
pub mod reactive;
pub mod tracker;
