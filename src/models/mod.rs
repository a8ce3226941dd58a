//! Core data models for roster tracking.

mod match_record;
mod player;
mod stats;

pub use match_record::*;
pub use player::*;
pub use stats::*;

#[cfg(test)]
pub(crate) mod fixtures;
