pub mod config;
pub mod engines;
pub mod error;
pub mod geometry;
pub mod types;

pub use engines::evaluation::Evaluator;
pub use engines::generation::{MutationStats, RoadGenome, RoadGenomeRecord, RoadMutator};
pub use error::{Result, RoadgenError};
