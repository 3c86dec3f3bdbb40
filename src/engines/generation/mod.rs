pub mod genome;
pub mod mutation;

pub use genome::{RoadGenome, RoadGenomeRecord};
pub use mutation::{MutationStats, MutatorState, RoadMutator};
