use super::traits::ConfigSection;
use crate::error::RoadgenError;
use serde::{Deserialize, Serialize};

/// Parameters of the road mutation operator.
///
/// `exhaustion_margin` and `xy_bias` are named here rather than hardcoded:
/// both shape the backtracking search but are not derived from any geometric
/// invariant, so they stay externally tunable with the observed defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationConfig {
    /// Perturbation magnitudes are drawn from [-mutation_extent, mutation_extent].
    pub mutation_extent: i64,
    /// Per-gene budget of undo-and-retry attempts before moving to another gene.
    pub num_undo_attempts: usize,
    /// Probability that a perturbation targets the y coordinate instead of x.
    pub xy_bias: f64,
    /// The index space counts as exhausted once `n - exhaustion_margin` interior
    /// genes have been attempted, with `n = control_nodes.len() - 2`. The
    /// operator caps this at the number of eligible interior genes.
    pub exhaustion_margin: usize,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            mutation_extent: 2,
            num_undo_attempts: 20,
            xy_bias: 0.5,
            exhaustion_margin: 5,
        }
    }
}

impl ConfigSection for MutationConfig {
    fn section_name() -> &'static str {
        "mutation"
    }

    fn validate(&self) -> Result<(), RoadgenError> {
        if self.mutation_extent < 1 {
            return Err(RoadgenError::Configuration(
                "Mutation extent must be at least 1".to_string(),
            ));
        }
        if self.xy_bias < 0.0 || self.xy_bias > 1.0 {
            return Err(RoadgenError::Configuration(
                "xy bias must be between 0 and 1".to_string(),
            ));
        }
        if self.num_undo_attempts == 0 {
            return Err(RoadgenError::Configuration(
                "Number of undo attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
