use crate::engines::generation::RoadGenome;
use crate::error::Result;

/// External simulator harness. Implementations run each genome in the batch
/// through the physics simulator and assign both the simulation result and
/// the distance-to-boundary onto it. Harness failures are reported as
/// [`RoadgenError::Evaluation`](crate::error::RoadgenError::Evaluation) and
/// leave the affected genomes needing evaluation. Calls may block for the
/// duration of a simulation; this core takes no locks and leaves parallelism
/// to the caller.
pub trait Evaluator {
    fn evaluate(&self, batch: &mut [RoadGenome]) -> Result<()>;
}
