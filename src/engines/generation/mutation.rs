use std::collections::HashSet;

use rand::Rng;

use crate::engines::generation::genome::RoadGenome;
use crate::geometry::catmull_rom;
use crate::types::Axis;

/// Collision ceiling for repeated random index draws. Purely defensive; the
/// exhaustion threshold fires long before this in normal operation.
const INDEX_DRAW_CEILING: usize = 1_000_000;

/// Diagnostic telemetry for the mutation operator. Injected by the caller so
/// invalid-attempt counts stay deterministic under test instead of living in
/// ambient global state.
#[derive(Debug, Default, Clone)]
pub struct MutationStats {
    pub invalid: u64,
}

/// Phases of the backtracking search over the interior gene indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutatorState {
    SelectingGene,
    PerturbingGene { index: usize },
    Exhausted,
}

/// Perturbs one interior control point of a road while preserving validity,
/// backtracking over the gene index space with a bounded undo budget per gene.
///
/// The first and last three control points anchor the curve's boundary
/// tangents and are never touched.
pub struct RoadMutator<'a> {
    road: &'a mut RoadGenome,
    lower_bound: i64,
    upper_bound: i64,
    xy_bias: f64,
    num_undo_attempts: usize,
    exhaustion_margin: usize,
}

impl<'a> RoadMutator<'a> {
    /// Operator over the road's own shared configuration.
    pub fn new(road: &'a mut RoadGenome) -> Self {
        let extent = road.config.mutation_extent;
        let xy_bias = road.config.xy_bias;
        let num_undo_attempts = road.config.num_undo_attempts;
        let exhaustion_margin = road.config.exhaustion_margin;
        Self {
            road,
            lower_bound: -extent,
            upper_bound: extent,
            xy_bias,
            num_undo_attempts,
            exhaustion_margin,
        }
    }

    /// Operator with explicit magnitude bounds, overriding the configured
    /// extent. Bounds may include negative values; a drawn magnitude of
    /// exactly 0 is always bumped to 1.
    pub fn with_bounds(road: &'a mut RoadGenome, lower_bound: i64, upper_bound: i64) -> Self {
        let xy_bias = road.config.xy_bias;
        let num_undo_attempts = road.config.num_undo_attempts;
        let exhaustion_margin = road.config.exhaustion_margin;
        Self {
            road,
            lower_bound,
            upper_bound,
            xy_bias,
            num_undo_attempts,
            exhaustion_margin,
        }
    }

    /// Apply one random perturbation to the gene at `index` and re-derive the
    /// sample polyline. Returns the axis and magnitude so the exact step can
    /// be undone.
    pub fn mutate_gene<R: Rng>(&mut self, index: usize, rng: &mut R) -> (Axis, i64) {
        let mut magnitude = rng.gen_range(self.lower_bound..=self.upper_bound);
        // A mutation must change the genome.
        if magnitude == 0 {
            magnitude += 1;
        }
        let axis = if rng.gen::<f64>() < self.xy_bias { Axis::Y } else { Axis::X };
        self.apply(index, axis, magnitude as f64);
        (axis, magnitude)
    }

    /// Reverse exactly one prior `mutate_gene` step and re-derive the samples.
    pub fn undo_mutation(&mut self, index: usize, axis: Axis, magnitude: i64) {
        self.apply(index, axis, -(magnitude as f64));
    }

    fn apply(&mut self, index: usize, axis: Axis, delta: f64) {
        let gene = &mut self.road.control_nodes[index];
        match axis {
            Axis::X => gene.x += delta,
            Axis::Y => gene.y += delta,
        }
        self.road.sample_nodes = catmull_rom(&self.road.control_nodes, self.road.num_spline_nodes);
    }

    /// Draw a not-yet-attempted interior gene index, or None once the index
    /// space is exhausted. Interior means `[3, n - 3]` with
    /// `n = control_nodes.len() - 2`, keeping three anchor points per end.
    /// The exhaustion threshold is capped at the eligible-range size so a
    /// small margin cannot leave the search spinning on index collisions.
    fn next_gene_index<R: Rng>(&self, attempted: &mut HashSet<usize>, rng: &mut R) -> Option<usize> {
        let n = self.road.control_nodes.len().saturating_sub(2);
        if n < 6 {
            return None;
        }
        let eligible = n - 5;
        if attempted.len() >= n.saturating_sub(self.exhaustion_margin).min(eligible) {
            return None;
        }

        let mut index = rng.gen_range(3..=n - 3);
        let mut draws = 0usize;
        while attempted.contains(&index) {
            draws += 1;
            if draws > INDEX_DRAW_CEILING {
                log::warn!(
                    "gene index draws exceeded ceiling with {} attempted genes",
                    attempted.len()
                );
                return None;
            }
            index = rng.gen_range(3..=n - 3);
        }
        attempted.insert(index);
        debug_assert!((3..=n - 3).contains(&index));
        Some(index)
    }

    /// Run the constrained search. Returns true iff the road ends up valid
    /// and actually different from its pre-call state; otherwise the snapshot
    /// is restored and the road is left byte-for-byte unchanged.
    pub fn mutate<R: Rng>(&mut self, rng: &mut R, stats: &mut MutationStats) -> bool {
        let backup_control = self.road.control_nodes.clone();
        let backup_samples = self.road.sample_nodes.clone();
        let mut attempted: HashSet<usize> = HashSet::new();
        let mut state = MutatorState::SelectingGene;

        loop {
            state = match state {
                MutatorState::SelectingGene => match self.next_gene_index(&mut attempted, rng) {
                    Some(index) => MutatorState::PerturbingGene { index },
                    None => MutatorState::Exhausted,
                },
                MutatorState::PerturbingGene { index } => {
                    if self.perturb_within_budget(index, rng, stats) {
                        break;
                    }
                    MutatorState::SelectingGene
                }
                MutatorState::Exhausted => {
                    log::info!("no gene can be mutated for {}", self.road.name);
                    self.road.control_nodes = backup_control.clone();
                    self.road.sample_nodes = backup_samples.clone();
                    break;
                }
            };
        }

        if self.road.is_valid() && self.road.control_nodes != backup_control {
            true
        } else {
            self.road.control_nodes = backup_control;
            self.road.sample_nodes = backup_samples;
            false
        }
    }

    /// Retry random perturbations on one gene, undoing each invalid attempt,
    /// until the road is valid or the undo budget runs out. Every failed
    /// attempt is counted in the injected stats.
    fn perturb_within_budget<R: Rng>(
        &mut self,
        index: usize,
        rng: &mut R,
        stats: &mut MutationStats,
    ) -> bool {
        let (mut axis, mut magnitude) = self.mutate_gene(index, rng);
        let mut attempt = 0;
        let mut valid = self.road.is_valid();
        while !valid && attempt < self.num_undo_attempts {
            stats.invalid += 1;
            self.undo_mutation(index, axis, magnitude);
            let retried = self.mutate_gene(index, rng);
            axis = retried.0;
            magnitude = retried.1;
            attempt += 1;
            valid = self.road.is_valid();
        }
        valid
    }
}
