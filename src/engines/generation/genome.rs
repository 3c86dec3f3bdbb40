use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::MutationConfig;
use crate::engines::evaluation::Evaluator;
use crate::engines::generation::mutation::{MutationStats, RoadMutator};
use crate::error::{Result, RoadgenError};
use crate::geometry::{catmull_rom, iterative_levenshtein, RoadBoundingBox, RoadPolygon};
use crate::types::{ControlPoint, SimulationResult};

static GENOME_COUNTER: AtomicUsize = AtomicUsize::new(0);
static PROCESS_START: OnceLock<Instant> = OnceLock::new();

fn elapsed_since_start() -> Duration {
    PROCESS_START.get_or_init(Instant::now).elapsed()
}

/// A road candidate evolved by the search driver.
///
/// `control_nodes` is the authoritative geometry; `sample_nodes` is always the
/// spline interpolation of `control_nodes` at the configured density and is
/// never edited directly. The bounding box and mutation configuration are
/// shared, read-only handles: clones re-link to the same instances.
///
/// Cloning goes through [`RoadGenome::clone_genome`], which resets the
/// evaluation cache; a copied genome always needs fresh evaluation.
#[derive(Debug)]
pub struct RoadGenome {
    pub name: String,
    pub control_nodes: Vec<ControlPoint>,
    pub sample_nodes: Vec<ControlPoint>,
    pub num_spline_nodes: usize,
    pub road_bbox: Arc<RoadBoundingBox>,
    pub config: Arc<MutationConfig>,

    /// Evaluation cache, filled in by the external evaluator.
    pub distance_to_boundary: Option<f64>,
    pub simulation: Option<SimulationResult>,

    // Diagnostics for the surrounding search driver.
    pub rank: f64,
    pub features: Vec<f64>,
    pub selected_counter: usize,
    pub placed_mutant: usize,
    pub timestamp: DateTime<Utc>,
    pub elapsed: Duration,
}

impl RoadGenome {
    pub fn new(
        control_nodes: Vec<ControlPoint>,
        sample_nodes: Vec<ControlPoint>,
        num_spline_nodes: usize,
        road_bbox: Arc<RoadBoundingBox>,
        config: Arc<MutationConfig>,
    ) -> Self {
        let id = GENOME_COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
        Self {
            name: format!("mbr{}", id),
            control_nodes,
            sample_nodes,
            num_spline_nodes,
            road_bbox,
            config,
            distance_to_boundary: None,
            simulation: None,
            rank: f64::INFINITY,
            features: Vec::new(),
            selected_counter: 0,
            placed_mutant: 0,
            timestamp: Utc::now(),
            elapsed: elapsed_since_start(),
        }
    }

    /// Construct from control nodes alone, deriving the samples.
    pub fn from_control_nodes(
        control_nodes: Vec<ControlPoint>,
        num_spline_nodes: usize,
        road_bbox: Arc<RoadBoundingBox>,
        config: Arc<MutationConfig>,
    ) -> Self {
        let sample_nodes = catmull_rom(&control_nodes, num_spline_nodes);
        Self::new(control_nodes, sample_nodes, num_spline_nodes, road_bbox, config)
    }

    /// True iff the sampled road outline is self-intersection-free and the
    /// control geometry (minus the two fixed endpoints) stays in the bbox.
    pub fn is_valid(&self) -> bool {
        if self.control_nodes.len() < 2 {
            return false;
        }
        let interior = &self.control_nodes[1..self.control_nodes.len() - 1];
        RoadPolygon::from_nodes(&self.sample_nodes).is_valid()
            && self.road_bbox.contains(&RoadPolygon::from_nodes(interior))
    }

    pub fn needs_evaluation(&self) -> bool {
        self.distance_to_boundary.is_none() || self.simulation.is_none()
    }

    /// Submit this genome as a one-element batch to the evaluator. No-op when
    /// the evaluation cache is already filled. May block for the duration of
    /// an external simulation.
    pub fn evaluate(&mut self, evaluator: &dyn Evaluator) -> Result<()> {
        if self.needs_evaluation() {
            evaluator.evaluate(std::slice::from_mut(self))?;
            log::debug!("evaluated {}", self.name);
        }
        Ok(())
    }

    /// Unsets the cached distance-to-boundary only. The simulation result is
    /// deliberately left in place so a boundary recomputation does not force
    /// a re-run of the simulator, even though `needs_evaluation` checks both.
    pub fn clear_evaluation(&mut self) {
        self.distance_to_boundary = None;
    }

    /// Dissimilarity to another road, over the sample polylines.
    pub fn distance(&self, other: &RoadGenome) -> f64 {
        iterative_levenshtein(&self.sample_nodes, &other.sample_nodes)
    }

    /// Perturb one interior control point under validity constraints.
    ///
    /// Returns true when a valid, state-changing mutation was applied; the
    /// distance-to-boundary cache is cleared in that case. On failure the
    /// genome is left exactly as it was.
    pub fn mutate<R: Rng>(&mut self, rng: &mut R, stats: &mut MutationStats) -> bool {
        let mutated = RoadMutator::new(self).mutate(rng, stats);
        if mutated {
            self.distance_to_boundary = None;
        }
        mutated
    }

    /// Copy of this road with a fresh identity and an empty evaluation cache.
    /// Node sequences are copied by value; bbox and config stay shared.
    pub fn clone_genome(&self) -> RoadGenome {
        RoadGenome::new(
            self.control_nodes.clone(),
            self.sample_nodes.clone(),
            self.num_spline_nodes,
            Arc::clone(&self.road_bbox),
            Arc::clone(&self.config),
        )
    }

    pub fn to_record(&self) -> RoadGenomeRecord {
        RoadGenomeRecord {
            name: self.name.clone(),
            control_nodes: self.control_nodes.clone(),
            sample_nodes: self.sample_nodes.clone(),
            num_spline_nodes: self.num_spline_nodes,
            road_bbox_size: self.road_bbox.bounds,
            distance_to_boundary: self.distance_to_boundary,
        }
    }

    /// Rebuild a genome from its persisted record. The bounding box is
    /// reconstructed from its extent, never aliased; the caller supplies the
    /// mutation configuration the way the original constructor does.
    pub fn from_record(record: RoadGenomeRecord, config: Arc<MutationConfig>) -> Result<RoadGenome> {
        if record.control_nodes.len() < 7 {
            return Err(RoadgenError::Construction(format!(
                "road needs at least 7 control nodes, got {}",
                record.control_nodes.len()
            )));
        }
        let road_bbox = Arc::new(RoadBoundingBox::new(record.road_bbox_size));
        let mut genome = RoadGenome::new(
            record.control_nodes,
            record.sample_nodes,
            record.num_spline_nodes,
            road_bbox,
            config,
        );
        genome.distance_to_boundary = record.distance_to_boundary;
        Ok(genome)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_record())?)
    }

    pub fn from_json(json: &str, config: Arc<MutationConfig>) -> Result<RoadGenome> {
        let record: RoadGenomeRecord = serde_json::from_str(json)?;
        Self::from_record(record, config)
    }
}

impl fmt::Display for RoadGenome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let boundary = match self.distance_to_boundary {
            Some(d) if d > 0.0 => format!("~+{}", d),
            Some(d) => format!("~{}", d),
            None => "na".to_string(),
        };
        write!(f, "{:<7} b={:<7}", self.name, boundary)
    }
}

/// Persisted layout of a road genome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadGenomeRecord {
    pub name: String,
    pub control_nodes: Vec<ControlPoint>,
    pub sample_nodes: Vec<ControlPoint>,
    pub num_spline_nodes: usize,
    pub road_bbox_size: (f64, f64, f64, f64),
    #[serde(default)]
    pub distance_to_boundary: Option<f64>,
}
