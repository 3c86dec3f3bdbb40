use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use roadgen::config::MutationConfig;
use roadgen::engines::generation::{MutationStats, RoadGenome, RoadMutator};
use roadgen::geometry::{catmull_rom, RoadBoundingBox};
use roadgen::types::{Axis, ControlPoint};

const NUM_SPLINE_NODES: usize = 10;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn straight_control_nodes(num_nodes: usize) -> Vec<ControlPoint> {
    (0..num_nodes)
        .map(|i| ControlPoint::new(20.0 + i as f64 * 20.0, 100.0, -28.0, 8.0))
        .collect()
}

fn make_genome(num_nodes: usize, config: MutationConfig) -> RoadGenome {
    let bbox = Arc::new(RoadBoundingBox::new((0.0, 0.0, 500.0, 200.0)));
    RoadGenome::from_control_nodes(
        straight_control_nodes(num_nodes),
        NUM_SPLINE_NODES,
        bbox,
        Arc::new(config),
    )
}

#[test]
fn test_successful_mutation_updates_genome() {
    init_logging();
    let mut genome = make_genome(10, MutationConfig::default());
    genome.distance_to_boundary = Some(3.0);
    let before = genome.control_nodes.clone();

    let mut rng = StdRng::seed_from_u64(42);
    let mut stats = MutationStats::default();
    let mutated = genome.mutate(&mut rng, &mut stats);

    assert!(mutated);
    assert!(genome.is_valid());
    assert_ne!(genome.control_nodes, before);
    // Success forces re-evaluation of the boundary distance.
    assert!(genome.distance_to_boundary.is_none());
}

#[test]
fn test_anchor_points_are_stable() {
    let mut genome = make_genome(12, MutationConfig::default());
    let before = genome.control_nodes.clone();
    let len = before.len();

    let mut rng = StdRng::seed_from_u64(7);
    let mut stats = MutationStats::default();
    for _ in 0..20 {
        genome.mutate(&mut rng, &mut stats);
        assert_eq!(&genome.control_nodes[..3], &before[..3]);
        assert_eq!(&genome.control_nodes[len - 3..], &before[len - 3..]);
    }
}

#[test]
fn test_sample_nodes_stay_derived_from_control_nodes() {
    let mut genome = make_genome(10, MutationConfig::default());
    let mut rng = StdRng::seed_from_u64(11);
    let mut stats = MutationStats::default();

    for _ in 0..10 {
        genome.mutate(&mut rng, &mut stats);
        let expected = catmull_rom(&genome.control_nodes, genome.num_spline_nodes);
        assert_eq!(genome.sample_nodes, expected);
    }
}

/// A road too short to expose any interior gene: the first index draw is
/// already exhaustion and the genome must come back untouched.
#[test]
fn test_too_short_road_fails_immediately() {
    let mut genome = make_genome(7, MutationConfig::default());
    let before_control = genome.control_nodes.clone();
    let before_samples = genome.sample_nodes.clone();

    let mut rng = StdRng::seed_from_u64(3);
    let mut stats = MutationStats::default();
    let mutated = genome.mutate(&mut rng, &mut stats);

    assert!(!mutated);
    assert_eq!(genome.control_nodes, before_control);
    assert_eq!(genome.sample_nodes, before_samples);
    // No gene was ever perturbed.
    assert_eq!(stats.invalid, 0);
}

/// An 8-node road is the smallest mutable one: its eligible interior range
/// collapses to the single gene at index 3, and mutation can still succeed.
#[test]
fn test_eight_node_road_mutates_single_eligible_gene() {
    let mut genome = make_genome(8, MutationConfig::default());
    let before = genome.control_nodes.clone();

    let mut rng = StdRng::seed_from_u64(19);
    let mut stats = MutationStats::default();
    let mutated = genome.mutate(&mut rng, &mut stats);

    assert!(mutated);
    assert_ne!(genome.control_nodes[3], before[3]);
    for (i, node) in genome.control_nodes.iter().enumerate() {
        if i != 3 {
            assert_eq!(*node, before[i]);
        }
    }
}

/// With only one eligible gene and a bounding box it can never satisfy, the
/// 8-node road exhausts after exactly that gene's undo budget.
#[test]
fn test_eight_node_road_exhausts_after_single_gene_budget() {
    let config = MutationConfig { num_undo_attempts: 4, ..Default::default() };
    let bbox = Arc::new(RoadBoundingBox::new((0.0, 0.0, 1.0, 1.0)));
    let mut genome = RoadGenome::from_control_nodes(
        straight_control_nodes(8),
        NUM_SPLINE_NODES,
        bbox,
        Arc::new(config),
    );
    let before = genome.control_nodes.clone();

    let mut rng = StdRng::seed_from_u64(23);
    let mut stats = MutationStats::default();
    let mutated = genome.mutate(&mut rng, &mut stats);

    assert!(!mutated);
    assert_eq!(genome.control_nodes, before);
    assert_eq!(stats.invalid, 4);
}

/// A margin below 5 must not push the exhaustion threshold past the number
/// of eligible genes: the search still terminates after every gene's budget
/// instead of spinning on index collisions.
#[test]
fn test_small_margin_still_exhausts_after_all_genes() {
    let config = MutationConfig {
        num_undo_attempts: 2,
        exhaustion_margin: 0,
        ..Default::default()
    };
    let bbox = Arc::new(RoadBoundingBox::new((0.0, 0.0, 1.0, 1.0)));
    let mut genome = RoadGenome::from_control_nodes(
        straight_control_nodes(10),
        NUM_SPLINE_NODES,
        bbox,
        Arc::new(config),
    );
    let before = genome.control_nodes.clone();

    let mut rng = StdRng::seed_from_u64(29);
    let mut stats = MutationStats::default();
    let mutated = genome.mutate(&mut rng, &mut stats);

    assert!(!mutated);
    assert_eq!(genome.control_nodes, before);
    // Three eligible genes, two attempts each.
    assert_eq!(stats.invalid, 3 * 2);
}

/// With a bounding box the road can never satisfy, every gene burns its full
/// undo budget and the snapshot is restored. The failed-attempt count is
/// exactly genes * budget: three eligible interior genes for a 10-node road.
#[test]
fn test_exhaustion_restores_snapshot_and_counts_attempts() {
    let config = MutationConfig { num_undo_attempts: 3, ..Default::default() };
    let control_nodes = straight_control_nodes(10);
    let bbox = Arc::new(RoadBoundingBox::new((0.0, 0.0, 1.0, 1.0)));
    let mut genome = RoadGenome::from_control_nodes(
        control_nodes,
        NUM_SPLINE_NODES,
        bbox,
        Arc::new(config),
    );
    let before_control = genome.control_nodes.clone();
    let before_samples = genome.sample_nodes.clone();
    genome.distance_to_boundary = Some(1.0);

    let mut rng = StdRng::seed_from_u64(5);
    let mut stats = MutationStats::default();
    let mutated = genome.mutate(&mut rng, &mut stats);

    assert!(!mutated);
    assert_eq!(genome.control_nodes, before_control);
    assert_eq!(genome.sample_nodes, before_samples);
    assert_eq!(stats.invalid, 3 * 3);
    // Failure leaves the evaluation cache alone.
    assert_eq!(genome.distance_to_boundary, Some(1.0));
}

#[test]
fn test_undo_restores_exact_state() {
    let mut genome = make_genome(10, MutationConfig::default());
    let before_control = genome.control_nodes.clone();
    let before_samples = genome.sample_nodes.clone();

    let mut rng = StdRng::seed_from_u64(9);
    let mut mutator = RoadMutator::with_bounds(&mut genome, -2, 2);
    let (axis, magnitude) = mutator.mutate_gene(5, &mut rng);
    assert_ne!(magnitude, 0);

    mutator.undo_mutation(5, axis, magnitude);
    assert_eq!(genome.control_nodes, before_control);
    assert_eq!(genome.sample_nodes, before_samples);
}

/// Magnitude bounds of [0, 0] can only draw 0, which is forbidden and bumped
/// to 1. With the bias pinned to y, the perturbation is exactly y += 1.
#[test]
fn test_zero_magnitude_is_bumped_to_one_on_y() {
    let config = MutationConfig { xy_bias: 1.0, ..Default::default() };
    let mut genome = make_genome(10, config);
    let before_y = genome.control_nodes[5].y;

    let mut rng = StdRng::seed_from_u64(13);
    let mut mutator = RoadMutator::with_bounds(&mut genome, 0, 0);
    let (axis, magnitude) = mutator.mutate_gene(5, &mut rng);

    assert_eq!(axis, Axis::Y);
    assert_eq!(magnitude, 1);
    assert_eq!(genome.control_nodes[5].y, before_y + 1.0);
    assert_eq!(genome.sample_nodes, catmull_rom(&genome.control_nodes, NUM_SPLINE_NODES));
}

#[test]
fn test_magnitude_is_never_zero() {
    let mut genome = make_genome(10, MutationConfig::default());
    let mut rng = StdRng::seed_from_u64(17);

    for _ in 0..200 {
        let mut mutator = RoadMutator::with_bounds(&mut genome, -1, 1);
        let (axis, magnitude) = mutator.mutate_gene(4, &mut rng);
        assert_ne!(magnitude, 0);
        mutator.undo_mutation(4, axis, magnitude);
    }
}

#[test]
fn test_xy_bias_pins_axis() {
    let mut rng = StdRng::seed_from_u64(21);

    let config = MutationConfig { xy_bias: 0.0, ..Default::default() };
    let mut genome = make_genome(10, config);
    for _ in 0..50 {
        let mut mutator = RoadMutator::new(&mut genome);
        let (axis, magnitude) = mutator.mutate_gene(4, &mut rng);
        assert_eq!(axis, Axis::X);
        mutator.undo_mutation(4, axis, magnitude);
    }

    let config = MutationConfig { xy_bias: 1.0, ..Default::default() };
    let mut genome = make_genome(10, config);
    for _ in 0..50 {
        let mut mutator = RoadMutator::new(&mut genome);
        let (axis, magnitude) = mutator.mutate_gene(4, &mut rng);
        assert_eq!(axis, Axis::Y);
        mutator.undo_mutation(4, axis, magnitude);
    }
}

/// Repeated mutation keeps producing valid roads and never drifts the samples
/// out of sync with the control nodes.
#[test]
fn test_repeated_mutation_preserves_validity() {
    let mut genome = make_genome(14, MutationConfig::default());
    let mut rng = StdRng::seed_from_u64(31);
    let mut stats = MutationStats::default();

    let mut successes = 0;
    for _ in 0..30 {
        if genome.mutate(&mut rng, &mut stats) {
            successes += 1;
            assert!(genome.is_valid());
        }
    }
    assert!(successes > 0);
}

/// The shared bounding box is read-only from the genome's side: mutating a
/// clone never disturbs the original's region handle.
#[test]
fn test_shared_bbox_is_never_mutated() {
    let mut genome = make_genome(10, MutationConfig::default());
    let bounds_before = genome.road_bbox.bounds;
    let mut clone = genome.clone_genome();

    let mut rng = StdRng::seed_from_u64(37);
    let mut stats = MutationStats::default();
    genome.mutate(&mut rng, &mut stats);
    clone.mutate(&mut rng, &mut stats);

    assert_eq!(genome.road_bbox.bounds, bounds_before);
    assert!(Arc::ptr_eq(&genome.road_bbox, &clone.road_bbox));
}
