//! Accuracy regression tests for prism-medoids.
//!
//! These tests verify that changes to seeding, assignment or arbitration do
//! not degrade palette quality or break the event contract on small,
//! well-separated color sets.

use std::sync::mpsc;

use prism_color::Sample;
use prism_medoids::{PaletteConfig, PaletteEvent};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const GROUP_BASES: [u32; 3] = [0xFF00_0000, 0xFF80_8080, 0xFFFF_FF00];

/// Ninety samples in 3 tight groups of 30, each spanning 30 adjacent values.
fn three_groups() -> Vec<Sample> {
    GROUP_BASES
        .iter()
        .flat_map(|&base| (0..30u32).map(move |j| Sample::new(base + j)))
        .collect()
}

fn group_of(sample: Sample) -> usize {
    GROUP_BASES
        .iter()
        .position(|&base| (base..base + 30).contains(&sample.value()))
        .expect("sample outside every group")
}

/// Run a palette call to completion and collect every delivered event.
fn collect_events(cfg: &PaletteConfig, samples: Vec<Sample>) -> Vec<PaletteEvent> {
    let (tx, rx) = mpsc::channel();
    let tx = std::sync::Mutex::new(tx);
    let job = cfg
        .start(samples, move |event: PaletteEvent| {
            let _ = tx.lock().unwrap().send(event);
        })
        .unwrap();
    let _ = job.wait();
    rx.try_iter().collect()
}

// ---------------------------------------------------------------------------
// a) three_groups_yield_one_color_per_group
// ---------------------------------------------------------------------------

/// K=3 on three separated groups must pick one medoid from each group and
/// count 30 members per slot.
#[test]
fn three_groups_yield_one_color_per_group() {
    let cfg = PaletteConfig::new(3).unwrap().with_seed(42);
    let report = cfg.fit(three_groups()).unwrap();

    let mut groups: Vec<usize> = report.palette.samples.iter().map(|&s| group_of(s)).collect();
    groups.sort_unstable();
    assert_eq!(groups, vec![0, 1, 2], "palette does not cover every group");

    let mut sizes = report.palette.cluster_sizes.clone();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![30, 30, 30]);
}

// ---------------------------------------------------------------------------
// b) cost_below_group_spread_bound
// ---------------------------------------------------------------------------

/// The worst medoid choice inside a 30-wide group costs 0+1+...+29 = 435,
/// so any correct three-group split costs at most 3 * 435.
#[test]
fn cost_below_group_spread_bound() {
    let cfg = PaletteConfig::new(3).unwrap().with_seed(7);
    let report = cfg.fit(three_groups()).unwrap();

    let cost = report.palette.cost.expect("at least one run succeeded").value();
    assert!(cost <= 3 * 435, "cost {cost} exceeds the group spread bound");
}

// ---------------------------------------------------------------------------
// c) bimodal_input_has_zero_cost
// ---------------------------------------------------------------------------

#[test]
fn bimodal_input_has_zero_cost() {
    let mut samples = vec![Sample::new(0xFF00_0000); 50];
    samples.extend(std::iter::repeat_n(Sample::new(0xFFFF_FFFF), 50));
    let cfg = PaletteConfig::new(2).unwrap().with_seed(3);

    let report = cfg.fit(samples).unwrap();

    assert_eq!(report.palette.cost.map(|c| c.value()), Some(0));
    let mut hexes: Vec<String> = report.palette.colors.iter().map(|c| c.hex()).collect();
    hexes.sort();
    assert_eq!(hexes, vec!["#000000", "#FFFFFF"]);
}

// ---------------------------------------------------------------------------
// d) events_improve_then_finish_once
// ---------------------------------------------------------------------------

/// Improvements arrive with strictly decreasing cost, exactly one final
/// event is delivered, it is last, and it carries the last improvement.
#[test]
fn events_improve_then_finish_once() {
    let samples: Vec<Sample> = (0..500u32).map(|v| Sample::new(0xFF00_0000 | (v * v * 31))).collect();
    let cfg = PaletteConfig::new(6).unwrap().with_restarts(16).with_seed(11);

    let events = collect_events(&cfg, samples);

    let finals = events.iter().filter(|e| e.is_final()).count();
    assert_eq!(finals, 1, "expected exactly one final event");
    let last = events.last().expect("events delivered");
    assert!(last.is_final(), "final event must be last");

    let improved: Vec<u64> = events
        .iter()
        .filter_map(|e| match e {
            PaletteEvent::Improved(p) => p.cost.map(|c| c.value()),
            _ => None,
        })
        .collect();
    assert!(!improved.is_empty());
    for pair in improved.windows(2) {
        assert!(pair[1] < pair[0], "improvement {} not below {}", pair[1], pair[0]);
    }
    let final_cost = last.palette().and_then(|p| p.cost).map(|c| c.value());
    assert_eq!(final_cost, improved.last().copied());
}

// ---------------------------------------------------------------------------
// e) too_few_samples_fails_every_run
// ---------------------------------------------------------------------------

/// K above the sample count fails each run individually and still finishes
/// with a single unset final palette.
#[test]
fn too_few_samples_fails_every_run() {
    let samples = vec![Sample::new(1), Sample::new(2), Sample::new(3)];
    let cfg = PaletteConfig::new(5).unwrap().with_restarts(4).with_seed(1);

    let events = collect_events(&cfg, samples.clone());

    let errors = events
        .iter()
        .filter(|e| matches!(e, PaletteEvent::Error(_)))
        .count();
    assert_eq!(errors, 4);
    assert_eq!(events.len(), 5);
    match events.last() {
        Some(PaletteEvent::Final(p)) => assert!(p.is_unset()),
        other => panic!("expected unset final palette, got {other:?}"),
    }

    let report = cfg.fit(samples).unwrap();
    assert_eq!(report.failed, 4);
    assert_eq!(report.succeeded(), 0);
}

// ---------------------------------------------------------------------------
// f) deterministic_across_calls
// ---------------------------------------------------------------------------

/// The same seed gives the same best cost, and input order is irrelevant
/// because samples are sorted before any run starts.
#[test]
fn deterministic_across_calls() {
    let sorted = three_groups();
    let mut shuffled = sorted.clone();
    shuffled.reverse();
    shuffled.swap(3, 61);
    let cfg = PaletteConfig::new(4).unwrap().with_seed(42);

    let a = cfg.fit(sorted).unwrap();
    let b = cfg.fit(shuffled).unwrap();

    assert_eq!(a.palette.cost, b.palette.cost);
    assert_eq!(a.failed, 0);
}

// ---------------------------------------------------------------------------
// g) single_sample_single_color
// ---------------------------------------------------------------------------

#[test]
fn single_sample_single_color() {
    let cfg = PaletteConfig::new(1).unwrap().with_restarts(3);

    let report = cfg.fit(vec![Sample::new(0xFF12_3456)]).unwrap();

    assert_eq!(report.palette.len(), 1);
    assert_eq!(report.palette.colors[0].hex(), "#123456");
    assert_eq!(report.palette.cost.map(|c| c.value()), Some(0));
    assert_eq!(report.palette.cluster_sizes, vec![1]);
}
