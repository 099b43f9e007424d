// Copyright 2025 Lars Brubaker
// Fill rule correctness with area verification.

mod helpers;

use helpers::{assert_area, net_area, rect, rect_cw, run, run_with};
use vatti_rust::{reverse_paths, ClipType, FillRule, Paths};

/// Outer 10x10 and inner 6x6, both counter-clockwise: winding 1 in the
/// band, 2 in the middle.
fn same_direction_nest() -> Paths {
    vec![rect(0, 0, 10, 10), rect(2, 2, 8, 8)]
}

/// Inner ring reversed: winding 1 in the band, 0 in the middle.
fn opposed_nest() -> Paths {
    vec![rect(0, 0, 10, 10), rect_cw(2, 2, 8, 8)]
}

fn union_area(paths: &Paths, fill: FillRule) -> f64 {
    net_area(&run(ClipType::Union, paths, &[], fill))
}

#[test]
fn even_odd_punches_the_inner_ring() {
    assert_eq!(union_area(&same_direction_nest(), FillRule::EvenOdd), 64.0);
    assert_eq!(union_area(&opposed_nest(), FillRule::EvenOdd), 64.0);
}

#[test]
fn non_zero_depends_on_direction() {
    assert_eq!(union_area(&same_direction_nest(), FillRule::NonZero), 100.0);
    assert_eq!(union_area(&opposed_nest(), FillRule::NonZero), 64.0);
}

#[test]
fn positive_and_negative_pick_one_orientation() {
    let nest = same_direction_nest();
    let pos = union_area(&nest, FillRule::Positive);
    let neg = union_area(&nest, FillRule::Negative);
    let mut pair = [pos, neg];
    pair.sort_by(|a, b| a.total_cmp(b));
    assert_eq!(pair, [0.0, 100.0]);

    // Reversing every input swaps the two rules.
    let mut flipped = nest.clone();
    reverse_paths(&mut flipped);
    assert_eq!(union_area(&flipped, FillRule::Positive), neg);
    assert_eq!(union_area(&flipped, FillRule::Negative), pos);
}

#[test]
fn positive_on_opposed_nest_keeps_only_the_band_or_nothing() {
    let nest = opposed_nest();
    let pos = union_area(&nest, FillRule::Positive);
    let neg = union_area(&nest, FillRule::Negative);
    // The band has winding +1 or -1 depending on the outer ring; the middle is 0.
    let mut pair = [pos, neg];
    pair.sort_by(|a, b| a.total_cmp(b));
    assert_eq!(pair, [0.0, 64.0]);
}

#[test]
fn subject_and_clip_rules_apply_independently() {
    let subject = same_direction_nest();
    let clip = vec![rect(0, 0, 10, 10)];
    // Subject even-odd leaves a 64-unit band; intersecting with the full square keeps it.
    let out = run_with(ClipType::Intersection, &subject, &clip, FillRule::EvenOdd, FillRule::NonZero);
    assert_area(&out, 64.0);
    // Subject non-zero fills the whole square.
    let out = run_with(ClipType::Intersection, &subject, &clip, FillRule::NonZero, FillRule::EvenOdd);
    assert_area(&out, 100.0);
}

#[test]
fn overlapping_clip_counts_under_non_zero() {
    let subject = vec![rect(0, 0, 10, 10)];
    // Two overlapping clip squares: non-zero treats the overlap as filled once.
    let clip = vec![rect(5, 0, 15, 10), rect(5, 0, 15, 10)];
    assert_area(&run_with(ClipType::Difference, &subject, &clip, FillRule::NonZero, FillRule::NonZero), 50.0);
    // Even-odd cancels the doubled clip entirely.
    assert_area(&run_with(ClipType::Difference, &subject, &clip, FillRule::NonZero, FillRule::EvenOdd), 100.0);
}

#[test]
fn every_rule_agrees_on_a_simple_square() {
    let sq = vec![rect(0, 0, 10, 10)];
    for fill in [FillRule::EvenOdd, FillRule::NonZero] {
        assert_area(&run(ClipType::Union, &sq, &[], fill), 100.0);
    }
    let pos = union_area(&sq, FillRule::Positive);
    let neg = union_area(&sq, FillRule::Negative);
    assert_eq!(pos + neg, 100.0);
    assert!(pos == 0.0 || neg == 0.0);
}
