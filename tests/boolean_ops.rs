// Copyright 2025 Lars Brubaker
// Boolean operation correctness on closed polygons, checked by area and vertices.

mod helpers;

use approx::assert_relative_eq;
use helpers::{
    abs_area, assert_area, assert_within, net_area, random_path, rect, rect_cw, run, run_with, sorted_contours, XorShift,
};
use vatti_rust::{area, boolean, path_from, ClipOptions, ClipType, Clipper, FillRule, Paths, PolyType};

fn overlapping_squares() -> (Paths, Paths) {
    (vec![rect(0, 0, 2, 2)], vec![rect(1, 1, 3, 3)])
}

#[test]
fn union_of_overlapping_squares() {
    let (a, b) = overlapping_squares();
    let out = run(ClipType::Union, &a, &b, FillRule::NonZero);
    assert_eq!(out.len(), 1, "union should be one contour: {:?}", out);
    assert_area(&out, 7.0);
    assert_eq!(out[0].len(), 8);
}

#[test]
fn intersection_of_overlapping_squares() {
    let (a, b) = overlapping_squares();
    let out = run(ClipType::Intersection, &a, &b, FillRule::NonZero);
    assert_eq!(out.len(), 1);
    assert_area(&out, 1.0);
    assert_eq!(sorted_contours(&out), sorted_contours(&vec![rect(1, 1, 2, 2)]));
}

#[test]
fn difference_of_overlapping_squares() {
    let (a, b) = overlapping_squares();
    let out = run(ClipType::Difference, &a, &b, FillRule::NonZero);
    assert_eq!(out.len(), 1);
    assert_area(&out, 3.0);
    let l_shape = path_from(&[(0, 0), (2, 0), (2, 1), (1, 1), (1, 2), (0, 2)]);
    assert_eq!(sorted_contours(&out), sorted_contours(&vec![l_shape]));
    assert_within(&out, &a[0]);
}

#[test]
fn xor_is_union_minus_intersection() {
    let (a, b) = overlapping_squares();
    let union = net_area(&run(ClipType::Union, &a, &b, FillRule::EvenOdd));
    let inter = net_area(&run(ClipType::Intersection, &a, &b, FillRule::EvenOdd));
    let xor = run(ClipType::Xor, &a, &b, FillRule::EvenOdd);
    assert_relative_eq!(net_area(&xor), union - inter, epsilon = 1e-9);
}

#[test]
fn area_identities_hold_for_offset_rectangles() {
    let a = vec![rect(0, 0, 30, 20)];
    let b = vec![rect(10, -5, 45, 12)];
    let fill = FillRule::NonZero;
    let ua = net_area(&run(ClipType::Union, &a, &b, fill));
    let ia = net_area(&run(ClipType::Intersection, &a, &b, fill));
    let da = net_area(&run(ClipType::Difference, &a, &b, fill));
    let db = net_area(&run(ClipType::Difference, &b, &a, fill));

    assert_relative_eq!(ua + ia, area(&a[0]) + area(&b[0]), epsilon = 1e-9);
    assert_relative_eq!(da + ia, area(&a[0]), epsilon = 1e-9);
    assert_relative_eq!(da + db + ia, ua, epsilon = 1e-9);
}

#[test]
fn input_orientation_does_not_change_nonzero_result() {
    let ccw = run(ClipType::Union, &[rect(0, 0, 2, 2)], &[rect(1, 1, 3, 3)], FillRule::NonZero);
    let cw = run(ClipType::Union, &[rect_cw(0, 0, 2, 2)], &[rect_cw(1, 1, 3, 3)], FillRule::NonZero);
    assert_eq!(sorted_contours(&ccw), sorted_contours(&cw));
}

#[test]
fn disjoint_inputs() {
    let a = vec![rect(0, 0, 5, 5)];
    let b = vec![rect(10, 10, 15, 15)];
    assert!(run(ClipType::Intersection, &a, &b, FillRule::EvenOdd).is_empty());
    let u = run(ClipType::Union, &a, &b, FillRule::EvenOdd);
    assert_eq!(u.len(), 2);
    assert_area(&u, 50.0);
    let d = run(ClipType::Difference, &a, &b, FillRule::EvenOdd);
    assert_eq!(sorted_contours(&d), sorted_contours(&a));
}

#[test]
fn identical_inputs() {
    let a = vec![rect(0, 0, 8, 8)];
    assert!(run(ClipType::Xor, &a, &a, FillRule::EvenOdd).is_empty());
    assert!(run(ClipType::Difference, &a, &a, FillRule::EvenOdd).is_empty());
    assert_area(&run(ClipType::Intersection, &a, &a, FillRule::EvenOdd), 64.0);
    assert_area(&run(ClipType::Union, &a, &a, FillRule::EvenOdd), 64.0);
}

#[test]
fn punching_a_hole_gives_outer_and_hole() {
    let out = run(ClipType::Difference, &[rect(0, 0, 10, 10)], &[rect(3, 3, 7, 7)], FillRule::NonZero);
    assert_eq!(out.len(), 2);
    assert_area(&out, 84.0);
    assert_relative_eq!(abs_area(&out), 116.0, epsilon = 1e-9);
    let mut areas: Vec<f64> = out.iter().map(|p| area(p)).collect();
    areas.sort_by(|a, b| a.total_cmp(b));
    assert_eq!(areas, vec![-16.0, 100.0]);
}

#[test]
fn triangle_clipped_by_square() {
    let tri = vec![path_from(&[(0, 0), (20, 0), (0, 20)])];
    let sq = vec![rect(0, 0, 10, 10)];
    let out = run(ClipType::Intersection, &tri, &sq, FillRule::NonZero);
    assert_eq!(out.len(), 1);
    // The hypotenuse passes through (10,10), so the whole square survives.
    assert_area(&out, 100.0);
    assert_within(&out, &tri[0]);
}

#[test]
fn diagonal_crossings_meet_at_integer_points() {
    let diamond = vec![path_from(&[(10, 0), (20, 10), (10, 20), (0, 10)])];
    let sq = vec![rect(0, 0, 10, 10)];
    let out = run(ClipType::Intersection, &diamond, &sq, FillRule::NonZero);
    assert_eq!(out.len(), 1);
    assert_area(&out, 50.0);
}

#[test]
fn boolean_helper_matches_engine() {
    let (a, b) = overlapping_squares();
    let via_helper = boolean(ClipType::Union, &a, &b, FillRule::NonZero).unwrap();
    let via_engine = run(ClipType::Union, &a, &b, FillRule::NonZero);
    assert_eq!(via_helper, via_engine);
}

#[test]
fn many_overlapping_squares_union() {
    // Five 4x4 squares, each shifted by (2,2).
    let squares: Paths = (0..5).map(|i| rect(i * 2, i * 2, i * 2 + 4, i * 2 + 4)).collect();
    let out = run(ClipType::Union, &squares, &[], FillRule::NonZero);
    assert_eq!(out.len(), 1);
    // Five 16-unit squares minus four 4-unit overlaps.
    assert_area(&out, 64.0);
}

fn random_paths(rng: &mut XorShift, count: usize, span: i64) -> Paths {
    let mut paths = Vec::with_capacity(count);
    for _ in 0..count {
        let n = 3 + rng.below(6) as usize;
        paths.push(random_path(rng, n, span));
    }
    paths
}

#[test]
fn union_plus_intersection_covers_both_inputs() {
    const SPAN: i64 = 10_000;
    let mut rng = XorShift::new(0xc1_1995);
    for case in 0..300 {
        let (na, nb) = (1 + rng.below(2) as usize, 1 + rng.below(2) as usize);
        let a = random_paths(&mut rng, na, SPAN);
        let b = random_paths(&mut rng, nb, SPAN);
        let (sf, cf) = (rng.pick(&FillRule::ALL), rng.pick(&FillRule::ALL));

        let outputs = [
            run_with(ClipType::Union, &a, &b, sf, cf),
            run_with(ClipType::Intersection, &a, &b, sf, cf),
            run_with(ClipType::Union, &a, &[], sf, sf),
            run_with(ClipType::Union, &b, &[], cf, cf),
        ];
        let areas: Vec<f64> = outputs.iter().map(net_area).collect();
        let (union, inter, only_a, only_b) = (areas[0], areas[1], areas[2], areas[3]);
        // Crossings are rounded to the integer grid, moving each output
        // vertex by under one unit.
        let vertices: usize = outputs.iter().flatten().map(|p| p.len()).sum();
        let tolerance = 4.0 * SPAN as f64 * vertices as f64;
        assert!(
            (union + inter - only_a - only_b).abs() <= tolerance,
            "case {}: {} + {} vs {} + {} ({:?}/{:?})",
            case,
            union,
            inter,
            only_a,
            only_b,
            sf,
            cf
        );
    }
}

#[test]
fn strictly_simple_output_has_no_degenerate_contours() {
    let mut rng = XorShift::new(0xdec0_0ded);
    for case in 0..400 {
        let a = random_paths(&mut rng, 3, 30);
        let b = random_paths(&mut rng, 3, 30);
        let mut c = Clipper::with_options(ClipOptions { strictly_simple: true, ..ClipOptions::default() });
        c.add_paths(&a, PolyType::Subject, true).unwrap();
        c.add_paths(&b, PolyType::Clip, true).unwrap();
        let (sf, cf) = (rng.pick(&FillRule::ALL), rng.pick(&FillRule::ALL));
        let out = c.execute(rng.pick(&ClipType::ALL), sf, cf).unwrap();
        for p in &out {
            assert!(p.len() >= 3, "case {}: contour {:?}", case, p);
            assert_ne!(area(p), 0.0, "case {}: flat contour {:?}", case, p);
        }
    }
}
