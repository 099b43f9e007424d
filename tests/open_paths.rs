// Copyright 2025 Lars Brubaker
// Clipping open polylines against closed polygons.

mod helpers;

use helpers::rect;
use vatti_rust::{
    open_paths_from_polytree, path_from, ClipError, ClipType, Clipper, FillRule, IntPoint, Path, PolyTree, PolyType,
};

fn clip_line(line: &Path, ct: ClipType) -> PolyTree {
    let mut c = Clipper::new();
    assert!(c.add_path(line, PolyType::Subject, false).unwrap());
    c.add_path(&rect(0, 0, 10, 10), PolyType::Clip, true).unwrap();
    c.execute_tree(ct, FillRule::NonZero, FillRule::NonZero).unwrap()
}

/// Endpoints sorted, so the direction a segment was emitted in does not matter.
fn endpoints(p: &[IntPoint]) -> (IntPoint, IntPoint) {
    let (a, b) = (p[0], p[p.len() - 1]);
    if (a.x, a.y) <= (b.x, b.y) {
        (a, b)
    } else {
        (b, a)
    }
}

#[test]
fn line_through_square_is_trimmed_to_its_chord() {
    let tree = clip_line(&path_from(&[(-5, 5), (15, 5)]), ClipType::Intersection);
    assert_eq!(tree.total(), 1);
    let node = tree.node(tree.roots()[0]);
    assert!(node.is_open());
    assert_eq!(node.contour().len(), 2);
    assert_eq!(endpoints(node.contour()), (IntPoint::new(0, 5), IntPoint::new(10, 5)));
}

#[test]
fn vertical_line_through_square() {
    let tree = clip_line(&path_from(&[(4, -3), (4, 20)]), ClipType::Intersection);
    let open = open_paths_from_polytree(&tree);
    assert_eq!(open.len(), 1);
    assert_eq!(endpoints(&open[0]), (IntPoint::new(4, 0), IntPoint::new(4, 10)));
}

#[test]
fn difference_keeps_the_parts_outside() {
    let tree = clip_line(&path_from(&[(-5, 5), (15, 5)]), ClipType::Difference);
    let mut open = open_paths_from_polytree(&tree);
    assert_eq!(open.len(), 2);
    open.sort_by_key(|p| endpoints(p).0.x);
    assert_eq!(endpoints(&open[0]), (IntPoint::new(-5, 5), IntPoint::new(0, 5)));
    assert_eq!(endpoints(&open[1]), (IntPoint::new(10, 5), IntPoint::new(15, 5)));
}

#[test]
fn line_outside_clip_vanishes_under_intersection() {
    let tree = clip_line(&path_from(&[(20, 0), (30, 10)]), ClipType::Intersection);
    assert!(tree.is_empty());
}

#[test]
fn diagonal_line_is_cut_at_the_boundary() {
    let tree = clip_line(&path_from(&[(-2, -2), (12, 12)]), ClipType::Intersection);
    let open = open_paths_from_polytree(&tree);
    assert_eq!(open.len(), 1);
    assert_eq!(endpoints(&open[0]), (IntPoint::new(0, 0), IntPoint::new(10, 10)));
}

#[test]
fn open_paths_stay_at_the_root() {
    let mut c = Clipper::new();
    c.add_path(&rect(0, 0, 10, 10), PolyType::Subject, true).unwrap();
    c.add_path(&path_from(&[(2, 2), (8, 8)]), PolyType::Subject, false).unwrap();
    c.add_path(&rect(-1, -1, 11, 11), PolyType::Clip, true).unwrap();
    let tree = c.execute_tree(ClipType::Intersection, FillRule::NonZero, FillRule::NonZero).unwrap();
    for &r in tree.roots() {
        if tree.node(r).is_open() {
            assert_eq!(tree.node(r).parent(), None);
            assert_eq!(tree.node(r).child_count(), 0);
        }
    }
    assert_eq!(open_paths_from_polytree(&tree).len(), 1);
}

#[test]
fn open_clip_paths_are_rejected() {
    let mut c = Clipper::new();
    assert_eq!(
        c.add_path(&path_from(&[(0, 0), (5, 5)]), PolyType::Clip, false),
        Err(ClipError::OpenClipPath)
    );
}

#[test]
fn flat_execute_with_open_paths_fails_then_recovers() {
    let mut c = Clipper::new();
    c.add_path(&path_from(&[(0, 0), (5, 5)]), PolyType::Subject, false).unwrap();
    c.add_path(&rect(0, 0, 10, 10), PolyType::Clip, true).unwrap();
    assert_eq!(
        c.execute(ClipType::Intersection, FillRule::NonZero, FillRule::NonZero),
        Err(ClipError::OpenPathsNeedTree)
    );
    let tree = c.execute_tree(ClipType::Intersection, FillRule::NonZero, FillRule::NonZero).unwrap();
    assert_eq!(open_paths_from_polytree(&tree).len(), 1);
}

#[test]
fn degenerate_open_path_is_ignored() {
    let mut c = Clipper::new();
    assert!(!c.add_path(&path_from(&[(3, 3), (3, 3)]), PolyType::Subject, false).unwrap());
    assert!(!c.add_path(&path_from(&[(3, 3)]), PolyType::Subject, false).unwrap());
}

fn run_lines(lines: &[Path], clip: &[Path], ct: ClipType, fill: FillRule) -> Vec<Path> {
    let mut c = Clipper::new();
    for line in lines {
        c.add_path(line, PolyType::Subject, false).unwrap();
    }
    c.add_paths(clip, PolyType::Clip, true).unwrap();
    let tree = c.execute_tree(ct, fill, fill).unwrap();
    open_paths_from_polytree(&tree)
}

#[test]
fn lone_horizontal_line_is_kept() {
    let line = path_from(&[(0, 5), (10, 5)]);
    for ct in [ClipType::Union, ClipType::Difference, ClipType::Xor] {
        let open = run_lines(&[line.clone()], &[], ct, FillRule::NonZero);
        assert_eq!(open.len(), 1, "{:?}", ct);
        assert_eq!(endpoints(&open[0]), (IntPoint::new(0, 5), IntPoint::new(10, 5)));
    }
    assert!(run_lines(&[line], &[], ClipType::Intersection, FillRule::NonZero).is_empty());
}

#[test]
fn horizontal_line_in_the_final_scanbeam_is_kept() {
    // The clip lies entirely on one side, so the line's Y is the last one swept.
    let line = path_from(&[(112, 12), (38, 12)]);
    let open = run_lines(&[line], &[rect(20, 46, 60, 80)], ClipType::Difference, FillRule::NonZero);
    assert_eq!(open.len(), 1);
    assert_eq!(endpoints(&open[0]), (IntPoint::new(38, 12), IntPoint::new(112, 12)));
}

#[test]
fn union_keeps_every_open_line() {
    let lines = [path_from(&[(0, 5), (10, 5)]), path_from(&[(0, 5), (10, 5), (10, 8)])];
    let open = run_lines(&lines, &[], ClipType::Union, FillRule::NonZero);
    let mut ends: Vec<_> = open.iter().map(|p| endpoints(p)).map(|(a, b)| ((a.x, a.y), (b.x, b.y))).collect();
    ends.sort();
    assert_eq!(ends, vec![((0, 5), (10, 5)), ((0, 5), (10, 8))]);
}

#[test]
fn positive_and_negative_clip_lines_to_the_filled_orientation() {
    let line = path_from(&[(-5, 5), (15, 5)]);
    for fill in [FillRule::Positive, FillRule::Negative] {
        for square in [rect(0, 0, 10, 10), helpers::rect_cw(0, 0, 10, 10)] {
            let filled = !helpers::run(ClipType::Union, &[square.clone()], &[], fill).is_empty();

            let inside = run_lines(&[line.clone()], &[square.clone()], ClipType::Intersection, fill);
            if filled {
                assert_eq!(inside.len(), 1);
                assert_eq!(endpoints(&inside[0]), (IntPoint::new(0, 5), IntPoint::new(10, 5)));
            } else {
                assert!(inside.is_empty(), "{:?} kept {:?}", fill, inside);
            }

            let outside = run_lines(&[line.clone()], &[square], ClipType::Difference, fill);
            if filled {
                assert_eq!(outside.len(), 2);
            } else {
                assert_eq!(outside.len(), 1);
                assert_eq!(endpoints(&outside[0]), (IntPoint::new(-5, 5), IntPoint::new(15, 5)));
            }
        }
    }
}

#[test]
fn overlapping_clips_under_non_zero_cut_at_the_outer_boundary() {
    let line = path_from(&[(-5, 5), (25, 5)]);
    let clip = vec![rect(0, 0, 15, 10), rect(5, 0, 20, 10)];
    let inside = run_lines(&[line], &clip, ClipType::Intersection, FillRule::NonZero);
    assert_eq!(inside.len(), 1);
    assert_eq!(endpoints(&inside[0]), (IntPoint::new(0, 5), IntPoint::new(20, 5)));
}
