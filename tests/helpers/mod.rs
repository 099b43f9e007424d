// Copyright 2025 Lars Brubaker
// Shared test utilities for vatti-rust tests.

#![allow(dead_code)]

use approx::assert_relative_eq;
use vatti_rust::{
    area, point_in_polygon, ClipOptions, ClipType, Clipper, CInt, FillRule, IntPoint, Path, Paths, PointLocation,
    PolyTree, PolyType,
};

/// Axis-aligned rectangle, counter-clockwise.
pub fn rect(x0: CInt, y0: CInt, x1: CInt, y1: CInt) -> Path {
    vec![IntPoint::new(x0, y0), IntPoint::new(x1, y0), IntPoint::new(x1, y1), IntPoint::new(x0, y1)]
}

/// Same rectangle, clockwise.
pub fn rect_cw(x0: CInt, y0: CInt, x1: CInt, y1: CInt) -> Path {
    let mut p = rect(x0, y0, x1, y1);
    p.reverse();
    p
}

/// Signed total: outers add, holes subtract.
pub fn net_area(paths: &Paths) -> f64 {
    paths.iter().map(|p| area(p)).sum()
}

pub fn abs_area(paths: &Paths) -> f64 {
    paths.iter().map(|p| area(p).abs()).sum()
}

pub fn assert_area(paths: &Paths, expected: f64) {
    assert_relative_eq!(net_area(paths), expected, epsilon = 1e-9);
}

/// Runs one operation with subject and clip loaded as closed paths.
pub fn run(ct: ClipType, subject: &[Path], clip: &[Path], fill: FillRule) -> Paths {
    run_with(ct, subject, clip, fill, fill)
}

pub fn run_with(ct: ClipType, subject: &[Path], clip: &[Path], subj_fill: FillRule, clip_fill: FillRule) -> Paths {
    let mut c = Clipper::new();
    c.add_paths(subject, PolyType::Subject, true).unwrap();
    c.add_paths(clip, PolyType::Clip, true).unwrap();
    c.execute(ct, subj_fill, clip_fill).unwrap()
}

pub fn run_tree(ct: ClipType, subject: &[Path], clip: &[Path], fill: FillRule) -> PolyTree {
    let mut c = Clipper::new();
    c.add_paths(subject, PolyType::Subject, true).unwrap();
    c.add_paths(clip, PolyType::Clip, true).unwrap();
    c.execute_tree(ct, fill, fill).unwrap()
}

/// Every vertex of a closed result must lie on or inside the region it was clipped against.
pub fn assert_within(paths: &Paths, region: &Path) {
    for p in paths {
        for &pt in p {
            assert_ne!(point_in_polygon(pt, region), PointLocation::Outside, "{:?} escaped {:?}", pt, region);
        }
    }
}

/// No contour repeats a vertex. Outputs that touch themselves fail this.
pub fn assert_no_repeated_vertices(paths: &Paths) {
    for p in paths {
        for (i, a) in p.iter().enumerate() {
            assert!(!p[i + 1..].contains(a), "vertex {:?} repeats in {:?}", a, p);
        }
    }
}

/// Canonical form for comparing contours regardless of start vertex.
pub fn rotate_to_min(path: &Path) -> Path {
    let Some(start) = path.iter().enumerate().min_by_key(|(_, p)| (p.x, p.y)).map(|(i, _)| i) else {
        return Path::new();
    };
    path[start..].iter().chain(path[..start].iter()).copied().collect()
}

pub fn sorted_contours(paths: &Paths) -> Vec<Vec<(CInt, CInt)>> {
    let mut v: Vec<Vec<(CInt, CInt)>> =
        paths.iter().map(|p| rotate_to_min(p).iter().map(|q| (q.x, q.y)).collect()).collect();
    v.sort();
    v
}

/// Deterministic xorshift stream for seeded property tests.
pub struct XorShift(u64);

impl XorShift {
    pub fn new(seed: u64) -> Self {
        XorShift(seed.max(1))
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Uniform in `0..n`.
    pub fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    pub fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[self.below(items.len() as u64) as usize]
    }
}

/// A polygon of `n` vertices scattered over `0..span` on both axes.
/// It may cross itself.
pub fn random_path(rng: &mut XorShift, n: usize, span: CInt) -> Path {
    (0..n)
        .map(|_| IntPoint::new(rng.below(span as u64) as CInt, rng.below(span as u64) as CInt))
        .collect()
}

pub fn run_tree_with(
    ct: ClipType,
    subject: &[Path],
    clip: &[Path],
    subj_fill: FillRule,
    clip_fill: FillRule,
    options: ClipOptions,
) -> PolyTree {
    let mut c = Clipper::with_options(options);
    c.add_paths(subject, PolyType::Subject, true).unwrap();
    c.add_paths(clip, PolyType::Clip, true).unwrap();
    c.execute_tree(ct, subj_fill, clip_fill).unwrap()
}

/// Each closed node's orientation matches its depth, and each child lies
/// inside its parent (judged by its first vertex off the parent's boundary).
pub fn assert_tree_nesting(tree: &PolyTree, reverse: bool) {
    for n in tree.iter() {
        let node = tree.node(n);
        if node.is_open() {
            continue;
        }
        let contour = node.contour();
        assert!(contour.len() >= 3, "node {} has {} points", n, contour.len());
        let a = area(contour);
        assert_ne!(a, 0.0, "node {} has no area", n);
        assert_eq!((a > 0.0) != reverse, !tree.is_hole(n), "node {} (area {}) sits at depth {}", n, a, tree.depth(n));
        if let Some(p) = node.parent() {
            let parent = tree.node(p).contour();
            let first_off = contour.iter().map(|&pt| point_in_polygon(pt, parent)).find(|&l| l != PointLocation::OnBoundary);
            assert_ne!(first_off, Some(PointLocation::Outside), "node {} lies outside its parent {}", n, p);
        }
    }
}
