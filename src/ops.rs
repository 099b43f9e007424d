// Copyright 2025 Lars Brubaker
// License: MIT
//
// One-shot operations built on the Clipper engine.

use crate::clipper::{ClipOptions, Clipper};
use crate::edge::PolyType;
use crate::error::ClipError;
use crate::geom::{orientation, points_are_close, slopes_near_collinear, IntPoint, Path, Paths};
use crate::polytree::PolyTree;
use crate::winding::{ClipType, FillRule};

/// Default vertex distance used by [`clean_polygon`]: roughly √2, so
/// diagonal neighbours one unit apart are merged.
pub const DEFAULT_CLEAN_DISTANCE: f64 = 1.415;

/// Boolean operation on closed subject and clip paths under one fill rule.
pub fn boolean(clip_type: ClipType, subject: &[Path], clip: &[Path], fill: FillRule) -> Result<Paths, ClipError> {
    let mut c = Clipper::new();
    c.add_paths(subject, PolyType::Subject, true)?;
    c.add_paths(clip, PolyType::Clip, true)?;
    c.execute(clip_type, fill, fill)
}

pub fn reverse_paths(paths: &mut Paths) {
    for p in paths.iter_mut() {
        p.reverse();
    }
}

// ─────── Tree flattening ──────────────────────────────────────────────────────

/// Every contour in the tree, depth first.
pub fn polytree_to_paths(tree: &PolyTree) -> Paths {
    tree.iter()
        .map(|n| tree.node(n))
        .filter(|n| !n.contour().is_empty())
        .map(|n| n.contour().to_vec())
        .collect()
}

/// Closed contours only, depth first.
pub fn closed_paths_from_polytree(tree: &PolyTree) -> Paths {
    tree.iter()
        .map(|n| tree.node(n))
        .filter(|n| !n.is_open() && !n.contour().is_empty())
        .map(|n| n.contour().to_vec())
        .collect()
}

/// Open paths only. They are always roots.
pub fn open_paths_from_polytree(tree: &PolyTree) -> Paths {
    tree.roots()
        .iter()
        .map(|&n| tree.node(n))
        .filter(|n| n.is_open())
        .map(|n| n.contour().to_vec())
        .collect()
}

// ─────── Simplify / clean ─────────────────────────────────────────────────────

/// Resolves self-intersections, returning contours that never touch themselves.
pub fn simplify_polygon(path: &[IntPoint], fill: FillRule) -> Result<Paths, ClipError> {
    let mut c = simplifier();
    c.add_path(path, PolyType::Subject, true)?;
    c.execute(ClipType::Union, fill, fill)
}

pub fn simplify_polygons(paths: &[Path], fill: FillRule) -> Result<Paths, ClipError> {
    let mut c = simplifier();
    c.add_paths(paths, PolyType::Subject, true)?;
    c.execute(ClipType::Union, fill, fill)
}

fn simplifier() -> Clipper {
    Clipper::with_options(ClipOptions { strictly_simple: true, ..ClipOptions::default() })
}

/// Index-linked ring used while cleaning.
struct CleanRing {
    next: Vec<usize>,
    prev: Vec<usize>,
    kept: Vec<bool>,
}

impl CleanRing {
    fn new(n: usize) -> Self {
        CleanRing {
            next: (0..n).map(|i| (i + 1) % n).collect(),
            prev: (0..n).map(|i| (i + n - 1) % n).collect(),
            kept: vec![false; n],
        }
    }

    /// Unlinks `op` and returns its predecessor, which must be rechecked.
    fn exclude(&mut self, op: usize) -> usize {
        let (p, n) = (self.prev[op], self.next[op]);
        self.next[p] = n;
        self.prev[n] = p;
        self.kept[p] = false;
        p
    }
}

/// Removes vertices that nearly duplicate a neighbour or lie within
/// `distance` of the line through their neighbours. Returns an empty path
/// when fewer than three vertices survive.
pub fn clean_polygon(path: &[IntPoint], distance: f64) -> Path {
    let n = path.len();
    if n == 0 {
        return Path::new();
    }
    let dist_sqrd = distance * distance;
    let mut ring = CleanRing::new(n);
    let mut cnt = n;
    let mut op = 0;

    while !ring.kept[op] && ring.next[op] != ring.prev[op] {
        let (p, nx) = (ring.prev[op], ring.next[op]);
        if points_are_close(path[op], path[p], dist_sqrd) {
            op = ring.exclude(op);
            cnt -= 1;
        } else if points_are_close(path[p], path[nx], dist_sqrd) {
            ring.exclude(nx);
            op = ring.exclude(op);
            cnt -= 2;
        } else if slopes_near_collinear(path[p], path[op], path[nx], dist_sqrd) {
            op = ring.exclude(op);
            cnt -= 1;
        } else {
            ring.kept[op] = true;
            op = nx;
        }
    }

    if cnt < 3 {
        return Path::new();
    }
    let mut out = Vec::with_capacity(cnt);
    for _ in 0..cnt {
        out.push(path[op]);
        op = ring.next[op];
    }
    out
}

pub fn clean_polygons(paths: &[Path], distance: f64) -> Paths {
    paths.iter().map(|p| clean_polygon(p, distance)).collect()
}

// ─────── Minkowski ────────────────────────────────────────────────────────────

/// Quads swept by `pattern` placed at each vertex of `path`.
fn minkowski_quads(pattern: &[IntPoint], path: &[IntPoint], is_sum: bool, is_closed: bool) -> Paths {
    let (poly_cnt, path_cnt) = (pattern.len(), path.len());
    if poly_cnt == 0 || path_cnt == 0 {
        return Paths::new();
    }
    let placed: Vec<Path> = path
        .iter()
        .map(|p| {
            pattern
                .iter()
                .map(|q| if is_sum { IntPoint::new(p.x + q.x, p.y + q.y) } else { IntPoint::new(p.x - q.x, p.y - q.y) })
                .collect()
        })
        .collect();

    let rows = if is_closed { path_cnt } else { path_cnt - 1 };
    let mut quads = Vec::with_capacity(rows * poly_cnt);
    for i in 0..rows {
        let (a, b) = (&placed[i % path_cnt], &placed[(i + 1) % path_cnt]);
        for j in 0..poly_cnt {
            let k = (j + 1) % poly_cnt;
            let mut quad = vec![a[j], b[j], b[k], a[k]];
            if !orientation(&quad) {
                quad.reverse();
            }
            quads.push(quad);
        }
    }
    quads
}

fn union_nonzero(c: &mut Clipper) -> Result<Paths, ClipError> {
    c.execute(ClipType::Union, FillRule::NonZero, FillRule::NonZero)
}

/// Minkowski sum of `pattern` swept along `path`.
pub fn minkowski_sum(pattern: &[IntPoint], path: &[IntPoint], path_is_closed: bool) -> Result<Paths, ClipError> {
    let quads = minkowski_quads(pattern, path, true, path_is_closed);
    let mut c = Clipper::new();
    c.add_paths(&quads, PolyType::Subject, true)?;
    union_nonzero(&mut c)
}

/// Minkowski sum of `pattern` swept along every path in `paths`. Closed
/// paths also contribute their (pattern-shifted) interior.
pub fn minkowski_sum_paths(pattern: &[IntPoint], paths: &[Path], path_is_closed: bool) -> Result<Paths, ClipError> {
    let mut c = Clipper::new();
    for path in paths {
        let quads = minkowski_quads(pattern, path, true, path_is_closed);
        c.add_paths(&quads, PolyType::Subject, true)?;
        if path_is_closed {
            if let Some(&shift) = pattern.first() {
                let moved: Path = path.iter().map(|p| IntPoint::new(p.x + shift.x, p.y + shift.y)).collect();
                c.add_path(&moved, PolyType::Clip, true)?;
            }
        }
    }
    union_nonzero(&mut c)
}

/// Minkowski difference of two closed polygons.
pub fn minkowski_diff(poly1: &[IntPoint], poly2: &[IntPoint]) -> Result<Paths, ClipError> {
    let quads = minkowski_quads(poly1, poly2, false, true);
    let mut c = Clipper::new();
    c.add_paths(&quads, PolyType::Subject, true)?;
    union_nonzero(&mut c)
}
