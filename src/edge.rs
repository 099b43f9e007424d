// Copyright 2025 Lars Brubaker
// License: MIT
//
// Edge records and the local-minima list built from input paths.
//
// Every input path becomes a closed loop of edges (next/prev). The loop is
// then cut into "bounds": monotone runs of edges climbing from a local
// minimum to a local maximum, chained through next_in_lml. Each local
// minimum holds a left and a right bound which enter the sweep together.
//
// Y grows downward through a bound: `bot` is the vertex with the larger Y.

use crate::arena::{Arena, Handle, NONE};
use crate::error::ClipError;
use crate::geom::{
    pt2_is_between_pt1_and_pt3, range_test, round, slopes_equal3, CInt, IntPoint, RangeCheck,
};
use crate::scanbeam::Scanbeam;

pub type EdgeIdx = Handle;

/// Sentinel slope for horizontal edges.
pub const HORIZONTAL: f64 = -3.4e38;

/// Which input collection a path belongs to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PolyType {
    #[default]
    Subject,
    Clip,
}

/// Which side of its output ring an edge feeds.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum EdgeSide {
    #[default]
    Left,
    Right,
}

#[derive(Clone, Debug)]
pub struct Edge {
    pub bot: IntPoint,
    /// Current position on the sweep line.
    pub curr: IntPoint,
    pub top: IntPoint,
    pub delta: IntPoint,
    /// dx/dy, or HORIZONTAL.
    pub dx: f64,
    pub poly_type: PolyType,
    pub side: EdgeSide,
    /// +1 / -1 for closed paths by direction, 0 for open paths.
    pub wind_delta: i32,
    /// Winding count of this edge's own polygon set.
    pub wind_cnt: i32,
    /// Winding count of the other polygon set.
    pub wind_cnt2: i32,
    /// Output record fed by this edge, or NONE.
    pub out_idx: Handle,
    /// Marks the edge joining the two ends of an open path; never swept.
    pub skip: bool,
    pub next: EdgeIdx,
    pub prev: EdgeIdx,
    pub next_in_lml: EdgeIdx,
    pub next_in_ael: EdgeIdx,
    pub prev_in_ael: EdgeIdx,
    pub next_in_sel: EdgeIdx,
    pub prev_in_sel: EdgeIdx,
}

impl Default for Edge {
    fn default() -> Self {
        Edge {
            bot: IntPoint::default(),
            curr: IntPoint::default(),
            top: IntPoint::default(),
            delta: IntPoint::default(),
            dx: 0.0,
            poly_type: PolyType::Subject,
            side: EdgeSide::Left,
            wind_delta: 0,
            wind_cnt: 0,
            wind_cnt2: 0,
            out_idx: NONE,
            skip: false,
            next: NONE,
            prev: NONE,
            next_in_lml: NONE,
            next_in_ael: NONE,
            prev_in_ael: NONE,
            next_in_sel: NONE,
            prev_in_sel: NONE,
        }
    }
}

impl Edge {
    #[inline]
    pub fn is_horizontal(&self) -> bool {
        self.delta.y == 0
    }

    #[inline]
    pub fn is_contributing_output(&self) -> bool {
        self.out_idx != NONE
    }

    /// X of this edge (extended as a line) at height `y`.
    #[inline]
    pub fn top_x(&self, y: CInt) -> CInt {
        if y == self.top.y {
            self.top.x
        } else {
            self.bot.x + round(self.dx * (y - self.bot.y) as f64)
        }
    }

    fn set_dx(&mut self) {
        self.delta = IntPoint::new(self.top.x - self.bot.x, self.top.y - self.bot.y);
        self.dx = if self.delta.y == 0 {
            HORIZONTAL
        } else {
            self.delta.x as f64 / self.delta.y as f64
        };
    }

    fn reverse_horizontal(&mut self) {
        std::mem::swap(&mut self.top.x, &mut self.bot.x);
    }
}

/// A Y value where one or two bounds become active.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LocalMinima {
    pub y: CInt,
    pub left_bound: EdgeIdx,
    pub right_bound: EdgeIdx,
}

// ─────────────────────────── Edge set ─────────────────────────────────────────

/// All edges built from the loaded paths plus their local minima.
#[derive(Default)]
pub struct EdgeSet {
    pub edges: Arena<Edge>,
    /// Sorted by descending Y.
    minima: Vec<LocalMinima>,
    current_lm: usize,
    pub use_full_range: bool,
    pub has_open_paths: bool,
    pub preserve_collinear: bool,
}

impl EdgeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.edges.clear();
        self.minima.clear();
        self.current_lm = 0;
        self.use_full_range = false;
        self.has_open_paths = false;
    }

    pub fn minima_count(&self) -> usize {
        self.minima.len()
    }

    pub fn local_minima_pending(&self) -> bool {
        self.current_lm < self.minima.len()
    }

    /// Pops the next local minimum if it sits at `y`.
    pub fn pop_local_minima(&mut self, y: CInt) -> Option<LocalMinima> {
        let lm = *self.minima.get(self.current_lm)?;
        if lm.y != y {
            return None;
        }
        self.current_lm += 1;
        Some(lm)
    }

    /// Rewinds for a new sweep and seeds `scanbeam` with every minimum's Y.
    pub fn reset(&mut self, scanbeam: &mut Scanbeam) {
        self.current_lm = 0;
        scanbeam.clear();
        for h in self.edges.handles() {
            let e = &mut self.edges[h];
            e.next_in_ael = NONE;
            e.prev_in_ael = NONE;
            e.next_in_sel = NONE;
            e.prev_in_sel = NONE;
            e.wind_cnt = 0;
            e.wind_cnt2 = 0;
        }
        for lm in &self.minima {
            scanbeam.insert(lm.y);
            for (b, side) in [(lm.left_bound, EdgeSide::Left), (lm.right_bound, EdgeSide::Right)] {
                if b != NONE {
                    let e = &mut self.edges[b];
                    e.curr = e.bot;
                    e.side = side;
                    e.out_idx = NONE;
                }
            }
        }
    }

    fn insert_local_minima(&mut self, lm: LocalMinima) {
        let pos = self.minima.iter().position(|m| m.y < lm.y).unwrap_or(self.minima.len());
        self.minima.insert(pos, lm);
    }

    fn remove_edge(&mut self, e: EdgeIdx) -> EdgeIdx {
        let (prev, next) = (self.edges[e].prev, self.edges[e].next);
        self.edges[prev].next = next;
        self.edges[next].prev = prev;
        self.edges[e].prev = NONE;
        next
    }

    fn init_edge2(&mut self, e: EdgeIdx, poly_type: PolyType) {
        let next_curr = self.edges[self.edges[e].next].curr;
        let edge = &mut self.edges[e];
        if edge.curr.y >= next_curr.y {
            edge.bot = edge.curr;
            edge.top = next_curr;
        } else {
            edge.top = edge.curr;
            edge.bot = next_curr;
        }
        edge.set_dx();
        edge.poly_type = poly_type;
    }

    #[inline]
    fn is_horz(&self, e: EdgeIdx) -> bool {
        self.edges[e].dx == HORIZONTAL
    }

    /// Adds one path. Returns Ok(false) when the path is too degenerate to
    /// contribute anything.
    pub fn add_path(&mut self, pg: &[IntPoint], poly_type: PolyType, closed: bool) -> Result<bool, ClipError> {
        if !closed && poly_type == PolyType::Clip {
            return Err(ClipError::OpenClipPath);
        }
        if pg.is_empty() {
            return Ok(false);
        }

        let mut high_i = pg.len() - 1;
        if closed {
            while high_i > 0 && pg[high_i] == pg[0] {
                high_i -= 1;
            }
        }
        while high_i > 0 && pg[high_i] == pg[high_i - 1] {
            high_i -= 1;
        }
        if (closed && high_i < 2) || (!closed && high_i < 1) {
            return Ok(false);
        }

        // Validate every coordinate before touching any state.
        let mut full_range = self.use_full_range;
        for &pt in &pg[..=high_i] {
            match range_test(pt, full_range) {
                RangeCheck::Ok => {}
                RangeCheck::NeedsFullRange => full_range = true,
                RangeCheck::OutOfRange => {
                    return Err(ClipError::CoordinateOutOfRange { x: pt.x, y: pt.y })
                }
            }
        }
        self.use_full_range = full_range;

        let base = self.edges.len();
        let idx = |i: usize| (base + i) as EdgeIdx;
        for i in 0..=high_i {
            let e = self.edges.alloc(Edge::default());
            self.edges[e].curr = pg[i];
            self.edges[e].next = idx((i + 1) % (high_i + 1));
            self.edges[e].prev = idx((i + high_i) % (high_i + 1));
        }

        // Remove duplicate vertices and, for closed paths, collinear edges.
        let mut e_start = idx(0);
        let mut e = e_start;
        let mut e_loop_stop = e_start;
        loop {
            let next = self.edges[e].next;
            if self.edges[e].curr == self.edges[next].curr && (closed || next != e_start) {
                if e == next {
                    break;
                }
                if e == e_start {
                    e_start = next;
                }
                e = self.remove_edge(e);
                e_loop_stop = e;
                continue;
            }
            let prev = self.edges[e].prev;
            if prev == next {
                break;
            }
            let (pc, c, nc) = (self.edges[prev].curr, self.edges[e].curr, self.edges[next].curr);
            if closed
                && slopes_equal3(pc, c, nc, self.use_full_range)
                && (!self.preserve_collinear || !pt2_is_between_pt1_and_pt3(pc, c, nc))
            {
                if e == e_start {
                    e_start = next;
                }
                e = self.remove_edge(e);
                e = self.edges[e].prev;
                e_loop_stop = e;
                continue;
            }
            e = next;
            if e == e_loop_stop || (!closed && self.edges[e].next == e_start) {
                break;
            }
        }

        if (!closed && e == self.edges[e].next) || (closed && self.edges[e].prev == self.edges[e].next) {
            self.edges.truncate(base);
            return Ok(false);
        }

        if !closed {
            self.has_open_paths = true;
            let p = self.edges[e_start].prev;
            self.edges[p].skip = true;
        }

        let mut is_flat = true;
        e = e_start;
        loop {
            self.init_edge2(e, poly_type);
            e = self.edges[e].next;
            if is_flat && self.edges[e].curr.y != self.edges[e_start].curr.y {
                is_flat = false;
            }
            if e == e_start {
                break;
            }
        }

        // Totally flat paths cannot form minima the usual way.
        if is_flat {
            if closed {
                self.edges.truncate(base);
                return Ok(false);
            }
            let p = self.edges[e].prev;
            self.edges[p].skip = true;
            let lm = LocalMinima { y: self.edges[e].bot.y, left_bound: NONE, right_bound: e };
            self.edges[e].side = EdgeSide::Right;
            self.edges[e].wind_delta = 0;
            loop {
                let prev_top_x = self.edges[self.edges[e].prev].top.x;
                if self.edges[e].bot.x != prev_top_x {
                    self.edges[e].reverse_horizontal();
                }
                let next = self.edges[e].next;
                if self.edges[next].skip {
                    break;
                }
                self.edges[e].next_in_lml = next;
                e = next;
            }
            self.insert_local_minima(lm);
            return Ok(true);
        }

        // Open paths whose ends meet would otherwise loop forever below.
        let p = self.edges[e].prev;
        if self.edges[p].bot == self.edges[p].top {
            e = self.edges[e].next;
        }

        let mut e_min = NONE;
        loop {
            e = self.find_next_loc_min(e);
            if e == e_min {
                break;
            }
            if e_min == NONE {
                e_min = e;
            }

            // e and e.prev share a local minimum; slopes decide which bound is left.
            let prev = self.edges[e].prev;
            let (mut left, mut right, left_bound_is_forward) = if self.edges[e].dx < self.edges[prev].dx {
                (prev, e, false)
            } else {
                (e, prev, true)
            };
            let y = self.edges[e].bot.y;
            self.edges[left].side = EdgeSide::Left;
            self.edges[right].side = EdgeSide::Right;

            let wd = if !closed {
                0
            } else if self.edges[left].next == right {
                -1
            } else {
                1
            };
            self.edges[left].wind_delta = wd;
            self.edges[right].wind_delta = -wd;

            e = self.process_bound(left, left_bound_is_forward);
            if self.edges[e].skip {
                e = self.process_bound(e, left_bound_is_forward);
            }
            let mut e2 = self.process_bound(right, !left_bound_is_forward);
            if self.edges[e2].skip {
                e2 = self.process_bound(e2, !left_bound_is_forward);
            }

            if self.edges[left].skip {
                left = NONE;
            } else if self.edges[right].skip {
                right = NONE;
            }
            self.insert_local_minima(LocalMinima { y, left_bound: left, right_bound: right });
            if !left_bound_is_forward {
                e = e2;
            }
        }
        Ok(true)
    }

    fn find_next_loc_min(&self, mut e: EdgeIdx) -> EdgeIdx {
        let edges = &self.edges;
        loop {
            while edges[e].bot != edges[edges[e].prev].bot || edges[e].curr == edges[e].top {
                e = edges[e].next;
            }
            if !self.is_horz(e) && !self.is_horz(edges[e].prev) {
                break;
            }
            while self.is_horz(edges[e].prev) {
                e = edges[e].prev;
            }
            let e2 = e;
            while self.is_horz(e) {
                e = edges[e].next;
            }
            if edges[e].top.y == edges[edges[e].prev].bot.y {
                // only an intermediate horizontal
                continue;
            }
            if edges[edges[e2].prev].bot.x < edges[e].bot.x {
                e = e2;
            }
            break;
        }
        e
    }

    /// Chains one bound starting at `e` through next_in_lml and returns the
    /// edge just past the bound.
    fn process_bound(&mut self, mut e: EdgeIdx, left_bound_is_forward: bool) -> EdgeIdx {
        let mut result = e;

        if self.edges[result].skip {
            // Edges beyond a skip edge in this bound become their own minimum.
            e = result;
            if left_bound_is_forward {
                while self.edges[e].top.y == self.edges[self.edges[e].next].bot.y {
                    e = self.edges[e].next;
                }
                while e != result && self.is_horz(e) {
                    e = self.edges[e].prev;
                }
            } else {
                while self.edges[e].top.y == self.edges[self.edges[e].prev].bot.y {
                    e = self.edges[e].prev;
                }
                while e != result && self.is_horz(e) {
                    e = self.edges[e].next;
                }
            }
            if e == result {
                result = if left_bound_is_forward { self.edges[e].next } else { self.edges[e].prev };
            } else {
                e = if left_bound_is_forward { self.edges[result].next } else { self.edges[result].prev };
                let lm = LocalMinima { y: self.edges[e].bot.y, left_bound: NONE, right_bound: e };
                self.edges[e].wind_delta = 0;
                result = self.process_bound(e, left_bound_is_forward);
                self.insert_local_minima(lm);
            }
            return result;
        }

        if self.is_horz(e) {
            // A leading horizontal may follow a skip edge or head left before going right.
            let e_start = if left_bound_is_forward { self.edges[e].prev } else { self.edges[e].next };
            if self.is_horz(e_start) {
                if self.edges[e_start].bot.x != self.edges[e].bot.x
                    && self.edges[e_start].top.x != self.edges[e].bot.x
                {
                    self.edges[e].reverse_horizontal();
                }
            } else if self.edges[e_start].bot.x != self.edges[e].bot.x {
                self.edges[e].reverse_horizontal();
            }
        }

        let e_start = e;
        if left_bound_is_forward {
            loop {
                let next = self.edges[result].next;
                if self.edges[result].top.y == self.edges[next].bot.y && !self.edges[next].skip {
                    result = next;
                } else {
                    break;
                }
            }
            let next = self.edges[result].next;
            if self.is_horz(result) && !self.edges[next].skip {
                // A top horizontal joins the bound only when the preceding
                // edge attaches to its left end.
                let mut horz = result;
                while self.is_horz(self.edges[horz].prev) {
                    horz = self.edges[horz].prev;
                }
                let horz_prev = self.edges[horz].prev;
                if self.edges[horz_prev].top.x > self.edges[next].top.x {
                    result = horz_prev;
                }
            }
            while e != result {
                let next = self.edges[e].next;
                self.edges[e].next_in_lml = next;
                self.fix_bound_horizontal(e, e_start, true);
                e = next;
            }
            self.fix_bound_horizontal(e, e_start, true);
            self.edges[result].next
        } else {
            loop {
                let prev = self.edges[result].prev;
                if self.edges[result].top.y == self.edges[prev].bot.y && !self.edges[prev].skip {
                    result = prev;
                } else {
                    break;
                }
            }
            let prev = self.edges[result].prev;
            if self.is_horz(result) && !self.edges[prev].skip {
                let mut horz = result;
                while self.is_horz(self.edges[horz].next) {
                    horz = self.edges[horz].next;
                }
                let horz_next = self.edges[horz].next;
                if self.edges[horz_next].top.x >= self.edges[prev].top.x {
                    result = horz_next;
                }
            }
            while e != result {
                let prev = self.edges[e].prev;
                self.edges[e].next_in_lml = prev;
                self.fix_bound_horizontal(e, e_start, false);
                e = prev;
            }
            self.fix_bound_horizontal(e, e_start, false);
            self.edges[result].prev
        }
    }

    /// Orients an inner horizontal so its bot attaches to the previous edge in the bound.
    fn fix_bound_horizontal(&mut self, e: EdgeIdx, e_start: EdgeIdx, forward: bool) {
        if !self.is_horz(e) || e == e_start {
            return;
        }
        let before = if forward { self.edges[e].prev } else { self.edges[e].next };
        if self.edges[e].bot.x != self.edges[before].top.x {
            self.edges[e].reverse_horizontal();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::path_from;

    #[test]
    fn square_yields_one_minimum() {
        let mut set = EdgeSet::new();
        let sq = path_from(&[(0, 0), (10, 0), (10, 10), (0, 10)]);
        assert_eq!(set.add_path(&sq, PolyType::Subject, true), Ok(true));
        assert_eq!(set.minima_count(), 1);
        let mut sb = Scanbeam::new();
        set.reset(&mut sb);
        assert_eq!(sb.pop(), Some(10));
        let lm = set.pop_local_minima(10).expect("minimum at y=10");
        assert_ne!(lm.left_bound, NONE);
        assert_ne!(lm.right_bound, NONE);
        let l = &set.edges[lm.left_bound];
        let r = &set.edges[lm.right_bound];
        assert_eq!(l.wind_delta, -r.wind_delta);
        assert!(!set.local_minima_pending());
    }

    #[test]
    fn degenerate_paths_are_dropped() {
        let mut set = EdgeSet::new();
        let line = path_from(&[(0, 0), (5, 5), (10, 10)]);
        assert_eq!(set.add_path(&line, PolyType::Subject, true), Ok(false));
        let dup = path_from(&[(3, 3), (3, 3), (3, 3)]);
        assert_eq!(set.add_path(&dup, PolyType::Subject, true), Ok(false));
        assert_eq!(set.add_path(&[], PolyType::Subject, false), Ok(false));
        assert_eq!(set.minima_count(), 0);
        assert!(set.edges.is_empty());
    }

    #[test]
    fn open_clip_paths_are_rejected() {
        let mut set = EdgeSet::new();
        let line = path_from(&[(0, 0), (10, 0)]);
        assert_eq!(set.add_path(&line, PolyType::Clip, false), Err(ClipError::OpenClipPath));
    }

    #[test]
    fn flat_open_path_becomes_single_bound() {
        let mut set = EdgeSet::new();
        let line = path_from(&[(0, 5), (10, 5), (20, 5)]);
        assert_eq!(set.add_path(&line, PolyType::Subject, false), Ok(true));
        assert!(set.has_open_paths);
        assert_eq!(set.minima_count(), 1);
        let mut sb = Scanbeam::new();
        set.reset(&mut sb);
        let lm = set.pop_local_minima(5).expect("flat minimum");
        assert_eq!(lm.left_bound, NONE);
        assert_eq!(set.edges[lm.right_bound].wind_delta, 0);
    }

    #[test]
    fn large_coordinates_switch_to_full_range() {
        let mut set = EdgeSet::new();
        let big = crate::geom::LO_RANGE * 4;
        let sq = path_from(&[(0, 0), (big, 0), (big, big), (0, big)]);
        assert_eq!(set.add_path(&sq, PolyType::Subject, true), Ok(true));
        assert!(set.use_full_range);
    }

    #[test]
    fn out_of_range_is_rejected_without_side_effects() {
        let mut set = EdgeSet::new();
        let bad = vec![IntPoint::new(0, 0), IntPoint::new(CInt::MAX, 0), IntPoint::new(0, 5)];
        assert!(matches!(
            set.add_path(&bad, PolyType::Subject, true),
            Err(ClipError::CoordinateOutOfRange { .. })
        ));
        assert!(set.edges.is_empty());
        assert!(!set.use_full_range);
    }

    #[test]
    fn bow_tie_produces_two_minima() {
        let mut set = EdgeSet::new();
        let bow = path_from(&[(0, 0), (10, 10), (10, 0), (0, 10)]);
        assert_eq!(set.add_path(&bow, PolyType::Subject, true), Ok(true));
        assert_eq!(set.minima_count(), 2);
    }
}
