// Copyright 2025 Lars Brubaker
// License: MIT
//
// Output rings.
//
// Each OutRec owns a circular doubly linked ring of OutPts. During the sweep
// a ring is fed from two ends: the edge on its Left side prepends points
// (moving `pts`), the Right side appends before `pts`. When two rings meet
// at a local maximum they are spliced and the absorbed record redirects to
// the survivor through `idx`.

use super::Clipper;
use crate::arena::{Handle, NONE};
use crate::edge::{EdgeIdx, EdgeSide, HORIZONTAL};
use crate::geom::{slopes_equal4, IntPoint};

pub(crate) type OutRecIdx = Handle;
pub(crate) type OutPtIdx = Handle;

#[derive(Clone, Debug)]
pub(crate) struct OutRec {
    /// Self for a live record; after a merge, the record it was merged into.
    pub idx: OutRecIdx,
    pub is_hole: bool,
    pub is_open: bool,
    /// Nearest enclosing record (the first-left forest).
    pub first_left: OutRecIdx,
    pub pts: OutPtIdx,
    pub bottom_pt: OutPtIdx,
    /// Tree node built for this record, when producing a PolyTree.
    pub node: Option<usize>,
}

#[derive(Clone, Debug)]
pub(crate) struct OutPt {
    pub idx: OutRecIdx,
    pub pt: IntPoint,
    pub next: OutPtIdx,
    pub prev: OutPtIdx,
}

fn get_dx(a: IntPoint, b: IntPoint) -> f64 {
    if a.y == b.y {
        HORIZONTAL
    } else {
        (b.x - a.x) as f64 / (b.y - a.y) as f64
    }
}

impl Clipper {
    // ─────── Allocation ───────────────────────────────────────────────────────

    pub(super) fn create_out_rec(&mut self) -> OutRecIdx {
        let r = self.out_recs.alloc(OutRec {
            idx: NONE,
            is_hole: false,
            is_open: false,
            first_left: NONE,
            pts: NONE,
            bottom_pt: NONE,
            node: None,
        });
        self.out_recs[r].idx = r;
        r
    }

    fn new_out_pt(&mut self, rec: OutRecIdx, pt: IntPoint, next: OutPtIdx, prev: OutPtIdx) -> OutPtIdx {
        let op = self.out_pts.alloc(OutPt { idx: rec, pt, next, prev });
        if next == NONE {
            self.out_pts[op].next = op;
            self.out_pts[op].prev = op;
        }
        op
    }

    /// Inserts a copy of `op` right after (or before) it.
    pub(super) fn dup_out_pt(&mut self, op: OutPtIdx, insert_after: bool) -> OutPtIdx {
        let src = self.out_pts[op].clone();
        if insert_after {
            let n = self.new_out_pt(src.idx, src.pt, src.next, op);
            self.out_pts[src.next].prev = n;
            self.out_pts[op].next = n;
            n
        } else {
            let n = self.new_out_pt(src.idx, src.pt, op, src.prev);
            self.out_pts[src.prev].next = n;
            self.out_pts[op].prev = n;
            n
        }
    }

    /// Follows merge redirects to the live record.
    pub(super) fn get_out_rec(&self, mut r: OutRecIdx) -> OutRecIdx {
        while self.out_recs[r].idx != r {
            r = self.out_recs[r].idx;
        }
        r
    }

    // ─────── Feeding rings ────────────────────────────────────────────────────

    /// Adds `pt` to the ring fed by `e`, opening a new ring when `e` has none.
    pub(super) fn add_out_pt(&mut self, e: EdgeIdx, pt: IntPoint) -> OutPtIdx {
        let out_idx = self.edge(e).out_idx;
        if out_idx == NONE {
            let rec = self.create_out_rec();
            let is_open = self.edge(e).wind_delta == 0;
            self.out_recs[rec].is_open = is_open;
            let op = self.new_out_pt(rec, pt, NONE, NONE);
            self.out_recs[rec].pts = op;
            if !is_open {
                self.set_hole_state(e, rec);
            }
            self.edge_mut(e).out_idx = rec;
            return op;
        }

        let rec_idx = self.out_recs[out_idx].idx;
        let first = self.out_recs[out_idx].pts;
        let last = self.out_pts[first].prev;
        let to_front = self.edge(e).side == EdgeSide::Left;
        if to_front && pt == self.out_pts[first].pt {
            return first;
        }
        if !to_front && pt == self.out_pts[last].pt {
            return last;
        }

        let op = self.new_out_pt(rec_idx, pt, first, last);
        self.out_pts[last].next = op;
        self.out_pts[first].prev = op;
        if to_front {
            self.out_recs[out_idx].pts = op;
        }
        op
    }

    pub(super) fn get_last_out_pt(&self, e: EdgeIdx) -> OutPtIdx {
        let edge = self.edge(e);
        let first = self.out_recs[edge.out_idx].pts;
        if edge.side == EdgeSide::Left {
            first
        } else {
            self.out_pts[first].prev
        }
    }

    /// A new ring is a hole when an odd number of distinct rings lie to its left.
    fn set_hole_state(&mut self, e: EdgeIdx, rec: OutRecIdx) {
        let mut e2 = self.edge(e).prev_in_ael;
        let mut tmp = NONE;
        while e2 != NONE {
            let edge = self.edge(e2);
            if edge.out_idx != NONE && edge.wind_delta != 0 {
                if tmp == NONE {
                    tmp = e2;
                } else if self.edge(tmp).out_idx == edge.out_idx {
                    tmp = NONE;
                }
            }
            e2 = edge.prev_in_ael;
        }
        if tmp == NONE {
            self.out_recs[rec].first_left = NONE;
            self.out_recs[rec].is_hole = false;
        } else {
            let fl = self.edge(tmp).out_idx;
            self.out_recs[rec].first_left = fl;
            self.out_recs[rec].is_hole = !self.out_recs[fl].is_hole;
        }
    }

    /// Starts a ring at a local minimum shared by `e1` and `e2`.
    pub(super) fn add_local_min_poly(&mut self, e1: EdgeIdx, e2: EdgeIdx, pt: IntPoint) -> OutPtIdx {
        let (result, e, prev_e);
        if self.edge(e2).is_horizontal() || self.edge(e1).dx > self.edge(e2).dx {
            result = self.add_out_pt(e1, pt);
            self.edge_mut(e2).out_idx = self.edge(e1).out_idx;
            self.edge_mut(e1).side = EdgeSide::Left;
            self.edge_mut(e2).side = EdgeSide::Right;
            e = e1;
            let p = self.edge(e).prev_in_ael;
            prev_e = if p == e2 { self.edge(e2).prev_in_ael } else { p };
        } else {
            result = self.add_out_pt(e2, pt);
            self.edge_mut(e1).out_idx = self.edge(e2).out_idx;
            self.edge_mut(e1).side = EdgeSide::Right;
            self.edge_mut(e2).side = EdgeSide::Left;
            e = e2;
            let p = self.edge(e).prev_in_ael;
            prev_e = if p == e1 { self.edge(e1).prev_in_ael } else { p };
        }

        if prev_e != NONE
            && self.edge(prev_e).out_idx != NONE
            && self.edge(prev_e).top.y < pt.y
            && self.edge(e).top.y < pt.y
        {
            let x_prev = self.edge(prev_e).top_x(pt.y);
            let x_e = self.edge(e).top_x(pt.y);
            let (pe, ee) = (self.edge(prev_e), self.edge(e));
            if x_prev == x_e
                && ee.wind_delta != 0
                && pe.wind_delta != 0
                && slopes_equal4(
                    IntPoint::new(x_prev, pt.y),
                    pe.top,
                    IntPoint::new(x_e, pt.y),
                    ee.top,
                    self.use_full_range(),
                )
            {
                let top = ee.top;
                let op = self.add_out_pt(prev_e, pt);
                self.add_join(result, op, top);
            }
        }
        result
    }

    /// Closes the rings of two bounds meeting at a local maximum.
    pub(super) fn add_local_max_poly(&mut self, e1: EdgeIdx, e2: EdgeIdx, pt: IntPoint) {
        self.add_out_pt(e1, pt);
        if self.edge(e2).wind_delta == 0 {
            self.add_out_pt(e2, pt);
        }
        let (o1, o2) = (self.edge(e1).out_idx, self.edge(e2).out_idx);
        if o1 == o2 {
            self.edge_mut(e1).out_idx = NONE;
            self.edge_mut(e2).out_idx = NONE;
        } else if o1 < o2 {
            self.append_polygon(e1, e2);
        } else {
            self.append_polygon(e2, e1);
        }
    }

    // ─────── Ring geometry ────────────────────────────────────────────────────

    pub(super) fn point_count(&self, start: OutPtIdx) -> usize {
        if start == NONE {
            return 0;
        }
        let mut n = 0;
        let mut p = start;
        loop {
            n += 1;
            p = self.out_pts[p].next;
            if p == start {
                break;
            }
        }
        n
    }

    /// Signed area of a ring, positive when the emitted contour is counter-clockwise.
    pub(super) fn ring_area(&self, start: OutPtIdx) -> f64 {
        if start == NONE {
            return 0.0;
        }
        let mut a = 0.0;
        let mut op = start;
        loop {
            let prev = self.out_pts[self.out_pts[op].prev].pt;
            let pt = self.out_pts[op].pt;
            a += (prev.x as f64 + pt.x as f64) * (prev.y as f64 - pt.y as f64);
            op = self.out_pts[op].next;
            if op == start {
                break;
            }
        }
        a * 0.5
    }

    pub(super) fn reverse_ring(&mut self, start: OutPtIdx) {
        if start == NONE {
            return;
        }
        let mut pp = start;
        loop {
            let p = &mut self.out_pts[pp];
            std::mem::swap(&mut p.next, &mut p.prev);
            pp = p.prev;
            if pp == start {
                break;
            }
        }
    }

    fn first_is_bottom_pt(&self, btm1: OutPtIdx, btm2: OutPtIdx) -> bool {
        let pts = &self.out_pts;
        let spread = |btm: OutPtIdx| {
            let at = pts[btm].pt;
            let mut p = pts[btm].prev;
            while pts[p].pt == at && p != btm {
                p = pts[p].prev;
            }
            let dx_prev = get_dx(at, pts[p].pt).abs();
            p = pts[btm].next;
            while pts[p].pt == at && p != btm {
                p = pts[p].next;
            }
            let dx_next = get_dx(at, pts[p].pt).abs();
            (dx_prev, dx_next)
        };
        let (p1, n1) = spread(btm1);
        let (p2, n2) = spread(btm2);
        if p1.max(n1) == p2.max(n2) && p1.min(n1) == p2.min(n2) {
            self.ring_area(btm1) > 0.0
        } else {
            (p1 >= p2 && p1 >= n2) || (n1 >= p2 && n1 >= n2)
        }
    }

    /// The lowest (largest Y, then smallest X) point of a ring.
    fn get_bottom_pt(&self, start: OutPtIdx) -> OutPtIdx {
        let pts = &self.out_pts;
        let mut pp = start;
        let mut dups = NONE;
        let mut p = pts[pp].next;
        while p != pp {
            let (a, b) = (pts[p].pt, pts[pp].pt);
            if a.y > b.y {
                pp = p;
                dups = NONE;
            } else if a.y == b.y && a.x <= b.x {
                if a.x < b.x {
                    dups = NONE;
                    pp = p;
                } else if pts[p].next != pp && pts[p].prev != pp {
                    dups = p;
                }
            }
            p = pts[p].next;
        }
        if dups != NONE {
            // Several vertices share the bottom point; pick the most outward one.
            let stop = p;
            while dups != stop {
                if !self.first_is_bottom_pt(p, dups) {
                    pp = dups;
                }
                dups = pts[dups].next;
                while pts[dups].pt != pts[pp].pt {
                    dups = pts[dups].next;
                }
            }
        }
        pp
    }

    fn get_lowermost_rec(&mut self, r1: OutRecIdx, r2: OutRecIdx) -> OutRecIdx {
        for r in [r1, r2] {
            if self.out_recs[r].bottom_pt == NONE {
                let b = self.get_bottom_pt(self.out_recs[r].pts);
                self.out_recs[r].bottom_pt = b;
            }
        }
        let (b1, b2) = (self.out_recs[r1].bottom_pt, self.out_recs[r2].bottom_pt);
        let (p1, p2) = (self.out_pts[b1].pt, self.out_pts[b2].pt);
        if p1.y > p2.y {
            r1
        } else if p1.y < p2.y {
            r2
        } else if p1.x < p2.x {
            r1
        } else if p1.x > p2.x {
            r2
        } else if self.out_pts[b1].next == b1 {
            r2
        } else if self.out_pts[b2].next == b2 {
            r1
        } else if self.first_is_bottom_pt(b1, b2) {
            r1
        } else {
            r2
        }
    }

    /// Whether `r2` is an ancestor of `r1` in the first-left forest.
    fn outrec1_right_of_outrec2(&self, mut r1: OutRecIdx, r2: OutRecIdx) -> bool {
        loop {
            r1 = self.out_recs[r1].first_left;
            if r1 == r2 {
                return true;
            }
            if r1 == NONE {
                return false;
            }
        }
    }

    /// The record whose hole state survives when `r1` and `r2` merge.
    pub(super) fn hole_state_rec(&mut self, r1: OutRecIdx, r2: OutRecIdx) -> OutRecIdx {
        if r1 == r2 {
            r1
        } else if self.outrec1_right_of_outrec2(r1, r2) {
            r2
        } else if self.outrec1_right_of_outrec2(r2, r1) {
            r1
        } else {
            self.get_lowermost_rec(r1, r2)
        }
    }

    /// Splices `e2`'s ring onto `e1`'s; `e2`'s record redirects to `e1`'s.
    fn append_polygon(&mut self, e1: EdgeIdx, e2: EdgeIdx) {
        let r1 = self.edge(e1).out_idx;
        let r2 = self.edge(e2).out_idx;
        let hole_state = self.hole_state_rec(r1, r2);

        let p1_lft = self.out_recs[r1].pts;
        let p1_rt = self.out_pts[p1_lft].prev;
        let p2_lft = self.out_recs[r2].pts;
        let p2_rt = self.out_pts[p2_lft].prev;

        let (side1, side2) = (self.edge(e1).side, self.edge(e2).side);
        if side1 == side2 {
            self.reverse_ring(p2_lft);
        }
        let pts = &mut self.out_pts;
        match (side1, side2) {
            (EdgeSide::Left, EdgeSide::Left) => {
                // z y x a b c
                pts[p2_lft].next = p1_lft;
                pts[p1_lft].prev = p2_lft;
                pts[p1_rt].next = p2_rt;
                pts[p2_rt].prev = p1_rt;
                self.out_recs[r1].pts = p2_rt;
            }
            (EdgeSide::Left, EdgeSide::Right) => {
                // x y z a b c
                pts[p2_rt].next = p1_lft;
                pts[p1_lft].prev = p2_rt;
                pts[p2_lft].prev = p1_rt;
                pts[p1_rt].next = p2_lft;
                self.out_recs[r1].pts = p2_lft;
            }
            (EdgeSide::Right, EdgeSide::Right) => {
                // a b c z y x
                pts[p1_rt].next = p2_rt;
                pts[p2_rt].prev = p1_rt;
                pts[p2_lft].next = p1_lft;
                pts[p1_lft].prev = p2_lft;
            }
            (EdgeSide::Right, EdgeSide::Left) => {
                // a b c x y z
                pts[p1_rt].next = p2_lft;
                pts[p2_lft].prev = p1_rt;
                pts[p1_lft].prev = p2_rt;
                pts[p2_rt].next = p1_lft;
            }
        }

        self.out_recs[r1].bottom_pt = NONE;
        if hole_state == r2 {
            if self.out_recs[r2].first_left != r1 {
                self.out_recs[r1].first_left = self.out_recs[r2].first_left;
            }
            self.out_recs[r1].is_hole = self.out_recs[r2].is_hole;
        }
        let rec2 = &mut self.out_recs[r2];
        rec2.pts = NONE;
        rec2.bottom_pt = NONE;
        rec2.first_left = r1;

        self.edge_mut(e1).out_idx = NONE;
        self.edge_mut(e2).out_idx = NONE;

        // The edge still feeding the absorbed ring now feeds the survivor.
        let mut e = self.active_edges;
        while e != NONE {
            if self.edge(e).out_idx == r2 {
                let edge = self.edge_mut(e);
                edge.out_idx = r1;
                edge.side = side1;
                break;
            }
            e = self.edge(e).next_in_ael;
        }
        self.out_recs[r2].idx = self.out_recs[r1].idx;
    }

    pub(super) fn update_out_pt_idxs(&mut self, rec: OutRecIdx) {
        let start = self.out_recs[rec].pts;
        let mut op = start;
        loop {
            self.out_pts[op].idx = rec;
            op = self.out_pts[op].prev;
            if op == start {
                break;
            }
        }
    }
}
