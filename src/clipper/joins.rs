// Copyright 2025 Lars Brubaker
// License: MIT
//
// Join resolution.
//
// During the sweep, places where two output rings run along the same
// segment (or touch at a vertex in strictly-simple mode) are recorded as
// joins. After the sweep each join either merges two rings into one or
// splits one ring into two. Splits and merges keep the first-left forest
// (each ring's nearest enclosing ring) in step with the new geometry.

use log::trace;

use super::outrec::{OutPtIdx, OutRecIdx};
use super::Clipper;
use crate::arena::NONE;
use crate::geom::{locate_point, slopes_equal3, CInt, IntPoint, PointLocation};

#[derive(Copy, Clone, Debug)]
pub(crate) struct Join {
    pub out_pt1: OutPtIdx,
    pub out_pt2: OutPtIdx,
    pub off_pt: IntPoint,
}

/// Overlapping X range of two segments, if it has positive length.
fn get_overlap(a1: CInt, a2: CInt, b1: CInt, b2: CInt) -> Option<(CInt, CInt)> {
    let (a_lo, a_hi) = if a1 < a2 { (a1, a2) } else { (a2, a1) };
    let (b_lo, b_hi) = if b1 < b2 { (b1, b2) } else { (b2, b1) };
    let (left, right) = (a_lo.max(b_lo), a_hi.min(b_hi));
    if left < right {
        Some((left, right))
    } else {
        None
    }
}

impl Clipper {
    pub(super) fn add_join(&mut self, op1: OutPtIdx, op2: OutPtIdx, off_pt: IntPoint) {
        self.joins.push(Join { out_pt1: op1, out_pt2: op2, off_pt });
    }

    pub(super) fn add_ghost_join(&mut self, op: OutPtIdx, off_pt: IntPoint) {
        self.ghost_joins.push(Join { out_pt1: op, out_pt2: NONE, off_pt });
    }

    // ─────── Containment ──────────────────────────────────────────────────────

    /// Classifies `pt` against the ring at `start` with the ring's
    /// coordinates multiplied by `scale`.
    fn point_in_ring(&self, pt: IntPoint, start: OutPtIdx, scale: CInt) -> PointLocation {
        let pts = &self.out_pts;
        let mut op = start;
        let mut done = false;
        let scaled = move |p: IntPoint| IntPoint::new(p.x * scale, p.y * scale);
        let pairs = std::iter::from_fn(move || {
            if done {
                return None;
            }
            let prev = scaled(pts[pts[op].prev].pt);
            let curr = scaled(pts[op].pt);
            op = pts[op].next;
            done = op == start;
            Some((prev, curr))
        });
        locate_point(pt, pairs)
    }

    /// Whether ring `inner` lies inside ring `outer`, judged by its first
    /// vertex not on `outer`'s boundary.
    fn poly2_contains_poly1(&self, inner: OutPtIdx, outer: OutPtIdx) -> bool {
        let mut op = inner;
        loop {
            match self.point_in_ring(self.out_pts[op].pt, outer, 1) {
                PointLocation::OnBoundary => {}
                loc => return loc == PointLocation::Inside,
            }
            op = self.out_pts[op].next;
            if op == inner {
                return true;
            }
        }
    }

    /// Stricter form of `poly2_contains_poly1`: a ring whose every vertex
    /// lies on `outer`'s boundary is judged by its edge midpoints instead.
    fn ring_inside(&self, inner: OutPtIdx, outer: OutPtIdx) -> bool {
        let pts = &self.out_pts;
        let mut op = inner;
        loop {
            match self.point_in_ring(pts[op].pt, outer, 1) {
                PointLocation::OnBoundary => {}
                loc => return loc == PointLocation::Inside,
            }
            op = pts[op].next;
            if op == inner {
                break;
            }
        }
        loop {
            let (a, b) = (pts[op].pt, pts[pts[op].next].pt);
            match self.point_in_ring(IntPoint::new(a.x + b.x, a.y + b.y), outer, 2) {
                PointLocation::OnBoundary => {}
                loc => return loc == PointLocation::Inside,
            }
            op = pts[op].next;
            if op == inner {
                return false;
            }
        }
    }

    /// Skips first-left links to records that no longer own points.
    fn parse_first_left(&self, mut fl: OutRecIdx) -> OutRecIdx {
        while fl != NONE && self.out_recs[fl].pts == NONE {
            fl = self.out_recs[fl].first_left;
        }
        fl
    }

    // ─────── First-left maintenance ───────────────────────────────────────────

    /// After `old` was split into `old` and `new` side by side: records
    /// that sat in `old` but now lie in `new` move to `new`.
    fn fixup_first_lefts1(&mut self, old: OutRecIdx, new: OutRecIdx) {
        let new_pts = self.out_recs[new].pts;
        for r in self.out_recs.handles() {
            let rec = &self.out_recs[r];
            if rec.pts == NONE {
                continue;
            }
            let fl = self.parse_first_left(rec.first_left);
            if fl == old && self.poly2_contains_poly1(rec.pts, new_pts) {
                self.out_recs[r].first_left = new;
            }
        }
    }

    /// After a split left `inner` nested inside `outer`: records that sat
    /// in either (or in `outer`'s parent) are reassigned by containment.
    fn fixup_first_lefts2(&mut self, inner: OutRecIdx, outer: OutRecIdx) {
        let orig_fl = self.out_recs[outer].first_left;
        let (inner_pts, outer_pts) = (self.out_recs[inner].pts, self.out_recs[outer].pts);
        for r in self.out_recs.handles() {
            let rec = &self.out_recs[r];
            if rec.pts == NONE || r == outer || r == inner {
                continue;
            }
            let (pts, first_left) = (rec.pts, rec.first_left);
            let fl = self.parse_first_left(first_left);
            if fl != orig_fl && fl != inner && fl != outer {
                continue;
            }
            if self.poly2_contains_poly1(pts, inner_pts) {
                self.out_recs[r].first_left = inner;
            } else if self.poly2_contains_poly1(pts, outer_pts) {
                self.out_recs[r].first_left = outer;
            } else if first_left == inner || first_left == outer {
                self.out_recs[r].first_left = orig_fl;
            }
        }
    }

    /// After `old` merged into `new`: every record that sat in `old` sits in `new`.
    fn fixup_first_lefts3(&mut self, old: OutRecIdx, new: OutRecIdx) {
        for r in self.out_recs.handles() {
            let rec = &self.out_recs[r];
            if rec.pts != NONE && self.parse_first_left(rec.first_left) == old {
                self.out_recs[r].first_left = new;
            }
        }
    }

    /// Settles hole state and nesting after ring `r1` was split, leaving
    /// the other half in the fresh record `r2`. With `orient`, a ring whose
    /// hole state flipped is reversed to match.
    fn split_reparent(&mut self, r1: OutRecIdx, r2: OutRecIdx, orient: bool) {
        let reverse = self.options.reverse_solution;
        let (p1, p2) = (self.out_recs[r1].pts, self.out_recs[r2].pts);

        if self.poly2_contains_poly1(p2, p1) {
            // r2 nested in r1.
            self.out_recs[r2].is_hole = !self.out_recs[r1].is_hole;
            self.out_recs[r2].first_left = r1;
            self.fixup_first_lefts2(r2, r1);
            if orient && (self.out_recs[r2].is_hole ^ reverse) == (self.ring_area(p2) > 0.0) {
                self.reverse_ring(p2);
            }
        } else if self.poly2_contains_poly1(p1, p2) {
            // r1 nested in r2.
            self.out_recs[r2].is_hole = self.out_recs[r1].is_hole;
            self.out_recs[r1].is_hole = !self.out_recs[r2].is_hole;
            self.out_recs[r2].first_left = self.out_recs[r1].first_left;
            self.out_recs[r1].first_left = r2;
            self.fixup_first_lefts2(r1, r2);
            if orient && (self.out_recs[r1].is_hole ^ reverse) == (self.ring_area(p1) > 0.0) {
                self.reverse_ring(p1);
            }
        } else {
            // Side by side.
            self.out_recs[r2].is_hole = self.out_recs[r1].is_hole;
            self.out_recs[r2].first_left = self.out_recs[r1].first_left;
            self.fixup_first_lefts1(r1, r2);
        }
    }

    // ─────── Resolving joins ──────────────────────────────────────────────────

    pub(super) fn join_common_edges(&mut self) {
        for i in 0..self.joins.len() {
            let mut join = self.joins[i];
            let r1 = self.get_out_rec(self.out_pts[join.out_pt1].idx);
            let r2 = self.get_out_rec(self.out_pts[join.out_pt2].idx);

            if self.out_recs[r1].pts == NONE || self.out_recs[r2].pts == NONE {
                continue;
            }
            if self.out_recs[r1].is_open || self.out_recs[r2].is_open {
                continue;
            }

            // Pick the fragment whose hole state is right before JoinPoints moves points around.
            let hole_state = self.hole_state_rec(r1, r2);

            if !self.join_points(&mut join, r1, r2) {
                continue;
            }

            if r1 == r2 {
                // One ring became two.
                self.out_recs[r1].pts = join.out_pt1;
                self.out_recs[r1].bottom_pt = NONE;
                let r2 = self.create_out_rec();
                self.out_recs[r2].pts = join.out_pt2;
                self.update_out_pt_idxs(r2);
                self.split_reparent(r1, r2, true);
                trace!("join split record {} into {}", r1, r2);
            } else {
                // Two rings became one.
                self.out_recs[r2].pts = NONE;
                self.out_recs[r2].bottom_pt = NONE;
                self.out_recs[r2].idx = r1;
                self.out_recs[r1].is_hole = self.out_recs[hole_state].is_hole;
                if hole_state == r2 {
                    self.out_recs[r1].first_left = self.out_recs[r2].first_left;
                }
                self.out_recs[r2].first_left = r1;
                self.fixup_first_lefts3(r2, r1);
                trace!("join merged record {} into {}", r2, r1);
            }
        }
    }

    /// Next point along the ring from `op` (forward or backward) whose
    /// position differs from `op`'s, or `op` itself when none does.
    fn next_distinct(&self, op: OutPtIdx, forward: bool) -> OutPtIdx {
        let at = self.out_pts[op].pt;
        let step = |p: OutPtIdx| if forward { self.out_pts[p].next } else { self.out_pts[p].prev };
        let mut p = step(op);
        while p != op && self.out_pts[p].pt == at {
            p = step(p);
        }
        p
    }

    /// Cross-links the rings at `op1` and `op2` so they share a seam,
    /// returning the duplicate of `op1` that ends up on the other side.
    fn splice_at(&mut self, op1: OutPtIdx, op2: OutPtIdx, reverse1: bool) -> OutPtIdx {
        let op1b = self.dup_out_pt(op1, !reverse1);
        let op2b = self.dup_out_pt(op2, reverse1);
        let pts = &mut self.out_pts;
        if reverse1 {
            pts[op1].prev = op2;
            pts[op2].next = op1;
            pts[op1b].next = op2b;
            pts[op2b].prev = op1b;
        } else {
            pts[op1].next = op2;
            pts[op2].prev = op1;
            pts[op1b].prev = op2b;
            pts[op2b].next = op1b;
        }
        op1b
    }

    /// Applies one join. There are three kinds:
    ///
    /// 1. horizontal joins, where both points lie anywhere along collinear
    ///    horizontal runs and the offset point shares their Y;
    /// 2. sloped joins, where both points sit at the bottom of the shared
    ///    segment and the offset point lies above;
    /// 3. strictly-simple joins, where the rings merely touch and all three
    ///    points coincide.
    fn join_points(&mut self, j: &mut Join, r1: OutRecIdx, r2: OutRecIdx) -> bool {
        let mut op1 = j.out_pt1;
        let mut op2 = j.out_pt2;
        let off = j.off_pt;
        let pt = |s: &Self, p: OutPtIdx| s.out_pts[p].pt;
        let is_horizontal = pt(self, op1).y == off.y;

        if is_horizontal && off == pt(self, op1) && off == pt(self, op2) {
            if r1 != r2 {
                return false;
            }
            let op1b = self.next_distinct(op1, true);
            let reverse1 = pt(self, op1b).y > off.y;
            let op2b = self.next_distinct(op2, true);
            let reverse2 = pt(self, op2b).y > off.y;
            if reverse1 == reverse2 {
                return false;
            }
            let op1b = self.splice_at(op1, op2, reverse1);
            j.out_pt1 = op1;
            j.out_pt2 = op1b;
            return true;
        }

        if is_horizontal {
            // Where the runs overlap is not yet known; find each run's extent.
            let mut op1b = op1;
            while pt(self, self.out_pts[op1].prev).y == pt(self, op1).y
                && self.out_pts[op1].prev != op1b
                && self.out_pts[op1].prev != op2
            {
                op1 = self.out_pts[op1].prev;
            }
            while pt(self, self.out_pts[op1b].next).y == pt(self, op1b).y
                && self.out_pts[op1b].next != op1
                && self.out_pts[op1b].next != op2
            {
                op1b = self.out_pts[op1b].next;
            }
            if self.out_pts[op1b].next == op1 || self.out_pts[op1b].next == op2 {
                return false; // a flat ring
            }

            let mut op2b = op2;
            while pt(self, self.out_pts[op2].prev).y == pt(self, op2).y
                && self.out_pts[op2].prev != op2b
                && self.out_pts[op2].prev != op1b
            {
                op2 = self.out_pts[op2].prev;
            }
            while pt(self, self.out_pts[op2b].next).y == pt(self, op2b).y
                && self.out_pts[op2b].next != op2
                && self.out_pts[op2b].next != op1
            {
                op2b = self.out_pts[op2b].next;
            }
            if self.out_pts[op2b].next == op2 || self.out_pts[op2b].next == op1 {
                return false;
            }

            let (a1, a1b, a2, a2b) = (pt(self, op1), pt(self, op1b), pt(self, op2), pt(self, op2b));
            let Some((left, right)) = get_overlap(a1.x, a1b.x, a2.x, a2b.x) else {
                return false;
            };

            // Joining overlapping runs leaves a spike to discard. Neither op1
            // nor op2 may end up on the discarded side: later joins may need them.
            let within = |x: CInt| x >= left && x <= right;
            let (join_pt, discard_left) = if within(a1.x) {
                (a1, a1.x > a1b.x)
            } else if within(a2.x) {
                (a2, a2.x > a2b.x)
            } else if within(a1b.x) {
                (a1b, a1b.x > a1.x)
            } else {
                (a2b, a2b.x > a2.x)
            };
            j.out_pt1 = op1;
            j.out_pt2 = op2;
            return self.join_horz(op1, op1b, op2, op2b, join_pt, discard_left);
        }

        // Sloped join: both points share a Y below the offset point.
        // Walk each ring in whichever direction heads up towards it.
        let full = self.use_full_range();
        let heads_up = |s: &Self, from: OutPtIdx, to: OutPtIdx| {
            pt(s, to).y <= pt(s, from).y && slopes_equal3(pt(s, from), pt(s, to), off, full)
        };

        let mut op1b = self.next_distinct(op1, true);
        let reverse1 = !heads_up(self, op1, op1b);
        if reverse1 {
            op1b = self.next_distinct(op1, false);
            if !heads_up(self, op1, op1b) {
                return false;
            }
        }
        let mut op2b = self.next_distinct(op2, true);
        let reverse2 = !heads_up(self, op2, op2b);
        if reverse2 {
            op2b = self.next_distinct(op2, false);
            if !heads_up(self, op2, op2b) {
                return false;
            }
        }

        if op1b == op1 || op2b == op2 || op1b == op2b || (r1 == r2 && reverse1 == reverse2) {
            return false;
        }

        let op1b = self.splice_at(op1, op2, reverse1);
        j.out_pt1 = op1;
        j.out_pt2 = op1b;
        true
    }

    /// Walks `op` along its horizontal run to `pt` and duplicates it there.
    /// Returns the (possibly moved) anchor and its duplicate.
    fn horz_anchor(&mut self, mut op: OutPtIdx, pt: IntPoint, left_to_right: bool, discard_left: bool) -> (OutPtIdx, OutPtIdx) {
        let after = if left_to_right { !discard_left } else { discard_left };
        loop {
            let here = self.out_pts[op].pt;
            let next = self.out_pts[self.out_pts[op].next].pt;
            let advance = if left_to_right {
                next.x <= pt.x && next.x >= here.x && next.y == pt.y
            } else {
                next.x >= pt.x && next.x <= here.x && next.y == pt.y
            };
            if !advance {
                break;
            }
            op = self.out_pts[op].next;
        }
        if discard_left == left_to_right && self.out_pts[op].pt.x != pt.x {
            op = self.out_pts[op].next;
        }
        let mut dup = self.dup_out_pt(op, after);
        if self.out_pts[dup].pt != pt {
            op = dup;
            self.out_pts[op].pt = pt;
            dup = self.dup_out_pt(op, after);
        }
        (op, dup)
    }

    fn join_horz(
        &mut self,
        op1: OutPtIdx,
        op1b: OutPtIdx,
        op2: OutPtIdx,
        op2b: OutPtIdx,
        pt: IntPoint,
        discard_left: bool,
    ) -> bool {
        let ltr1 = self.out_pts[op1].pt.x <= self.out_pts[op1b].pt.x;
        let ltr2 = self.out_pts[op2].pt.x <= self.out_pts[op2b].pt.x;
        if ltr1 == ltr2 {
            return false;
        }

        // With discard_left, each duplicate goes left of its anchor; otherwise right.
        let (op1, op1b) = self.horz_anchor(op1, pt, ltr1, discard_left);
        let (op2, op2b) = self.horz_anchor(op2, pt, ltr2, discard_left);

        let pts = &mut self.out_pts;
        if ltr1 == discard_left {
            pts[op1].prev = op2;
            pts[op2].next = op1;
            pts[op1b].next = op2b;
            pts[op2b].prev = op1b;
        } else {
            pts[op1].next = op2;
            pts[op2].prev = op1;
            pts[op1b].prev = op2b;
            pts[op2b].next = op1b;
        }
        true
    }

    // ─────── Strictly simple ──────────────────────────────────────────────────

    /// Splits every ring at each vertex it revisits.
    pub(super) fn do_simple_polygons(&mut self) {
        let mut i = 0;
        while (i as usize) < self.out_recs.len() {
            let rec = i;
            i += 1;
            let start = self.out_recs[rec].pts;
            if start == NONE || self.out_recs[rec].is_open {
                continue;
            }
            let mut op = start;
            loop {
                let mut op2 = self.out_pts[op].next;
                while op2 != self.out_recs[rec].pts {
                    let (o, o2) = (&self.out_pts[op], &self.out_pts[op2]);
                    if o.pt == o2.pt && o2.next != op && o2.prev != op {
                        // Split at the repeated vertex.
                        let op3 = o.prev;
                        let op4 = o2.prev;
                        let pts = &mut self.out_pts;
                        pts[op].prev = op4;
                        pts[op4].next = op;
                        pts[op2].prev = op3;
                        pts[op3].next = op2;

                        self.out_recs[rec].pts = op;
                        let rec2 = self.create_out_rec();
                        self.out_recs[rec2].pts = op2;
                        self.update_out_pt_idxs(rec2);
                        self.split_reparent(rec, rec2, false);
                        trace!("split self-touching record {} at ({}, {})", rec, self.out_pts[op].pt.x, self.out_pts[op].pt.y);
                        op2 = op;
                    }
                    op2 = self.out_pts[op2].next;
                }
                op = self.out_pts[op].next;
                if op == self.out_recs[rec].pts {
                    break;
                }
            }
        }
    }

    /// Re-derives hole state and first-left links from ring geometry: each
    /// closed ring hangs under the smallest live ring that contains it.
    /// Splits at touching vertices can leave pieces whose recorded nesting
    /// no longer matches where they lie.
    pub(super) fn settle_nesting(&mut self) {
        let reverse = self.options.reverse_solution;
        let rings: Vec<(OutRecIdx, f64)> = self
            .out_recs
            .handles()
            .filter(|&r| self.out_recs[r].pts != NONE && !self.out_recs[r].is_open)
            .map(|r| (r, self.ring_area(self.out_recs[r].pts)))
            .collect();

        for &(r, r_area) in &rings {
            let inner = self.out_recs[r].pts;
            let mut parent = NONE;
            let mut parent_size = f64::INFINITY;
            for &(s, s_area) in &rings {
                let size = s_area.abs();
                if s == r || size <= r_area.abs() || size >= parent_size {
                    continue;
                }
                if self.ring_inside(inner, self.out_recs[s].pts) {
                    parent = s;
                    parent_size = size;
                }
            }
            let rec = &mut self.out_recs[r];
            rec.first_left = parent;
            rec.is_hole = (r_area > 0.0) == reverse;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::get_overlap;

    #[test]
    fn overlap_requires_positive_length() {
        assert_eq!(get_overlap(0, 10, 5, 20), Some((5, 10)));
        assert_eq!(get_overlap(10, 0, 20, 5), Some((5, 10)));
        assert_eq!(get_overlap(0, 5, 5, 10), None);
        assert_eq!(get_overlap(0, 2, 3, 4), None);
    }
}
