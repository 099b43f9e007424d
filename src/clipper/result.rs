// Copyright 2025 Lars Brubaker
// License: MIT
//
// Ring cleanup and result building.

use super::outrec::OutRecIdx;
use super::Clipper;
use crate::arena::NONE;
use crate::geom::{pt2_is_between_pt1_and_pt3, slopes_equal3, Path, Paths};
use crate::polytree::PolyTree;

impl Clipper {
    /// Drops consecutive duplicate points from an open ring.
    pub(super) fn fixup_out_polyline(&mut self, rec: OutRecIdx) {
        let pts = &mut self.out_pts;
        let mut pp = self.out_recs[rec].pts;
        let mut last = pts[pp].prev;
        while pp != last {
            pp = pts[pp].next;
            let prev = pts[pp].prev;
            if pts[pp].pt == pts[prev].pt {
                if pp == last {
                    last = prev;
                }
                let next = pts[pp].next;
                pts[prev].next = next;
                pts[next].prev = prev;
                pp = prev;
            }
        }
        if pp == pts[pp].prev {
            self.out_recs[rec].pts = NONE;
        }
    }

    /// Removes duplicate points and collinear vertices (keeping collinear
    /// pass-through vertices when asked). Rings that collapse below three
    /// points are emptied.
    pub(super) fn fixup_out_polygon(&mut self, rec: OutRecIdx) {
        let preserve = self.options.preserve_collinear || self.options.strictly_simple;
        let full = self.use_full_range();
        let pts = &mut self.out_pts;
        let mut last_ok = NONE;
        self.out_recs[rec].bottom_pt = NONE;
        let mut pp = self.out_recs[rec].pts;
        loop {
            let (prev, next) = (pts[pp].prev, pts[pp].next);
            if prev == pp || prev == next {
                self.out_recs[rec].pts = NONE;
                return;
            }
            let (a, b, c) = (pts[prev].pt, pts[pp].pt, pts[next].pt);
            if b == c || b == a || (slopes_equal3(a, b, c, full) && (!preserve || !pt2_is_between_pt1_and_pt3(a, b, c))) {
                last_ok = NONE;
                pts[prev].next = next;
                pts[next].prev = prev;
                pp = prev;
            } else if pp == last_ok {
                break;
            } else {
                if last_ok == NONE {
                    last_ok = pp;
                }
                pp = next;
            }
        }
        self.out_recs[rec].pts = pp;
    }

    /// Points a record's first_left at its nearest live ancestor of the
    /// opposite hole state.
    fn fix_hole_linkage(&mut self, rec: OutRecIdx) {
        let (first_left, is_hole) = (self.out_recs[rec].first_left, self.out_recs[rec].is_hole);
        if first_left == NONE {
            return;
        }
        let fl = &self.out_recs[first_left];
        if is_hole != fl.is_hole && fl.pts != NONE {
            return;
        }
        let mut orfl = first_left;
        while orfl != NONE && (self.out_recs[orfl].is_hole == is_hole || self.out_recs[orfl].pts == NONE) {
            orfl = self.out_recs[orfl].first_left;
        }
        self.out_recs[rec].first_left = orfl;
    }

    fn contour_of(&self, rec: OutRecIdx, cnt: usize) -> Path {
        let mut path = Vec::with_capacity(cnt);
        let mut pp = self.out_pts[self.out_recs[rec].pts].prev;
        for _ in 0..cnt {
            path.push(self.out_pts[pp].pt);
            pp = self.out_pts[pp].prev;
        }
        path
    }

    pub(super) fn build_result(&self) -> Paths {
        let mut paths = Vec::with_capacity(self.out_recs.len());
        for r in self.out_recs.handles() {
            let rec = &self.out_recs[r];
            let cnt = self.point_count(rec.pts);
            if cnt < 2 || (!rec.is_open && cnt < 3) {
                continue;
            }
            paths.push(self.contour_of(r, cnt));
        }
        paths
    }

    pub(super) fn build_result_tree(&mut self) -> PolyTree {
        let mut tree = PolyTree::new();

        for r in self.out_recs.handles() {
            let rec = &self.out_recs[r];
            let cnt = self.point_count(rec.pts);
            if (rec.is_open && cnt < 2) || (!rec.is_open && cnt < 3) {
                continue;
            }
            let is_open = rec.is_open;
            self.fix_hole_linkage(r);
            let node = tree.add_node(self.contour_of(r, cnt), is_open);
            self.out_recs[r].node = Some(node);
        }

        for r in self.out_recs.handles() {
            let rec = &self.out_recs[r];
            let Some(node) = rec.node else {
                continue;
            };
            let parent = if rec.is_open || rec.first_left == NONE {
                None
            } else {
                self.out_recs[rec.first_left].node
            };
            tree.attach(parent, node);
        }
        tree
    }
}
