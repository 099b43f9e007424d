// Copyright 2025 Lars Brubaker
// License: MIT
//
// Active edge list (AEL) and sorted edge list (SEL) maintenance.
//
// Both lists thread through the same edge records, using prev/next_in_ael
// and prev/next_in_sel respectively. The SEL holds pending horizontals
// during a scanbeam and doubles as scratch space when ordering crossings.

use super::Clipper;
use crate::arena::NONE;
use crate::edge::{EdgeIdx, PolyType};
use crate::winding::{self, ClipType, EdgeRules, FillRule};

#[derive(Copy, Clone, Debug, PartialEq)]
pub(super) enum EdgeList {
    Active,
    Sorted,
}

impl Clipper {
    // ─────── Link helpers ─────────────────────────────────────────────────────

    #[inline]
    fn links(&self, list: EdgeList, e: EdgeIdx) -> (EdgeIdx, EdgeIdx) {
        let edge = self.edge(e);
        match list {
            EdgeList::Active => (edge.prev_in_ael, edge.next_in_ael),
            EdgeList::Sorted => (edge.prev_in_sel, edge.next_in_sel),
        }
    }

    #[inline]
    fn set_prev(&mut self, list: EdgeList, e: EdgeIdx, v: EdgeIdx) {
        if e == NONE {
            return;
        }
        let edge = self.edge_mut(e);
        match list {
            EdgeList::Active => edge.prev_in_ael = v,
            EdgeList::Sorted => edge.prev_in_sel = v,
        }
    }

    #[inline]
    fn set_next(&mut self, list: EdgeList, e: EdgeIdx, v: EdgeIdx) {
        if e == NONE {
            return;
        }
        let edge = self.edge_mut(e);
        match list {
            EdgeList::Active => edge.next_in_ael = v,
            EdgeList::Sorted => edge.next_in_sel = v,
        }
    }

    #[inline]
    fn head(&self, list: EdgeList) -> EdgeIdx {
        match list {
            EdgeList::Active => self.active_edges,
            EdgeList::Sorted => self.sorted_edges,
        }
    }

    #[inline]
    fn set_head(&mut self, list: EdgeList, e: EdgeIdx) {
        match list {
            EdgeList::Active => self.active_edges = e,
            EdgeList::Sorted => self.sorted_edges = e,
        }
    }

    /// Unlinks `e` from `list`. Edges not in the list are left alone.
    fn unlink(&mut self, list: EdgeList, e: EdgeIdx) {
        let (prev, next) = self.links(list, e);
        if prev == NONE && next == NONE && e != self.head(list) {
            return;
        }
        if prev != NONE {
            self.set_next(list, prev, next);
        } else {
            self.set_head(list, next);
        }
        self.set_prev(list, next, prev);
        self.set_prev(list, e, NONE);
        self.set_next(list, e, NONE);
    }

    /// Exchanges two edges' positions in `list`.
    pub(super) fn swap_positions(&mut self, list: EdgeList, e1: EdgeIdx, e2: EdgeIdx) {
        let (p1, n1) = self.links(list, e1);
        let (p2, n2) = self.links(list, e2);
        if (p1 == NONE && n1 == NONE) || (p2 == NONE && n2 == NONE) {
            return;
        }

        if n1 == e2 {
            self.set_prev(list, n2, e1);
            self.set_next(list, p1, e2);
            self.set_prev(list, e2, p1);
            self.set_next(list, e2, e1);
            self.set_prev(list, e1, e2);
            self.set_next(list, e1, n2);
        } else if n2 == e1 {
            self.set_prev(list, n1, e2);
            self.set_next(list, p2, e1);
            self.set_prev(list, e1, p2);
            self.set_next(list, e1, e2);
            self.set_prev(list, e2, e1);
            self.set_next(list, e2, n1);
        } else {
            self.set_next(list, e1, n2);
            self.set_prev(list, n2, e1);
            self.set_prev(list, e1, p2);
            self.set_next(list, p2, e1);
            self.set_next(list, e2, n1);
            self.set_prev(list, n1, e2);
            self.set_prev(list, e2, p1);
            self.set_next(list, p1, e2);
        }

        if self.links(list, e1).0 == NONE {
            self.set_head(list, e1);
        } else if self.links(list, e2).0 == NONE {
            self.set_head(list, e2);
        }
    }

    #[inline]
    pub(super) fn swap_positions_in_ael(&mut self, e1: EdgeIdx, e2: EdgeIdx) {
        self.swap_positions(EdgeList::Active, e1, e2);
    }

    #[inline]
    pub(super) fn delete_from_ael(&mut self, e: EdgeIdx) {
        self.unlink(EdgeList::Active, e);
    }

    // ─────── AEL ──────────────────────────────────────────────────────────────

    /// Whether `e2` belongs left of `e1` when both start at the current sweep line.
    fn e2_inserts_before_e1(&self, e1: EdgeIdx, e2: EdgeIdx) -> bool {
        let (a, b) = (self.edge(e1), self.edge(e2));
        if b.curr.x == a.curr.x {
            if b.top.y > a.top.y {
                b.top.x < a.top_x(b.top.y)
            } else {
                a.top.x > b.top_x(a.top.y)
            }
        } else {
            b.curr.x < a.curr.x
        }
    }

    /// Inserts `e` into the AEL, scanning right from `start` (or the head when NONE).
    pub(super) fn insert_edge_into_ael(&mut self, e: EdgeIdx, start: EdgeIdx) {
        if self.active_edges == NONE {
            let edge = self.edge_mut(e);
            edge.prev_in_ael = NONE;
            edge.next_in_ael = NONE;
            self.active_edges = e;
            return;
        }
        if start == NONE && self.e2_inserts_before_e1(self.active_edges, e) {
            let head = self.active_edges;
            self.edge_mut(e).prev_in_ael = NONE;
            self.edge_mut(e).next_in_ael = head;
            self.edge_mut(head).prev_in_ael = e;
            self.active_edges = e;
            return;
        }

        let mut s = if start == NONE { self.active_edges } else { start };
        loop {
            let next = self.edge(s).next_in_ael;
            if next == NONE || self.e2_inserts_before_e1(next, e) {
                break;
            }
            s = next;
        }
        let next = self.edge(s).next_in_ael;
        self.edge_mut(e).next_in_ael = next;
        if next != NONE {
            self.edge_mut(next).prev_in_ael = e;
        }
        self.edge_mut(e).prev_in_ael = s;
        self.edge_mut(s).next_in_ael = e;
    }

    /// Replaces `e` in the AEL by the next edge of its bound and returns it.
    pub(super) fn update_edge_into_ael(&mut self, e: EdgeIdx) -> EdgeIdx {
        let next_lml = self.edge(e).next_in_lml;
        debug_assert!(next_lml != NONE, "update_edge_into_ael past the end of a bound");
        let old = self.edge(e).clone();

        if old.prev_in_ael != NONE {
            self.edge_mut(old.prev_in_ael).next_in_ael = next_lml;
        } else {
            self.active_edges = next_lml;
        }
        if old.next_in_ael != NONE {
            self.edge_mut(old.next_in_ael).prev_in_ael = next_lml;
        }

        let n = self.edge_mut(next_lml);
        n.out_idx = old.out_idx;
        n.side = old.side;
        n.wind_delta = old.wind_delta;
        n.wind_cnt = old.wind_cnt;
        n.wind_cnt2 = old.wind_cnt2;
        n.curr = n.bot;
        n.prev_in_ael = old.prev_in_ael;
        n.next_in_ael = old.next_in_ael;
        if !n.is_horizontal() {
            let top_y = n.top.y;
            self.scanbeam.insert(top_y);
        }
        next_lml
    }

    /// The other bound ending at `e`'s top vertex, if `e` is a maximum.
    pub(super) fn get_maxima_pair(&self, e: EdgeIdx) -> EdgeIdx {
        let edge = self.edge(e);
        let (next, prev) = (self.edge(edge.next), self.edge(edge.prev));
        if next.top == edge.top && next.next_in_lml == NONE {
            edge.next
        } else if prev.top == edge.top && prev.next_in_lml == NONE {
            edge.prev
        } else {
            NONE
        }
    }

    /// Like [`get_maxima_pair`](Self::get_maxima_pair) but only returns
    /// partners that are in the AEL (or pending horizontals).
    pub(super) fn get_maxima_pair_ex(&self, e: EdgeIdx) -> EdgeIdx {
        let pair = self.get_maxima_pair(e);
        if pair == NONE {
            return NONE;
        }
        let p = self.edge(pair);
        if p.skip || (p.next_in_ael == p.prev_in_ael && !p.is_horizontal()) {
            return NONE;
        }
        pair
    }

    // ─────── SEL ──────────────────────────────────────────────────────────────

    /// Pushes `e` onto the front of the SEL.
    pub(super) fn add_edge_to_sel(&mut self, e: EdgeIdx) {
        let head = self.sorted_edges;
        let edge = self.edge_mut(e);
        edge.prev_in_sel = NONE;
        edge.next_in_sel = head;
        if head != NONE {
            self.edge_mut(head).prev_in_sel = e;
        }
        self.sorted_edges = e;
    }

    pub(super) fn pop_edge_from_sel(&mut self) -> Option<EdgeIdx> {
        let e = self.sorted_edges;
        if e == NONE {
            return None;
        }
        self.unlink(EdgeList::Sorted, e);
        Some(e)
    }

    /// Mirrors the AEL order into the SEL links.
    pub(super) fn copy_ael_to_sel(&mut self) {
        let mut e = self.active_edges;
        self.sorted_edges = e;
        while e != NONE {
            let edge = self.edge_mut(e);
            edge.prev_in_sel = edge.prev_in_ael;
            edge.next_in_sel = edge.next_in_ael;
            e = edge.next_in_ael;
        }
    }

    // ─────── Winding ──────────────────────────────────────────────────────────

    #[inline]
    pub(super) fn rules_for(&self, poly_type: PolyType) -> EdgeRules {
        EdgeRules::for_poly(poly_type, self.subj_fill, self.clip_fill)
    }

    pub(super) fn is_contributing(&self, e: EdgeIdx) -> bool {
        let edge = self.edge(e);
        winding::is_contributing(
            self.clip_type,
            edge.poly_type,
            self.rules_for(edge.poly_type),
            edge.wind_delta,
            edge.wind_cnt,
            edge.wind_cnt2,
        )
    }

    /// Derives `e`'s winding counts from the nearest active edge to its left.
    pub(super) fn set_winding_count(&mut self, e: EdgeIdx) {
        let (poly_type, wd) = (self.edge(e).poly_type, self.edge(e).wind_delta);
        let rules = self.rules_for(poly_type);

        // Nearest closed edge of the same set.
        let mut p = self.edge(e).prev_in_ael;
        while p != NONE && (self.edge(p).poly_type != poly_type || self.edge(p).wind_delta == 0) {
            p = self.edge(p).prev_in_ael;
        }

        // Count for an open edge whose own set does not constrain it.
        let open_cnt = if rules.own == FillRule::Negative { -1 } else { 1 };
        let (wind_cnt, wind_cnt2, mut walk) = if p == NONE {
            (if wd == 0 { open_cnt } else { wd }, 0, self.active_edges)
        } else {
            let prev = self.edge(p);
            let cnt = if wd == 0 && self.clip_type != ClipType::Union {
                open_cnt
            } else if rules.own == FillRule::EvenOdd {
                if wd == 0 {
                    // Open edge: inside if an odd number of closed same-set edges lie left of it.
                    let mut inside = true;
                    let mut q = prev.prev_in_ael;
                    while q != NONE {
                        let qe = self.edge(q);
                        if qe.poly_type == prev.poly_type && qe.wind_delta != 0 {
                            inside = !inside;
                        }
                        q = qe.prev_in_ael;
                    }
                    if inside {
                        0
                    } else {
                        1
                    }
                } else {
                    wd
                }
            } else {
                let (pc, pd) = (prev.wind_cnt, prev.wind_delta);
                if pc * pd < 0 {
                    // The left edge is leaving its region.
                    if pc.abs() > 1 {
                        if pd * wd < 0 {
                            pc
                        } else {
                            pc + wd
                        }
                    } else if wd == 0 {
                        1
                    } else {
                        wd
                    }
                } else if wd == 0 {
                    if pc < 0 {
                        pc - 1
                    } else {
                        pc + 1
                    }
                } else if pd * wd < 0 {
                    pc
                } else {
                    pc + wd
                }
            };
            (cnt, prev.wind_cnt2, prev.next_in_ael)
        };

        // Other-set count: accumulate every edge between the anchor and `e`.
        let mut cnt2 = wind_cnt2;
        while walk != NONE && walk != e {
            let w = self.edge(walk);
            if rules.other == FillRule::EvenOdd {
                if w.wind_delta != 0 {
                    cnt2 = if cnt2 == 0 { 1 } else { 0 };
                }
            } else {
                cnt2 += w.wind_delta;
            }
            walk = w.next_in_ael;
        }

        let edge = self.edge_mut(e);
        edge.wind_cnt = wind_cnt;
        edge.wind_cnt2 = cnt2;
    }
}
