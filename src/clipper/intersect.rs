// Copyright 2025 Lars Brubaker
// License: MIT
//
// Edge crossings.
//
// Within a scanbeam the AEL order at the bottom is known; the order at the
// top is found by evaluating every edge at top_y. Bubble-sorting the SEL
// from one order to the other yields every crossing pair. Crossings are
// then applied bottom-up, each one swapping two adjacent AEL edges.

use super::ael::EdgeList;
use super::Clipper;
use crate::arena::NONE;
use crate::edge::{Edge, EdgeIdx, PolyType};
use crate::error::ClipError;
use crate::geom::{round, CInt, IntPoint};
use crate::winding::{own_count_qualifies, ClipType, FillRule};

#[derive(Copy, Clone, Debug)]
pub(crate) struct IntersectNode {
    pub edge1: EdgeIdx,
    pub edge2: EdgeIdx,
    pub pt: IntPoint,
}

/// Crossing point of two edges, clamped into the current scanbeam.
pub(crate) fn intersect_point(a: &Edge, b: &Edge) -> IntPoint {
    if a.dx == b.dx {
        let y = a.curr.y;
        return IntPoint::new(a.top_x(y), y);
    }

    let mut ip = IntPoint::default();
    if a.delta.x == 0 {
        ip.x = a.bot.x;
        ip.y = if b.is_horizontal() {
            b.bot.y
        } else {
            let bb = b.bot.y as f64 - b.bot.x as f64 / b.dx;
            round(ip.x as f64 / b.dx + bb)
        };
    } else if b.delta.x == 0 {
        ip.x = b.bot.x;
        ip.y = if a.is_horizontal() {
            a.bot.y
        } else {
            let ba = a.bot.y as f64 - a.bot.x as f64 / a.dx;
            round(ip.x as f64 / a.dx + ba)
        };
    } else {
        let b1 = a.bot.x as f64 - a.bot.y as f64 * a.dx;
        let b2 = b.bot.x as f64 - b.bot.y as f64 * b.dx;
        let q = (b2 - b1) / (a.dx - b.dx);
        ip.y = round(q);
        ip.x = if a.dx.abs() < b.dx.abs() { round(a.dx * q + b1) } else { round(b.dx * q + b2) };
    }

    // Rounding may push the point above either edge's top.
    if ip.y < a.top.y || ip.y < b.top.y {
        ip.y = a.top.y.max(b.top.y);
        ip.x = if a.dx.abs() < b.dx.abs() { a.top_x(ip.y) } else { b.top_x(ip.y) };
    }
    // Nor below the current sweep line.
    if ip.y > a.curr.y {
        ip.y = a.curr.y;
        ip.x = if a.dx.abs() > b.dx.abs() { b.top_x(ip.y) } else { a.top_x(ip.y) };
    }
    ip
}

impl Clipper {
    pub(super) fn process_intersections(&mut self, top_y: CInt) -> Result<(), ClipError> {
        if self.active_edges == NONE {
            return Ok(());
        }
        self.build_intersect_list(top_y);
        if self.intersections.is_empty() {
            return Ok(());
        }
        if self.intersections.len() > 1 && !self.fixup_intersection_order() {
            self.intersections.clear();
            self.sorted_edges = NONE;
            return Err(ClipError::IntersectionOrder { y: top_y });
        }
        self.process_intersect_list();
        self.sorted_edges = NONE;
        Ok(())
    }

    fn build_intersect_list(&mut self, top_y: CInt) {
        // Copy the AEL into the SEL while moving every edge to top_y.
        let mut e = self.active_edges;
        self.sorted_edges = e;
        while e != NONE {
            let x = self.edge(e).top_x(top_y);
            let edge = self.edge_mut(e);
            edge.prev_in_sel = edge.prev_in_ael;
            edge.next_in_sel = edge.next_in_ael;
            edge.curr.x = x;
            e = edge.next_in_ael;
        }

        let mut is_modified = true;
        while is_modified && self.sorted_edges != NONE {
            is_modified = false;
            e = self.sorted_edges;
            loop {
                let next = self.edge(e).next_in_sel;
                if next == NONE {
                    break;
                }
                if self.edge(e).curr.x > self.edge(next).curr.x {
                    let mut pt = intersect_point(self.edge(e), self.edge(next));
                    if pt.y < top_y {
                        pt = IntPoint::new(self.edge(e).top_x(top_y), top_y);
                    }
                    self.intersections.push(IntersectNode { edge1: e, edge2: next, pt });
                    self.swap_positions(EdgeList::Sorted, e, next);
                    is_modified = true;
                } else {
                    e = next;
                }
            }
            // The last edge is now in place; shorten the next pass.
            let prev = self.edge(e).prev_in_sel;
            if prev == NONE {
                break;
            }
            self.edge_mut(prev).next_in_sel = NONE;
        }
        self.sorted_edges = NONE;
    }

    #[inline]
    fn edges_adjacent(&self, node: &IntersectNode) -> bool {
        let e1 = self.edge(node.edge1);
        e1.next_in_sel == node.edge2 || e1.prev_in_sel == node.edge2
    }

    /// Orders crossings bottom-up so each applies to edges adjacent at that
    /// moment. Returns false when no such order exists.
    fn fixup_intersection_order(&mut self) -> bool {
        self.intersections.sort_by(|a, b| b.pt.y.cmp(&a.pt.y));
        self.copy_ael_to_sel();
        let cnt = self.intersections.len();
        for i in 0..cnt {
            if !self.edges_adjacent(&self.intersections[i]) {
                let mut j = i + 1;
                while j < cnt && !self.edges_adjacent(&self.intersections[j]) {
                    j += 1;
                }
                if j == cnt {
                    return false;
                }
                self.intersections.swap(i, j);
            }
            let node = self.intersections[i];
            self.swap_positions(EdgeList::Sorted, node.edge1, node.edge2);
        }
        true
    }

    fn process_intersect_list(&mut self) {
        let list = std::mem::take(&mut self.intersections);
        for node in &list {
            self.intersect_edges(node.edge1, node.edge2, node.pt);
            self.swap_positions_in_ael(node.edge1, node.edge2);
        }
        self.intersections = list;
        self.intersections.clear();
    }

    fn swap_sides(&mut self, e1: EdgeIdx, e2: EdgeIdx) {
        let (s1, s2) = (self.edge(e1).side, self.edge(e2).side);
        self.edge_mut(e1).side = s2;
        self.edge_mut(e2).side = s1;
    }

    fn swap_poly_indexes(&mut self, e1: EdgeIdx, e2: EdgeIdx) {
        let (o1, o2) = (self.edge(e1).out_idx, self.edge(e2).out_idx);
        self.edge_mut(e1).out_idx = o2;
        self.edge_mut(e2).out_idx = o1;
    }

    /// Applies a crossing of `e1` (left of `e2` below `pt`) and `e2` at
    /// `pt`: updates both winding counts and emits the output it implies.
    pub(super) fn intersect_edges(&mut self, e1: EdgeIdx, e2: EdgeIdx, pt: IntPoint) {
        let e1_contributing = self.edge(e1).out_idx != NONE;
        let e2_contributing = self.edge(e2).out_idx != NONE;
        let (a, b) = (self.edge(e1).clone(), self.edge(e2).clone());

        if a.wind_delta == 0 || b.wind_delta == 0 {
            self.intersect_open_edge(e1, e2, pt, e1_contributing, e2_contributing);
            return;
        }

        let rules1 = self.rules_for(a.poly_type);
        let rules2 = self.rules_for(b.poly_type);

        if a.poly_type == b.poly_type {
            if rules1.own == FillRule::EvenOdd {
                self.edge_mut(e1).wind_cnt = b.wind_cnt;
                self.edge_mut(e2).wind_cnt = a.wind_cnt;
            } else {
                self.edge_mut(e1).wind_cnt = if a.wind_cnt + b.wind_delta == 0 {
                    -a.wind_cnt
                } else {
                    a.wind_cnt + b.wind_delta
                };
                self.edge_mut(e2).wind_cnt = if b.wind_cnt - a.wind_delta == 0 {
                    -b.wind_cnt
                } else {
                    b.wind_cnt - a.wind_delta
                };
            }
        } else {
            let toggle = |c: i32| if c == 0 { 1 } else { 0 };
            self.edge_mut(e1).wind_cnt2 = if rules2.own != FillRule::EvenOdd {
                a.wind_cnt2 + b.wind_delta
            } else {
                toggle(a.wind_cnt2)
            };
            self.edge_mut(e2).wind_cnt2 = if rules1.own != FillRule::EvenOdd {
                b.wind_cnt2 - a.wind_delta
            } else {
                toggle(b.wind_cnt2)
            };
        }

        let e1_wc = rules1.own.fill_count(self.edge(e1).wind_cnt);
        let e2_wc = rules2.own.fill_count(self.edge(e2).wind_cnt);
        let on_boundary = |wc: i32| wc == 0 || wc == 1;

        if e1_contributing && e2_contributing {
            if !on_boundary(e1_wc)
                || !on_boundary(e2_wc)
                || (a.poly_type != b.poly_type && self.clip_type != ClipType::Xor)
            {
                self.add_local_max_poly(e1, e2, pt);
            } else {
                self.add_out_pt(e1, pt);
                self.add_out_pt(e2, pt);
                self.swap_sides(e1, e2);
                self.swap_poly_indexes(e1, e2);
            }
        } else if e1_contributing {
            if on_boundary(e2_wc) {
                self.add_out_pt(e1, pt);
                self.swap_sides(e1, e2);
                self.swap_poly_indexes(e1, e2);
            }
        } else if e2_contributing {
            if on_boundary(e1_wc) {
                self.add_out_pt(e2, pt);
                self.swap_sides(e1, e2);
                self.swap_poly_indexes(e1, e2);
            }
        } else if on_boundary(e1_wc) && on_boundary(e2_wc) {
            // Neither edge contributes yet; the crossing may open a new ring.
            let e1_wc2 = rules1.other.fill_count(self.edge(e1).wind_cnt2);
            let e2_wc2 = rules2.other.fill_count(self.edge(e2).wind_cnt2);

            if a.poly_type != b.poly_type {
                self.add_local_min_poly(e1, e2, pt);
            } else if e1_wc == 1 && e2_wc == 1 {
                let opens = match self.clip_type {
                    ClipType::Intersection => e1_wc2 > 0 && e2_wc2 > 0,
                    ClipType::Union => e1_wc2 <= 0 && e2_wc2 <= 0,
                    ClipType::Difference => {
                        (a.poly_type == PolyType::Clip && e1_wc2 > 0 && e2_wc2 > 0)
                            || (a.poly_type == PolyType::Subject && e1_wc2 <= 0 && e2_wc2 <= 0)
                    }
                    ClipType::Xor => true,
                };
                if opens {
                    self.add_local_min_poly(e1, e2, pt);
                }
            } else {
                self.swap_sides(e1, e2);
            }
        }
    }

    /// Whether crossing the closed edge `e` moves an open path of the other
    /// set into or out of the region it is clipped to. Under union the open
    /// path's own set must also be unfilled at the edge.
    fn bounds_clip_region(&self, e: &Edge) -> bool {
        let rules = self.rules_for(e.poly_type);
        own_count_qualifies(rules.own, e.wind_delta, e.wind_cnt)
            && (self.clip_type != ClipType::Union || !rules.other.is_filled(e.wind_cnt2))
    }

    /// Crossings involving an open path edge. Open edges never change
    /// winding counts; they only start or stop emitting.
    fn intersect_open_edge(&mut self, e1: EdgeIdx, e2: EdgeIdx, pt: IntPoint, e1_contributing: bool, e2_contributing: bool) {
        let (a, b) = (self.edge(e1).clone(), self.edge(e2).clone());
        if a.wind_delta == 0 && b.wind_delta == 0 {
            return;
        }

        if a.poly_type == b.poly_type && a.wind_delta != b.wind_delta && self.clip_type == ClipType::Union {
            if a.wind_delta == 0 {
                if e2_contributing {
                    self.add_out_pt(e1, pt);
                    if e1_contributing {
                        self.edge_mut(e1).out_idx = NONE;
                    }
                }
            } else if e1_contributing {
                self.add_out_pt(e2, pt);
                if e2_contributing {
                    self.edge_mut(e2).out_idx = NONE;
                }
            }
        } else if a.poly_type != b.poly_type {
            if a.wind_delta == 0 && self.bounds_clip_region(&b) {
                self.add_out_pt(e1, pt);
                if e1_contributing {
                    self.edge_mut(e1).out_idx = NONE;
                }
            } else if b.wind_delta == 0 && self.bounds_clip_region(&a) {
                self.add_out_pt(e2, pt);
                if e2_contributing {
                    self.edge_mut(e2).out_idx = NONE;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(bot: (CInt, CInt), top: (CInt, CInt)) -> Edge {
        let bot = IntPoint::new(bot.0, bot.1);
        let top = IntPoint::new(top.0, top.1);
        let delta = IntPoint::new(top.x - bot.x, top.y - bot.y);
        Edge {
            bot,
            curr: bot,
            top,
            delta,
            dx: if delta.y == 0 { crate::edge::HORIZONTAL } else { delta.x as f64 / delta.y as f64 },
            ..Edge::default()
        }
    }

    #[test]
    fn diagonals_cross_at_center() {
        let a = edge((0, 10), (10, 0));
        let b = edge((10, 10), (0, 0));
        assert_eq!(intersect_point(&a, &b), IntPoint::new(5, 5));
    }

    #[test]
    fn vertical_edge_crossing() {
        let a = edge((4, 10), (4, 0));
        let b = edge((0, 10), (10, 0));
        assert_eq!(intersect_point(&a, &b), IntPoint::new(4, 6));
        assert_eq!(intersect_point(&b, &a), IntPoint::new(4, 6));
    }

    #[test]
    fn result_is_clamped_into_scanbeam() {
        // Nearly parallel edges whose true crossing lies well below the scanbeam.
        let a = edge((0, 10), (1, 0));
        let b = edge((1, 10), (2, 1));
        let ip = intersect_point(&a, &b);
        assert!(ip.y >= a.top.y.max(b.top.y));
        assert!(ip.y <= a.curr.y);
    }
}
