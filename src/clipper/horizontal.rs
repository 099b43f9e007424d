// Copyright 2025 Lars Brubaker
// License: MIT
//
// Horizontal edges.
//
// A horizontal sits on a single scanline, so it cannot be ordered in the
// AEL by X the way sloped edges are. Horizontals queue on the SEL and are
// walked one at a time: the edge slides along the AEL in its direction of
// travel, crossing every edge it passes, until it reaches its far end.
// Consecutive horizontals in one bound are handled in a single walk.

use log::trace;

use super::Clipper;
use crate::arena::NONE;
use crate::edge::EdgeIdx;
use crate::geom::{CInt, IntPoint};

#[derive(Copy, Clone, Debug, PartialEq)]
enum Direction {
    LeftToRight,
    RightToLeft,
}

/// Whether two horizontal spans share more than a single point.
pub(super) fn horz_segments_overlap(a1: CInt, a2: CInt, b1: CInt, b2: CInt) -> bool {
    let (a1, a2) = if a1 > a2 { (a2, a1) } else { (a1, a2) };
    let (b1, b2) = if b1 > b2 { (b2, b1) } else { (b1, b2) };
    a1 < b2 && b1 < a2
}

impl Clipper {
    pub(super) fn process_horizontals(&mut self) {
        while let Some(e) = self.pop_edge_from_sel() {
            self.process_horizontal(e);
        }
    }

    fn horz_direction(&self, e: EdgeIdx) -> (Direction, CInt, CInt) {
        let edge = self.edge(e);
        if edge.bot.x < edge.top.x {
            (Direction::LeftToRight, edge.bot.x, edge.top.x)
        } else {
            (Direction::RightToLeft, edge.top.x, edge.bot.x)
        }
    }

    #[inline]
    fn next_in_direction(&self, e: EdgeIdx, dir: Direction) -> EdgeIdx {
        match dir {
            Direction::LeftToRight => self.edge(e).next_in_ael,
            Direction::RightToLeft => self.edge(e).prev_in_ael,
        }
    }

    /// Joins `op` with every pending horizontal in the SEL that overlaps `horz`.
    fn join_overlapping_horizontals(&mut self, horz: EdgeIdx, op: super::outrec::OutPtIdx) {
        let (bot_x, top_x) = (self.edge(horz).bot.x, self.edge(horz).top.x);
        let mut enh = self.sorted_edges;
        while enh != NONE {
            let other = self.edge(enh);
            let next = other.next_in_sel;
            if other.out_idx != NONE && horz_segments_overlap(bot_x, top_x, other.bot.x, other.top.x) {
                let off = other.top;
                let op2 = self.get_last_out_pt(enh);
                self.add_join(op2, op, off);
            }
            enh = next;
        }
    }

    fn process_horizontal(&mut self, horz_edge: EdgeIdx) {
        let mut horz = horz_edge;
        let is_open = self.edge(horz).wind_delta == 0;
        let (mut dir, mut horz_left, mut horz_right) = self.horz_direction(horz);

        let mut last_horz = horz;
        loop {
            let next = self.edge(last_horz).next_in_lml;
            if next == NONE || !self.edge(next).is_horizontal() {
                break;
            }
            last_horz = next;
        }
        let max_pair = if self.edge(last_horz).next_in_lml == NONE {
            self.get_maxima_pair(last_horz)
        } else {
            NONE
        };

        // Cursor into the maxima list for vertices touching this run.
        let n_max = self.maxima.len();
        let last_top_x = self.edge(last_horz).top.x;
        let bot_x = self.edge(horz).bot.x;
        let mut curr_max: Option<usize> = None;
        if n_max > 0 {
            match dir {
                Direction::LeftToRight => {
                    let mut i = 0;
                    while i < n_max && self.maxima.x(i) <= bot_x {
                        i += 1;
                    }
                    if i < n_max && self.maxima.x(i) < last_top_x {
                        curr_max = Some(i);
                    }
                }
                Direction::RightToLeft => {
                    let mut i = n_max;
                    while i > 0 && self.maxima.x(i - 1) > bot_x {
                        i -= 1;
                    }
                    if i > 0 && self.maxima.x(i - 1) > last_top_x {
                        curr_max = Some(i - 1);
                    }
                }
            }
        }

        let cursor_dir = dir;
        let mut op1 = NONE;
        loop {
            let is_last_horz = horz == last_horz;
            let mut e = self.next_in_direction(horz, dir);
            while e != NONE {
                // Maxima passed on the way get their own output vertex.
                while let Some(mi) = curr_max.filter(|_| dir == cursor_dir) {
                    let mx = self.maxima.x(mi);
                    let passed = match dir {
                        Direction::LeftToRight => mx < self.edge(e).curr.x,
                        Direction::RightToLeft => mx > self.edge(e).curr.x,
                    };
                    if !passed {
                        break;
                    }
                    if self.edge(horz).out_idx != NONE && !is_open {
                        let y = self.edge(horz).bot.y;
                        self.add_out_pt(horz, IntPoint::new(mx, y));
                    }
                    curr_max = match dir {
                        Direction::LeftToRight if mi + 1 < n_max => Some(mi + 1),
                        Direction::RightToLeft => mi.checked_sub(1),
                        _ => None,
                    };
                }

                let e_curr_x = self.edge(e).curr.x;
                if (dir == Direction::LeftToRight && e_curr_x > horz_right)
                    || (dir == Direction::RightToLeft && e_curr_x < horz_left)
                {
                    break;
                }

                // At the end of an intermediate horizontal, stop before edges
                // that leave above it to the right of the next edge in the bound.
                let horz_next = self.edge(horz).next_in_lml;
                if e_curr_x == self.edge(horz).top.x && horz_next != NONE && self.edge(e).dx < self.edge(horz_next).dx {
                    break;
                }

                if self.edge(horz).out_idx != NONE && !is_open {
                    let curr = self.edge(e).curr;
                    op1 = self.add_out_pt(horz, curr);
                    self.join_overlapping_horizontals(horz, op1);
                    let bot = self.edge(horz).bot;
                    self.add_ghost_join(op1, bot);
                }

                if e == max_pair && is_last_horz {
                    if self.edge(horz).out_idx != NONE {
                        let top = self.edge(horz).top;
                        self.add_local_max_poly(horz, max_pair, top);
                    }
                    self.delete_from_ael(horz);
                    self.delete_from_ael(max_pair);
                    return;
                }

                let pt = IntPoint::new(e_curr_x, self.edge(horz).curr.y);
                match dir {
                    Direction::LeftToRight => self.intersect_edges(horz, e, pt),
                    Direction::RightToLeft => self.intersect_edges(e, horz, pt),
                }
                let e_next = self.next_in_direction(e, dir);
                self.swap_positions_in_ael(horz, e);
                e = e_next;
            }

            let next = self.edge(horz).next_in_lml;
            if next == NONE || !self.edge(next).is_horizontal() {
                break;
            }
            horz = self.update_edge_into_ael(horz);
            if self.edge(horz).out_idx != NONE {
                self.add_out_pt(horz, self.edge(horz).bot);
            }
            (dir, horz_left, horz_right) = self.horz_direction(horz);
        }

        if self.edge(horz).out_idx != NONE && op1 == NONE {
            op1 = self.get_last_out_pt(horz);
            self.join_overlapping_horizontals(horz, op1);
            let top = self.edge(horz).top;
            self.add_ghost_join(op1, top);
        }

        if self.edge(horz).next_in_lml == NONE {
            if self.edge(horz).out_idx != NONE {
                self.add_out_pt(horz, self.edge(horz).top);
            }
            self.delete_from_ael(horz);
            return;
        }

        if self.edge(horz).out_idx == NONE {
            self.update_edge_into_ael(horz);
            return;
        }

        let op1 = self.add_out_pt(horz, self.edge(horz).top);
        let horz = self.update_edge_into_ael(horz);
        if self.edge(horz).wind_delta == 0 {
            return;
        }
        // The bound continues with a sloped edge; join it with a collinear neighbour.
        let prev = self.edge(horz).prev_in_ael;
        let next = self.edge(horz).next_in_ael;
        let target = if self.continues_collinear(horz, prev, true) {
            prev
        } else if self.continues_collinear(horz, next, true) {
            next
        } else {
            NONE
        };
        if target != NONE {
            let (bot, top) = (self.edge(horz).bot, self.edge(horz).top);
            let op2 = self.add_out_pt(target, bot);
            self.add_join(op1, op2, top);
            trace!("horizontal run joined at ({}, {})", bot.x, bot.y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::horz_segments_overlap;

    #[test]
    fn overlap_ignores_orientation() {
        assert!(horz_segments_overlap(0, 10, 5, 15));
        assert!(horz_segments_overlap(10, 0, 15, 5));
        assert!(!horz_segments_overlap(0, 5, 5, 10));
        assert!(!horz_segments_overlap(0, 4, 6, 10));
    }
}
