// Copyright 2025 Lars Brubaker
// License: MIT
//
// The clipping engine: public API plus the scanline sweep.
//
// One Clipper owns every piece of sweep state (edges, active/sorted edge
// lists, output rings, joins). The work is split across submodules that
// all extend the same struct:
//
//   ael         active/sorted edge list surgery and winding counts
//   outrec      output rings (OutRec / OutPt)
//   intersect   crossing detection and handling
//   horizontal  horizontal edge runs
//   joins       post-sweep join resolution and ring cleanup
//   result      flat and tree output

mod ael;
mod horizontal;
mod intersect;
mod joins;
mod outrec;
mod result;

use log::{debug, trace, warn};

use crate::arena::{Arena, NONE};
use crate::edge::{Edge, EdgeIdx, EdgeSet, PolyType};
use crate::error::ClipError;
use crate::geom::{slopes_equal4, CInt, IntPoint, Path};
use crate::polytree::PolyTree;
use crate::scanbeam::{MaximaList, Scanbeam};
use crate::winding::{ClipType, FillRule};

use intersect::IntersectNode;
use joins::Join;
use outrec::{OutPt, OutRec};

pub use crate::geom::Paths;

// ─────────────────────────────── Options ──────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ClipOption {
    /// Emit outer contours clockwise and holes counter-clockwise.
    ReverseSolution,
    /// Guarantee no output contour touches itself.
    StrictlySimple,
    /// Keep vertices that lie on a straight run between their neighbours.
    PreserveCollinear,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ClipOptions {
    pub reverse_solution: bool,
    pub strictly_simple: bool,
    pub preserve_collinear: bool,
}

impl ClipOptions {
    pub const REVERSE_SOLUTION: u32 = 1;
    pub const STRICTLY_SIMPLE: u32 = 2;
    pub const PRESERVE_COLLINEAR: u32 = 4;

    pub fn from_bits(bits: u32) -> Self {
        ClipOptions {
            reverse_solution: bits & Self::REVERSE_SOLUTION != 0,
            strictly_simple: bits & Self::STRICTLY_SIMPLE != 0,
            preserve_collinear: bits & Self::PRESERVE_COLLINEAR != 0,
        }
    }

    pub fn bits(&self) -> u32 {
        let mut b = 0;
        if self.reverse_solution {
            b |= Self::REVERSE_SOLUTION;
        }
        if self.strictly_simple {
            b |= Self::STRICTLY_SIMPLE;
        }
        if self.preserve_collinear {
            b |= Self::PRESERVE_COLLINEAR;
        }
        b
    }
}

// ─────────────────────────────── Clipper ──────────────────────────────────────

pub struct Clipper {
    base: EdgeSet,
    options: ClipOptions,

    clip_type: ClipType,
    subj_fill: FillRule,
    clip_fill: FillRule,

    // Sweep state
    scanbeam: Scanbeam,
    maxima: MaximaList,
    active_edges: EdgeIdx,
    sorted_edges: EdgeIdx,
    intersections: Vec<IntersectNode>,

    // Output state
    out_recs: Arena<OutRec>,
    out_pts: Arena<OutPt>,
    joins: Vec<Join>,
    ghost_joins: Vec<Join>,

    executing: bool,
}

impl Default for Clipper {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipper {
    pub fn new() -> Self {
        Self::with_options(ClipOptions::default())
    }

    pub fn with_options(options: ClipOptions) -> Self {
        let mut base = EdgeSet::new();
        base.preserve_collinear = options.preserve_collinear;
        Clipper {
            base,
            options,
            clip_type: ClipType::Intersection,
            subj_fill: FillRule::EvenOdd,
            clip_fill: FillRule::EvenOdd,
            scanbeam: Scanbeam::new(),
            maxima: MaximaList::new(),
            active_edges: NONE,
            sorted_edges: NONE,
            intersections: Vec::new(),
            out_recs: Arena::new(),
            out_pts: Arena::new(),
            joins: Vec::new(),
            ghost_joins: Vec::new(),
            executing: false,
        }
    }

    pub fn set_option(&mut self, option: ClipOption, value: bool) {
        match option {
            ClipOption::ReverseSolution => self.options.reverse_solution = value,
            ClipOption::StrictlySimple => self.options.strictly_simple = value,
            ClipOption::PreserveCollinear => {
                self.options.preserve_collinear = value;
                self.base.preserve_collinear = value;
            }
        }
    }

    pub fn options(&self) -> ClipOptions {
        self.options
    }

    /// Adds one path. Returns Ok(false) if the path was too degenerate to use.
    pub fn add_path(&mut self, path: &[IntPoint], poly_type: PolyType, closed: bool) -> Result<bool, ClipError> {
        self.base.add_path(path, poly_type, closed)
    }

    /// Adds several paths. Returns Ok(true) if at least one was usable.
    pub fn add_paths(&mut self, paths: &[Path], poly_type: PolyType, closed: bool) -> Result<bool, ClipError> {
        let mut any = false;
        for p in paths {
            if self.add_path(p, poly_type, closed)? {
                any = true;
            }
        }
        Ok(any)
    }

    /// Forgets every loaded path.
    pub fn clear(&mut self) {
        self.base.clear();
    }

    /// Runs the operation and returns closed contours as flat paths. Outer
    /// contours have positive area and holes negative (inverted with
    /// `ReverseSolution`).
    pub fn execute(&mut self, clip_type: ClipType, subj_fill: FillRule, clip_fill: FillRule) -> Result<Paths, ClipError> {
        if self.executing {
            return Err(ClipError::Busy);
        }
        if self.base.has_open_paths {
            return Err(ClipError::OpenPathsNeedTree);
        }
        self.executing = true;
        let outcome = self.execute_internal(clip_type, subj_fill, clip_fill).map(|()| self.build_result());
        self.finish(&outcome);
        outcome
    }

    /// Runs the operation and returns a hole-aware tree. Open paths are
    /// returned as top-level open nodes.
    pub fn execute_tree(
        &mut self,
        clip_type: ClipType,
        subj_fill: FillRule,
        clip_fill: FillRule,
    ) -> Result<PolyTree, ClipError> {
        if self.executing {
            return Err(ClipError::Busy);
        }
        self.executing = true;
        let outcome = self.execute_internal(clip_type, subj_fill, clip_fill).map(|()| self.build_result_tree());
        self.finish(&outcome);
        outcome
    }

    fn finish<T>(&mut self, outcome: &Result<T, ClipError>) {
        if let Err(err) = outcome {
            warn!("clip {:?} failed: {}", self.clip_type, err);
        }
        self.out_recs.clear();
        self.out_pts.clear();
        self.executing = false;
    }

    // ─────── Edge access ──────────────────────────────────────────────────────

    #[inline]
    fn edge(&self, e: EdgeIdx) -> &Edge {
        &self.base.edges[e]
    }

    #[inline]
    fn edge_mut(&mut self, e: EdgeIdx) -> &mut Edge {
        &mut self.base.edges[e]
    }

    #[inline]
    fn use_full_range(&self) -> bool {
        self.base.use_full_range
    }

    // ─────── Sweep ────────────────────────────────────────────────────────────

    fn execute_internal(&mut self, clip_type: ClipType, subj_fill: FillRule, clip_fill: FillRule) -> Result<(), ClipError> {
        self.clip_type = clip_type;
        self.subj_fill = subj_fill;
        self.clip_fill = clip_fill;
        debug!(
            "execute {:?} subject={:?} clip={:?}: {} edges, {} local minima",
            clip_type,
            subj_fill,
            clip_fill,
            self.base.edges.len(),
            self.base.minima_count()
        );

        let outcome = self.sweep().map(|()| self.build_output_rings());

        self.joins.clear();
        self.ghost_joins.clear();
        self.intersections.clear();
        self.maxima.clear();
        self.sorted_edges = NONE;
        self.active_edges = NONE;
        outcome
    }

    fn sweep(&mut self) -> Result<(), ClipError> {
        self.base.reset(&mut self.scanbeam);
        self.active_edges = NONE;
        self.sorted_edges = NONE;
        self.maxima.clear();

        let Some(mut bot_y) = self.scanbeam.pop() else {
            return Ok(());
        };
        loop {
            // Flat bounds inserted at the last Y still need this pass.
            self.insert_local_minima_into_ael(bot_y);
            self.process_horizontals();
            self.ghost_joins.clear();
            let Some(top_y) = self.scanbeam.pop() else {
                break;
            };
            trace!("scanbeam y={}", top_y);
            self.process_intersections(top_y)?;
            self.process_edges_at_top_of_scanbeam(top_y)?;
            bot_y = top_y;
        }
        debug_assert!(!self.base.local_minima_pending());
        Ok(())
    }

    /// Orients rings, resolves joins, then strips degenerate geometry.
    fn build_output_rings(&mut self) {
        let reverse = self.options.reverse_solution;
        for r in self.out_recs.handles() {
            let (pts, is_open, is_hole) = {
                let rec = &self.out_recs[r];
                (rec.pts, rec.is_open, rec.is_hole)
            };
            if pts != NONE && !is_open && (is_hole ^ reverse) == (self.ring_area(pts) > 0.0) {
                self.reverse_ring(pts);
            }
        }

        self.join_common_edges();

        for r in self.out_recs.handles() {
            let (pts, is_open) = (self.out_recs[r].pts, self.out_recs[r].is_open);
            if pts == NONE {
                continue;
            }
            if is_open {
                self.fixup_out_polyline(r);
            } else {
                self.fixup_out_polygon(r);
            }
        }

        if self.options.strictly_simple {
            self.do_simple_polygons();
            for r in self.out_recs.handles() {
                let rec = &self.out_recs[r];
                if rec.pts == NONE || rec.is_open {
                    continue;
                }
                self.fixup_out_polygon(r);
                let pts = self.out_recs[r].pts;
                if pts != NONE && self.ring_area(pts) == 0.0 {
                    self.out_recs[r].pts = NONE;
                }
            }
            self.settle_nesting();
        }
        debug!("sweep produced {} output records, {} joins", self.out_recs.len(), self.joins.len());
    }

    // ─────── Local minima ─────────────────────────────────────────────────────

    fn insert_local_minima_into_ael(&mut self, bot_y: CInt) {
        while let Some(lm) = self.base.pop_local_minima(bot_y) {
            let (lb, rb) = (lm.left_bound, lm.right_bound);
            let mut op1 = NONE;

            if lb == NONE {
                self.insert_edge_into_ael(rb, NONE);
                self.set_winding_count(rb);
                if self.is_contributing(rb) {
                    op1 = self.add_out_pt(rb, self.edge(rb).bot);
                }
            } else if rb == NONE {
                self.insert_edge_into_ael(lb, NONE);
                self.set_winding_count(lb);
                if self.is_contributing(lb) {
                    op1 = self.add_out_pt(lb, self.edge(lb).bot);
                }
                self.scanbeam.insert(self.edge(lb).top.y);
            } else {
                self.insert_edge_into_ael(lb, NONE);
                self.insert_edge_into_ael(rb, lb);
                self.set_winding_count(lb);
                let (wc, wc2) = (self.edge(lb).wind_cnt, self.edge(lb).wind_cnt2);
                self.edge_mut(rb).wind_cnt = wc;
                self.edge_mut(rb).wind_cnt2 = wc2;
                if self.is_contributing(lb) {
                    op1 = self.add_local_min_poly(lb, rb, self.edge(lb).bot);
                }
                self.scanbeam.insert(self.edge(lb).top.y);
            }

            if rb != NONE {
                if self.edge(rb).is_horizontal() {
                    let next = self.edge(rb).next_in_lml;
                    if next != NONE {
                        self.scanbeam.insert(self.edge(next).top.y);
                    }
                    self.add_edge_to_sel(rb);
                } else {
                    self.scanbeam.insert(self.edge(rb).top.y);
                }
            }

            if lb == NONE || rb == NONE {
                continue;
            }

            // A horizontal right bound may overlap horizontals output earlier at this Y.
            if op1 != NONE && self.edge(rb).is_horizontal() && !self.ghost_joins.is_empty() && self.edge(rb).wind_delta != 0 {
                let (rb_bot_x, rb_top_x) = (self.edge(rb).bot.x, self.edge(rb).top.x);
                for i in 0..self.ghost_joins.len() {
                    let gj = self.ghost_joins[i];
                    if horizontal::horz_segments_overlap(self.out_pts[gj.out_pt1].pt.x, gj.off_pt.x, rb_bot_x, rb_top_x) {
                        self.add_join(gj.out_pt1, op1, gj.off_pt);
                    }
                }
            }

            let lb_prev = self.edge(lb).prev_in_ael;
            if op1 != NONE && self.edge(lb).out_idx != NONE && lb_prev != NONE {
                let (l, p) = (self.edge(lb), self.edge(lb_prev));
                if p.curr.x == l.bot.x
                    && p.out_idx != NONE
                    && slopes_equal4(p.bot, p.top, l.curr, l.top, self.use_full_range())
                    && l.wind_delta != 0
                    && p.wind_delta != 0
                {
                    let (bot, top) = (l.bot, l.top);
                    let op2 = self.add_out_pt(lb_prev, bot);
                    self.add_join(op1, op2, top);
                }
            }

            if self.edge(lb).next_in_ael != rb {
                let rb_prev = self.edge(rb).prev_in_ael;
                if op1 != NONE && self.edge(rb).out_idx != NONE && rb_prev != NONE {
                    let (r, p) = (self.edge(rb), self.edge(rb_prev));
                    if p.out_idx != NONE
                        && slopes_equal4(p.curr, p.top, r.curr, r.top, self.use_full_range())
                        && r.wind_delta != 0
                        && p.wind_delta != 0
                    {
                        let (bot, top) = (r.bot, r.top);
                        let op2 = self.add_out_pt(rb_prev, bot);
                        self.add_join(op1, op2, top);
                    }
                }

                // Edges lying between the two new bounds are crossed by the right bound.
                let pt = self.edge(lb).curr;
                let mut e = self.edge(lb).next_in_ael;
                while e != NONE && e != rb {
                    self.intersect_edges(rb, e, pt);
                    e = self.edge(e).next_in_ael;
                }
            }
        }
    }

    // ─────── Top of scanbeam ──────────────────────────────────────────────────

    #[inline]
    fn is_maxima(&self, e: EdgeIdx, y: CInt) -> bool {
        e != NONE && self.edge(e).top.y == y && self.edge(e).next_in_lml == NONE
    }

    #[inline]
    fn is_intermediate(&self, e: EdgeIdx, y: CInt) -> bool {
        self.edge(e).top.y == y && self.edge(e).next_in_lml != NONE
    }

    fn process_edges_at_top_of_scanbeam(&mut self, top_y: CInt) -> Result<(), ClipError> {
        let strictly_simple = self.options.strictly_simple;
        let mut e = self.active_edges;
        while e != NONE {
            // Maxima with a horizontal partner are left to horizontal processing.
            let mut is_max = self.is_maxima(e, top_y);
            if is_max {
                let pair = self.get_maxima_pair_ex(e);
                is_max = pair == NONE || !self.edge(pair).is_horizontal();
            }

            if is_max {
                if strictly_simple {
                    self.maxima.insert(self.edge(e).top.x);
                }
                let prev = self.edge(e).prev_in_ael;
                self.do_maxima(e)?;
                e = if prev == NONE { self.active_edges } else { self.edge(prev).next_in_ael };
                continue;
            }

            let next_lml = self.edge(e).next_in_lml;
            if self.is_intermediate(e, top_y) && self.edge(next_lml).is_horizontal() {
                e = self.update_edge_into_ael(e);
                if self.edge(e).out_idx != NONE {
                    self.add_out_pt(e, self.edge(e).bot);
                }
                self.add_edge_to_sel(e);
            } else {
                let x = self.edge(e).top_x(top_y);
                let edge = self.edge_mut(e);
                edge.curr = IntPoint::new(x, top_y);
            }

            // Adjacent contributing edges meeting at one point get an explicit join.
            if strictly_simple {
                let prev = self.edge(e).prev_in_ael;
                let (out_idx, wind_delta, ip) = (self.edge(e).out_idx, self.edge(e).wind_delta, self.edge(e).curr);
                if out_idx != NONE
                    && wind_delta != 0
                    && prev != NONE
                    && self.edge(prev).out_idx != NONE
                    && self.edge(prev).curr.x == ip.x
                    && self.edge(prev).wind_delta != 0
                {
                    let op = self.add_out_pt(prev, ip);
                    let op2 = self.add_out_pt(e, ip);
                    self.add_join(op, op2, ip);
                }
            }
            e = self.edge(e).next_in_ael;
        }

        self.process_horizontals();
        self.maxima.clear();

        // Step past intermediate vertices.
        e = self.active_edges;
        while e != NONE {
            if self.is_intermediate(e, top_y) {
                let mut op = NONE;
                if self.edge(e).out_idx != NONE {
                    op = self.add_out_pt(e, self.edge(e).top);
                }
                e = self.update_edge_into_ael(e);

                let prev = self.edge(e).prev_in_ael;
                let next = self.edge(e).next_in_ael;
                if op != NONE {
                    if self.continues_collinear(e, prev, false) {
                        let (bot, top) = (self.edge(e).bot, self.edge(e).top);
                        let op2 = self.add_out_pt(prev, bot);
                        self.add_join(op, op2, top);
                    } else if self.continues_collinear(e, next, false) {
                        let (bot, top) = (self.edge(e).bot, self.edge(e).top);
                        let op2 = self.add_out_pt(next, bot);
                        self.add_join(op, op2, top);
                    }
                }
            }
            e = self.edge(e).next_in_ael;
        }
        Ok(())
    }

    /// Whether `other` is a contributing closed edge passing through `e`'s
    /// bottom vertex with the same slope as `e`. `by_deltas` compares the
    /// stored edge deltas instead of current-to-top segments.
    fn continues_collinear(&self, e: EdgeIdx, other: EdgeIdx, by_deltas: bool) -> bool {
        if other == NONE {
            return false;
        }
        let (a, b) = (self.edge(e), self.edge(other));
        let same_slope = if by_deltas {
            crate::geom::deltas_slopes_equal(a.delta, b.delta, self.use_full_range())
        } else {
            slopes_equal4(a.curr, a.top, b.curr, b.top, self.use_full_range())
        };
        b.curr == a.bot
            && b.out_idx != NONE
            && b.curr.y > b.top.y
            && same_slope
            && a.wind_delta != 0
            && b.wind_delta != 0
    }

    fn do_maxima(&mut self, e: EdgeIdx) -> Result<(), ClipError> {
        let max_pair = self.get_maxima_pair_ex(e);
        if max_pair == NONE {
            if self.edge(e).out_idx != NONE {
                self.add_out_pt(e, self.edge(e).top);
            }
            self.delete_from_ael(e);
            return Ok(());
        }

        let top = self.edge(e).top;
        let mut next = self.edge(e).next_in_ael;
        while next != NONE && next != max_pair {
            self.intersect_edges(e, next, top);
            self.swap_positions_in_ael(e, next);
            next = self.edge(e).next_in_ael;
        }

        let (e_out, pair_out) = (self.edge(e).out_idx, self.edge(max_pair).out_idx);
        if e_out == NONE && pair_out == NONE {
            self.delete_from_ael(e);
            self.delete_from_ael(max_pair);
        } else if e_out != NONE && pair_out != NONE {
            self.add_local_max_poly(e, max_pair, top);
            self.delete_from_ael(e);
            self.delete_from_ael(max_pair);
        } else if self.edge(e).wind_delta == 0 {
            if e_out != NONE {
                self.add_out_pt(e, top);
                self.edge_mut(e).out_idx = NONE;
            }
            self.delete_from_ael(e);
            if pair_out != NONE {
                self.add_out_pt(max_pair, top);
                self.edge_mut(max_pair).out_idx = NONE;
            }
            self.delete_from_ael(max_pair);
        } else {
            return Err(ClipError::UnpairedMaxima { y: top.y });
        }
        Ok(())
    }
}
