// Copyright 2025 Lars Brubaker
// WASM bindings for vatti-rust

use vatti_rust::{ClipOptions, ClipType, Clipper, FillRule, IntPoint, Path, Paths, PolyType};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main_js() {
    console_error_panic_hook::set_once();
}

/// A stateful clipper: load subject and clip paths, then execute.
/// Results are read back as one flat coordinate array plus per-path lengths.
#[wasm_bindgen]
pub struct ClipperJs {
    inner: Clipper,
    result: Paths,
    error: Option<String>,
}

#[wasm_bindgen]
impl ClipperJs {
    /// options: bit 0 = ReverseSolution, bit 1 = StrictlySimple, bit 2 = PreserveCollinear.
    #[wasm_bindgen(constructor)]
    pub fn new(options: u32) -> ClipperJs {
        ClipperJs {
            inner: Clipper::with_options(ClipOptions::from_bits(options)),
            result: Paths::new(),
            error: None,
        }
    }

    /// Add a path from a flat [x0,y0, x1,y1, ...] array. Coordinates are rounded to integers.
    /// poly_type: 0=Subject 1=Clip
    pub fn add_path(&mut self, coords: &[f64], poly_type: u32, closed: bool) -> bool {
        let pt = if poly_type == 1 { PolyType::Clip } else { PolyType::Subject };
        match self.inner.add_path(&to_path(coords), pt, closed) {
            Ok(added) => added,
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }

    pub fn clear(&mut self) {
        self.inner.clear();
        self.result.clear();
        self.error = None;
    }

    /// Execute and return true on success.
    /// clip_type: 0=Intersection 1=Union 2=Difference 3=Xor
    /// fill: 0=EvenOdd 1=NonZero 2=Positive 3=Negative
    pub fn execute(&mut self, clip_type: u32, subj_fill: u32, clip_fill: u32) -> bool {
        let ct = match clip_type {
            1 => ClipType::Union,
            2 => ClipType::Difference,
            3 => ClipType::Xor,
            _ => ClipType::Intersection,
        };
        match self.inner.execute(ct, fill_rule(subj_fill), fill_rule(clip_fill)) {
            Ok(paths) => {
                self.result = paths;
                self.error = None;
                true
            }
            Err(e) => {
                self.result.clear();
                self.error = Some(e.to_string());
                false
            }
        }
    }

    pub fn path_count(&self) -> u32 {
        self.result.len() as u32
    }

    /// Vertex count of each result path, in order.
    pub fn get_path_lengths(&self) -> Vec<u32> {
        self.result.iter().map(|p| p.len() as u32).collect()
    }

    /// All result vertices as flat [x0,y0, x1,y1, ...].
    pub fn get_coords(&self) -> Vec<f64> {
        self.result.iter().flatten().flat_map(|p| [p.x as f64, p.y as f64]).collect()
    }

    /// Message of the last failure, if any.
    pub fn last_error(&self) -> Option<String> {
        self.error.clone()
    }
}

fn to_path(coords: &[f64]) -> Path {
    coords.chunks_exact(2).map(|c| IntPoint::new(c[0].round() as i64, c[1].round() as i64)).collect()
}

fn fill_rule(fill: u32) -> FillRule {
    match fill {
        1 => FillRule::NonZero,
        2 => FillRule::Positive,
        3 => FillRule::Negative,
        _ => FillRule::EvenOdd,
    }
}

/// Convenience: union of one flat subject polygon with one flat clip polygon.
/// Returns flat coordinates of all result paths (use ClipperJs for path lengths).
#[wasm_bindgen]
pub fn union_polygons(subject: &[f64], clip: &[f64], fill: u32) -> Vec<f64> {
    let mut c = ClipperJs::new(0);
    c.add_path(subject, 0, true);
    c.add_path(clip, 1, true);
    if !c.execute(1, fill, fill) {
        return Vec::new();
    }
    c.get_coords()
}
