// vatti-rust: polygon boolean clipping with a Vatti scanline sweep
// Copyright 2025 Lars Brubaker
// License: MIT

pub mod arena;
pub mod clipper;
pub mod edge;
pub mod error;
pub mod geom;
pub mod ops;
pub mod polytree;
pub mod scanbeam;
pub mod winding;

pub use clipper::{ClipOption, ClipOptions, Clipper};
pub use edge::PolyType;
pub use error::{ClipError, ErrorKind};
pub use geom::{
    area, get_bounds, orientation, path_from, point_in_polygon, CInt, IntPoint, IntRect, Path, Paths,
    PointLocation, HI_RANGE, LO_RANGE,
};
pub use ops::{
    boolean, clean_polygon, clean_polygons, closed_paths_from_polytree, minkowski_diff, minkowski_sum,
    minkowski_sum_paths, open_paths_from_polytree, polytree_to_paths, reverse_paths, simplify_polygon,
    simplify_polygons, DEFAULT_CLEAN_DISTANCE,
};
pub use polytree::{NodeIdx, PolyNode, PolyTree};
pub use winding::{ClipType, FillRule};
