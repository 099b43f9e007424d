// Copyright 2025 Lars Brubaker
// License: MIT
//
// Integer geometry shared by the clipping engine and its utilities.
//
// Coordinates are i64. Predicates that multiply coordinate differences
// have two variants: a plain i64 path for coordinates within LO_RANGE and
// an i128 path once any input coordinate exceeds it.

pub type CInt = i64;

/// Largest magnitude for which 64-bit products of coordinate deltas cannot overflow.
pub const LO_RANGE: CInt = 0x3FFF_FFFF;
/// Largest magnitude accepted at all.
pub const HI_RANGE: CInt = 0x3FFF_FFFF_FFFF_FFFF;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntPoint {
    pub x: CInt,
    pub y: CInt,
}

impl IntPoint {
    #[inline]
    pub const fn new(x: CInt, y: CInt) -> Self {
        IntPoint { x, y }
    }
}

impl From<(CInt, CInt)> for IntPoint {
    fn from((x, y): (CInt, CInt)) -> Self {
        IntPoint { x, y }
    }
}

pub type Path = Vec<IntPoint>;
pub type Paths = Vec<Path>;

/// Axis-aligned bounds of a path collection.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct IntRect {
    pub left: CInt,
    pub top: CInt,
    pub right: CInt,
    pub bottom: CInt,
}

/// Where a point lies relative to a closed polygon.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointLocation {
    Outside,
    Inside,
    OnBoundary,
}

/// Builds a path from `(x, y)` tuples.
pub fn path_from(coords: &[(CInt, CInt)]) -> Path {
    coords.iter().map(|&p| IntPoint::from(p)).collect()
}

// ─────────────────────────── Range handling ───────────────────────────────────

/// Outcome of checking one point against the coordinate ranges.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum RangeCheck {
    Ok,
    NeedsFullRange,
    OutOfRange,
}

pub(crate) fn range_test(pt: IntPoint, use_full_range: bool) -> RangeCheck {
    let over = |limit: CInt| pt.x > limit || pt.y > limit || -pt.x > limit || -pt.y > limit;
    if pt.x == CInt::MIN || pt.y == CInt::MIN || over(HI_RANGE) {
        RangeCheck::OutOfRange
    } else if !use_full_range && over(LO_RANGE) {
        RangeCheck::NeedsFullRange
    } else {
        RangeCheck::Ok
    }
}

// ─────────────────────────── Slope predicates ─────────────────────────────────

#[inline]
fn cross_equal(dy1: CInt, dx2: CInt, dx1: CInt, dy2: CInt, use_full_range: bool) -> bool {
    if use_full_range {
        (dy1 as i128) * (dx2 as i128) == (dx1 as i128) * (dy2 as i128)
    } else {
        dy1 * dx2 == dx1 * dy2
    }
}

/// True when segment (pt1,pt2) and segment (pt2,pt3) have the same slope.
#[inline]
pub fn slopes_equal3(pt1: IntPoint, pt2: IntPoint, pt3: IntPoint, use_full_range: bool) -> bool {
    cross_equal(pt1.y - pt2.y, pt2.x - pt3.x, pt1.x - pt2.x, pt2.y - pt3.y, use_full_range)
}

/// True when segment (pt1,pt2) and segment (pt3,pt4) have the same slope.
#[inline]
pub fn slopes_equal4(
    pt1: IntPoint,
    pt2: IntPoint,
    pt3: IntPoint,
    pt4: IntPoint,
    use_full_range: bool,
) -> bool {
    cross_equal(pt1.y - pt2.y, pt3.x - pt4.x, pt1.x - pt2.x, pt3.y - pt4.y, use_full_range)
}

/// Same slope test on precomputed deltas (dx, dy) of two edges.
#[inline]
pub(crate) fn deltas_slopes_equal(d1: IntPoint, d2: IntPoint, use_full_range: bool) -> bool {
    cross_equal(d1.y, d2.x, d1.x, d2.y, use_full_range)
}

/// True if pt2 lies strictly between pt1 and pt3 on their common line.
pub fn pt2_is_between_pt1_and_pt3(pt1: IntPoint, pt2: IntPoint, pt3: IntPoint) -> bool {
    if pt1 == pt3 || pt1 == pt2 || pt3 == pt2 {
        false
    } else if pt1.x != pt3.x {
        (pt2.x > pt1.x) == (pt2.x < pt3.x)
    } else {
        (pt2.y > pt1.y) == (pt2.y < pt3.y)
    }
}

/// Rounds half away from zero, truncating toward zero after the shift.
#[inline]
pub(crate) fn round(value: f64) -> CInt {
    if value < 0.0 {
        (value - 0.5) as CInt
    } else {
        (value + 0.5) as CInt
    }
}

// ─────────────────────────── Polygon measures ─────────────────────────────────

/// Signed area. Positive when the path is counter-clockwise in a Y-up frame.
pub fn area(poly: &[IntPoint]) -> f64 {
    let n = poly.len();
    if n < 3 {
        return 0.0;
    }
    let mut a = 0.0;
    let mut j = n - 1;
    for i in 0..n {
        a += (poly[j].x as f64 + poly[i].x as f64) * (poly[j].y as f64 - poly[i].y as f64);
        j = i;
    }
    -a * 0.5
}

/// True for non-negative signed area.
pub fn orientation(poly: &[IntPoint]) -> bool {
    area(poly) >= 0.0
}

/// Crossing-number test shared by the path and ring forms.
///
/// `edges` yields consecutive vertex pairs covering the closed polygon.
pub(crate) fn locate_point<I>(pt: IntPoint, edges: I) -> PointLocation
where
    I: IntoIterator<Item = (IntPoint, IntPoint)>,
{
    let mut inside = false;
    for (ip, ip_next) in edges {
        if ip_next.y == pt.y
            && (ip_next.x == pt.x || (ip.y == pt.y && ((ip_next.x > pt.x) == (ip.x < pt.x))))
        {
            return PointLocation::OnBoundary;
        }
        if (ip.y < pt.y) != (ip_next.y < pt.y) {
            if ip.x >= pt.x {
                if ip_next.x > pt.x {
                    inside = !inside;
                } else {
                    let d = (ip.x - pt.x) as f64 * (ip_next.y - pt.y) as f64
                        - (ip_next.x - pt.x) as f64 * (ip.y - pt.y) as f64;
                    if d == 0.0 {
                        return PointLocation::OnBoundary;
                    }
                    if (d > 0.0) == (ip_next.y > ip.y) {
                        inside = !inside;
                    }
                }
            } else if ip_next.x > pt.x {
                let d = (ip.x - pt.x) as f64 * (ip_next.y - pt.y) as f64
                    - (ip_next.x - pt.x) as f64 * (ip.y - pt.y) as f64;
                if d == 0.0 {
                    return PointLocation::OnBoundary;
                }
                if (d > 0.0) == (ip_next.y > ip.y) {
                    inside = !inside;
                }
            }
        }
    }
    if inside {
        PointLocation::Inside
    } else {
        PointLocation::Outside
    }
}

/// Classifies `pt` against the closed polygon `path`.
/// Paths with fewer than three vertices contain nothing.
pub fn point_in_polygon(pt: IntPoint, path: &[IntPoint]) -> PointLocation {
    let n = path.len();
    if n < 3 {
        return PointLocation::Outside;
    }
    let pairs = (0..n).map(|i| (path[i], path[(i + 1) % n]));
    locate_point(pt, pairs)
}

pub fn get_bounds(paths: &[Path]) -> IntRect {
    let mut pts = paths.iter().flat_map(|p| p.iter());
    let first = match pts.next() {
        Some(p) => *p,
        None => return IntRect::default(),
    };
    let mut r = IntRect { left: first.x, top: first.y, right: first.x, bottom: first.y };
    for p in pts {
        r.left = r.left.min(p.x);
        r.right = r.right.max(p.x);
        r.top = r.top.min(p.y);
        r.bottom = r.bottom.max(p.y);
    }
    r
}

pub(crate) fn distance_sqrd(pt1: IntPoint, pt2: IntPoint) -> f64 {
    let dx = pt1.x as f64 - pt2.x as f64;
    let dy = pt1.y as f64 - pt2.y as f64;
    dx * dx + dy * dy
}

/// Squared perpendicular distance from `pt` to the line through ln1 and ln2.
pub(crate) fn distance_from_line_sqrd(pt: IntPoint, ln1: IntPoint, ln2: IntPoint) -> f64 {
    let a = (ln1.y - ln2.y) as f64;
    let b = (ln2.x - ln1.x) as f64;
    let c = a * ln1.x as f64 + b * ln1.y as f64;
    let c = a * pt.x as f64 + b * pt.y as f64 - c;
    (c * c) / (a * a + b * b)
}

/// Whether the middle point of the three (by extent) lies within `dist_sqrd` of the
/// line through the other two.
pub(crate) fn slopes_near_collinear(pt1: IntPoint, pt2: IntPoint, pt3: IntPoint, dist_sqrd: f64) -> bool {
    if (pt1.x - pt2.x).abs() > (pt1.y - pt2.y).abs() {
        if (pt1.x > pt2.x) == (pt1.x < pt3.x) {
            distance_from_line_sqrd(pt1, pt2, pt3) < dist_sqrd
        } else if (pt2.x > pt1.x) == (pt2.x < pt3.x) {
            distance_from_line_sqrd(pt2, pt1, pt3) < dist_sqrd
        } else {
            distance_from_line_sqrd(pt3, pt1, pt2) < dist_sqrd
        }
    } else if (pt1.y > pt2.y) == (pt1.y < pt3.y) {
        distance_from_line_sqrd(pt1, pt2, pt3) < dist_sqrd
    } else if (pt2.y > pt1.y) == (pt2.y < pt3.y) {
        distance_from_line_sqrd(pt2, pt1, pt3) < dist_sqrd
    } else {
        distance_from_line_sqrd(pt3, pt1, pt2) < dist_sqrd
    }
}

#[inline]
pub(crate) fn points_are_close(pt1: IntPoint, pt2: IntPoint, dist_sqrd: f64) -> bool {
    distance_sqrd(pt1, pt2) <= dist_sqrd
}
