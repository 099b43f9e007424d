// Copyright 2025 Lars Brubaker
// License: MIT
//
// Fill rules, boolean operations and the contribution table.
//
// An edge contributes to the output when its own winding count marks it as
// a boundary of its own polygon set under that set's fill rule, and the
// other set's winding count at the edge satisfies the operation:
//
//   intersection  other set filled
//   union         other set empty
//   difference    subject edges: clip empty / clip edges: subject filled
//   xor           always (open paths: other set empty)

use crate::edge::PolyType;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FillRule {
    #[default]
    EvenOdd,
    NonZero,
    Positive,
    Negative,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClipType {
    Intersection,
    Union,
    Difference,
    Xor,
}

impl FillRule {
    pub const ALL: [FillRule; 4] = [FillRule::EvenOdd, FillRule::NonZero, FillRule::Positive, FillRule::Negative];

    /// Whether a region with winding count `cnt` is filled. Even-odd counts
    /// on the other-set side are kept as 0/1, so any non-zero value is filled.
    #[inline]
    pub fn is_filled(self, cnt: i32) -> bool {
        match self {
            FillRule::EvenOdd | FillRule::NonZero => cnt != 0,
            FillRule::Positive => cnt > 0,
            FillRule::Negative => cnt < 0,
        }
    }

    /// Normalizes a winding count so that 0 = outside, 1 = on a boundary
    /// and >1 = deep inside.
    #[inline]
    pub fn fill_count(self, cnt: i32) -> i32 {
        match self {
            FillRule::Positive => cnt,
            FillRule::Negative => -cnt,
            FillRule::EvenOdd | FillRule::NonZero => cnt.abs(),
        }
    }
}

impl ClipType {
    pub const ALL: [ClipType; 4] = [ClipType::Intersection, ClipType::Union, ClipType::Difference, ClipType::Xor];
}

/// Fill rules seen from one edge: its own set's rule and the other set's.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EdgeRules {
    pub own: FillRule,
    pub other: FillRule,
}

impl EdgeRules {
    pub fn for_poly(poly_type: PolyType, subject: FillRule, clip: FillRule) -> Self {
        match poly_type {
            PolyType::Subject => EdgeRules { own: subject, other: clip },
            PolyType::Clip => EdgeRules { own: clip, other: subject },
        }
    }
}

/// Whether the own-set winding count puts the edge on its own set's boundary.
#[inline]
pub fn own_count_qualifies(rule: FillRule, wind_delta: i32, wind_cnt: i32) -> bool {
    match rule {
        FillRule::EvenOdd => wind_delta != 0 || wind_cnt == 1,
        FillRule::NonZero => wind_cnt.abs() == 1,
        FillRule::Positive => wind_cnt == 1,
        FillRule::Negative => wind_cnt == -1,
    }
}

/// The full contribution decision for an edge entering or crossing the sweep.
pub fn is_contributing(
    clip_type: ClipType,
    poly_type: PolyType,
    rules: EdgeRules,
    wind_delta: i32,
    wind_cnt: i32,
    wind_cnt2: i32,
) -> bool {
    if !own_count_qualifies(rules.own, wind_delta, wind_cnt) {
        return false;
    }
    let other_filled = rules.other.is_filled(wind_cnt2);
    match clip_type {
        ClipType::Intersection => other_filled,
        ClipType::Union => !other_filled,
        ClipType::Difference => match poly_type {
            PolyType::Subject => !other_filled,
            PolyType::Clip => other_filled,
        },
        ClipType::Xor => wind_delta != 0 || !other_filled,
    }
}
