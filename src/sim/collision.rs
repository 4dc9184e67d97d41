//! Axis-aligned rectangle tests
//!
//! Both tests use strict (open-interval) comparisons: touching edges never
//! count as overlap and a point on an edge is never inside. Contact therefore
//! requires real penetration past a boundary.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle anchored at its top-left corner (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Zero-extent rectangle at a point
    pub fn at(point: DVec2) -> Self {
        Self::new(point.x, point.y, 0.0, 0.0)
    }

    /// Rectangle spanned from `anchor` to `corner` (extents may be negative)
    pub fn spanning(anchor: DVec2, corner: DVec2) -> Self {
        let extent = corner - anchor;
        Self::new(anchor.x, anchor.y, extent.x, extent.y)
    }

    /// Fold negative extents into the origin; world coverage is unchanged
    pub fn normalized(self) -> Self {
        let mut r = self;
        if r.width < 0.0 {
            r.x += r.width;
            r.width = -r.width;
        }
        if r.height < 0.0 {
            r.y += r.height;
            r.height = -r.height;
        }
        r
    }

    #[inline]
    pub fn min(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max(&self) -> DVec2 {
        DVec2::new(self.x + self.width, self.y + self.height)
    }

    /// Bottom edge in world space
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_degenerate(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    pub fn translated(self, delta: DVec2) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    /// Strict interior containment
    #[inline]
    pub fn contains(&self, p: DVec2) -> bool {
        point_in_rect(p, self)
    }

    /// Strict overlap
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        aabb_overlap(self, other)
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.x, self.y, self.width, self.height]
    }
}

impl From<[f64; 4]> for Rect {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

/// True iff the projections overlap on both axes (open intervals)
#[inline]
pub fn aabb_overlap(a: &Rect, b: &Rect) -> bool {
    let x_overlap = a.x < b.x + b.width && a.x + a.width > b.x;
    let y_overlap = a.y < b.y + b.height && a.y + a.height > b.y;
    x_overlap && y_overlap
}

/// True iff `p` lies strictly inside `r`
#[inline]
pub fn point_in_rect(p: DVec2, r: &Rect) -> bool {
    let x_inside = p.x > r.x && p.x < r.x + r.width;
    let y_inside = p.y > r.y && p.y < r.y + r.height;
    x_inside && y_inside
}
