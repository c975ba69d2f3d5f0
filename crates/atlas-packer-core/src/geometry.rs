use serde::{Deserialize, Serialize};

/// Integer point. Ordering is by `x`, then `y`.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Integer extent. Components may be zero or negative for rejected inputs.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

impl Size {
    pub const ZERO: Size = Size { w: 0, h: 0 };

    pub fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }

    pub fn splat(v: i32) -> Self {
        Self { w: v, h: v }
    }

    pub fn is_zero(&self) -> bool {
        self.w == 0 && self.h == 0
    }

    /// Component-wise saturating addition.
    pub fn grow(self, other: Size) -> Self {
        Self {
            w: self.w.saturating_add(other.w),
            h: self.h.saturating_add(other.h),
        }
    }

    /// Component-wise saturating subtraction.
    pub fn shrink(self, other: Size) -> Self {
        Self {
            w: self.w.saturating_sub(other.w),
            h: self.h.saturating_sub(other.h),
        }
    }

    pub fn area(&self) -> u64 {
        if self.w <= 0 || self.h <= 0 {
            return 0;
        }
        self.w as u64 * self.h as u64
    }
}

/// Axis-aligned rectangle. `x,y` is the top-left corner; the far edges
/// `max_x`/`max_y` are exclusive.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_parts(position: Point, size: Size) -> Self {
        Self::new(position.x, position.y, size.w, size.h)
    }

    /// Rectangle of `size` anchored at the origin.
    pub fn from_size(size: Size) -> Self {
        Self::from_parts(Point::ZERO, size)
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    pub fn max_x(&self) -> i32 {
        self.x.saturating_add(self.w)
    }

    pub fn max_y(&self) -> i32 {
        self.y.saturating_add(self.h)
    }

    pub fn area(&self) -> u64 {
        self.size().area()
    }

    /// True if the interiors overlap. Rectangles sharing only an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        let separated_x = self.max_x() <= other.x || other.max_x() <= self.x;
        let separated_y = self.max_y() <= other.y || other.max_y() <= self.y;
        !separated_x && !separated_y
    }

    /// Half-open containment: `[x, max_x) x [y, max_y)`.
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x && point.y >= self.y && point.x < self.max_x() && point.y < self.max_y()
    }

    /// Closed containment: far edges count as inside.
    pub fn contains_point_inclusive(&self, point: Point) -> bool {
        point.x >= self.x && point.y >= self.y && point.x <= self.max_x() && point.y <= self.max_y()
    }

    /// Returns true if `other` lies fully inside `self`.
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }
}
