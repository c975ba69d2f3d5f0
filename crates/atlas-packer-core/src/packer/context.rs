use crate::geometry::{Point, Rect, Size};
use crate::model::AtlasRect;

/// Result of a placement query against one context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpandCandidate {
    /// Growth needed per axis. Zero means the rectangle fits without growing.
    pub delta: Size,
    /// Absolute bounds the rectangle would occupy.
    pub bounds: Rect,
    /// Marginal area added by the growth, weighted by the current aspect ratio.
    pub area_penalty: f64,
}

impl ExpandCandidate {
    pub fn is_exact_fit(&self) -> bool {
        self.delta.is_zero()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn point(self, value: i32, cross: i32) -> Point {
        match self {
            Axis::X => Point::new(value, cross),
            Axis::Y => Point::new(cross, value),
        }
    }
}

/// Placement state for a single growable atlas.
///
/// Free space is tracked sparsely: `x_lines`/`y_lines` hold every distinct right/bottom
/// edge seen so far (plus zero), and `points` holds the grid intersections not covered
/// by a placed rectangle. Only those points are tried as top-left corners.
///
/// All rectangles stored here include padding.
#[derive(Debug, Clone)]
pub struct PackingContext<K> {
    size: Size,
    max_size: i32,
    placed: Vec<AtlasRect<K>>,
    // sorted by (x, y), no duplicates
    points: Vec<Point>,
    // sorted, no duplicates, always contain 0
    x_lines: Vec<i32>,
    y_lines: Vec<i32>,
}

impl<K> PackingContext<K> {
    /// Creates an empty context of `initial_size` that may grow up to `max_size` per axis.
    pub fn new(initial_size: Size, max_size: i32) -> Self {
        Self {
            size: initial_size,
            max_size,
            placed: Vec::new(),
            points: vec![Point::ZERO],
            x_lines: vec![0],
            y_lines: vec![0],
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn max_size(&self) -> i32 {
        self.max_size
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    pub fn placed(&self) -> &[AtlasRect<K>] {
        &self.placed
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn x_lines(&self) -> &[i32] {
        &self.x_lines
    }

    pub fn y_lines(&self) -> &[i32] {
        &self.y_lines
    }

    /// Finds the best spot for a rectangle of `size`.
    ///
    /// The first exact fit (in point order) wins outright; otherwise the candidate with
    /// the lowest area penalty is returned, earlier points winning ties.
    pub fn try_get_placement(&self, size: Size) -> Option<ExpandCandidate> {
        let mut best: Option<ExpandCandidate> = None;

        for &point in &self.points {
            let rect = Rect::from_parts(point, size);
            if self.intersects_placed(&rect) {
                continue;
            }
            let Some(candidate) = self.expand_candidate(rect) else {
                continue;
            };
            if candidate.is_exact_fit() {
                return Some(candidate);
            }
            if best.is_none_or(|b| candidate.area_penalty < b.area_penalty) {
                best = Some(candidate);
            }
        }

        best
    }

    /// Commits a placement. The caller must have validated `bounds` with
    /// [`try_get_placement`](Self::try_get_placement) and applied any growth first.
    pub fn insert(&mut self, bounds: Rect, id: K) {
        self.placed.push(AtlasRect { id, bounds });
        self.points.retain(|p| !bounds.contains_point(*p));

        self.process_new_line(Axis::X, bounds.max_x());
        self.process_new_line(Axis::Y, bounds.max_y());
    }

    /// Grows the atlas by `delta`.
    ///
    /// An old edge that no placed rectangle ends on stops being a grid line, and the
    /// points on it are dropped. The new edge becomes a grid line.
    pub fn expand(&mut self, delta: Size) {
        let old = self.size;
        self.size = self.size.grow(delta);

        if delta.w != 0 {
            if !self.placed.iter().any(|r| r.bounds.max_x() == old.w) {
                self.x_lines.retain(|&x| x != old.w);
                self.points.retain(|p| p.x != old.w);
            }
            self.process_new_line(Axis::X, self.size.w);
        }

        if delta.h != 0 {
            if !self.placed.iter().any(|r| r.bounds.max_y() == old.h) {
                self.y_lines.retain(|&y| y != old.h);
                self.points.retain(|p| p.y != old.h);
            }
            self.process_new_line(Axis::Y, self.size.h);
        }
    }

    fn expand_candidate(&self, rect: Rect) -> Option<ExpandCandidate> {
        if rect.max_x() > self.max_size || rect.max_y() > self.max_size {
            return None;
        }

        let delta = Size::new(
            (rect.max_x() - self.size.w).max(0),
            (rect.max_y() - self.size.h).max(0),
        );

        let (w, h) = (self.size.w as f64, self.size.h as f64);
        let area_penalty = delta.w as f64 * h * (w / h) + delta.h as f64 * w * (h / w);

        Some(ExpandCandidate {
            delta,
            bounds: rect,
            area_penalty,
        })
    }

    fn process_new_line(&mut self, axis: Axis, value: i32) {
        let (lines, cross) = match axis {
            Axis::X => (&mut self.x_lines, &self.y_lines),
            Axis::Y => (&mut self.y_lines, &self.x_lines),
        };
        let Err(index) = lines.binary_search(&value) else {
            return;
        };
        lines.insert(index, value);

        for &c in cross {
            insert_point(&mut self.points, &self.placed, axis.point(value, c));
        }
    }

    fn intersects_placed(&self, rect: &Rect) -> bool {
        self.placed.iter().any(|r| r.bounds.intersects(rect))
    }
}

fn insert_point<K>(points: &mut Vec<Point>, placed: &[AtlasRect<K>], point: Point) {
    if placed.iter().any(|r| r.bounds.contains_point(point)) {
        return;
    }
    if let Err(index) = points.binary_search(&point) {
        points.insert(index, point);
    }
}
