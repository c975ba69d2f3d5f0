use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Size};

/// A rectangle tagged with a caller-assigned identifier.
///
/// Used both as packer input (only `bounds.w`/`bounds.h` are read) and as output,
/// where `bounds` is the placement inside an atlas, or the rejected size for
/// rectangles that could not be packed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AtlasRect<K = String> {
    pub id: K,
    pub bounds: Rect,
}

impl<K> AtlasRect<K> {
    /// Input rectangle of size `w` x `h` at the origin.
    pub fn new(id: K, w: i32, h: i32) -> Self {
        Self {
            id,
            bounds: Rect::new(0, 0, w, h),
        }
    }

    pub fn size(&self) -> Size {
        self.bounds.size()
    }
}

/// One output atlas: its reported size and the rectangles placed in it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Atlas<K = String> {
    pub size: Size,
    pub rects: Vec<AtlasRect<K>>,
}

impl<K> Atlas<K> {
    pub fn total_area(&self) -> u64 {
        self.size.area()
    }

    /// Sum of the placed rectangles' areas.
    pub fn used_area(&self) -> u64 {
        self.rects.iter().map(|r| r.bounds.area()).sum()
    }

    /// `used_area / total_area`, or 0 for a degenerate atlas.
    pub fn fill_ratio(&self) -> f64 {
        let total = self.total_area();
        if total == 0 {
            return 0.0;
        }
        self.used_area() as f64 / total as f64
    }
}

/// Outcome of a packing run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackResult<K = String> {
    /// Atlases in creation order.
    pub atlases: Vec<Atlas<K>>,
    /// Rectangles rejected as invalid or too large, in the order they were seen.
    pub not_packed: Vec<AtlasRect<K>>,
}

impl<K> Default for PackResult<K> {
    fn default() -> Self {
        Self {
            atlases: Vec::new(),
            not_packed: Vec::new(),
        }
    }
}

impl<K> PackResult<K> {
    /// Area-weighted average fill ratio over all atlases: `Σ used / Σ total`.
    /// Zero when there are no atlases or all of them are degenerate.
    pub fn average_fill_ratio(&self) -> f64 {
        let total: u64 = self.atlases.iter().map(Atlas::total_area).sum();
        if total == 0 {
            return 0.0;
        }
        let used: f64 = self
            .atlases
            .iter()
            .map(|a| a.fill_ratio() * a.total_area() as f64)
            .sum();
        used / total as f64
    }

    /// Number of rectangles that were placed in some atlas.
    pub fn packed_count(&self) -> usize {
        self.atlases.iter().map(|a| a.rects.len()).sum()
    }

    /// Iterates `(atlas_index, placed_rect)` across all atlases.
    pub fn placements(&self) -> impl Iterator<Item = (usize, &AtlasRect<K>)> {
        self.atlases
            .iter()
            .enumerate()
            .flat_map(|(i, a)| a.rects.iter().map(move |r| (i, r)))
    }

    /// Computes packing statistics for this result.
    pub fn stats(&self) -> PackStats {
        let num_atlases = self.atlases.len();
        let mut num_rects = 0;
        let mut total_atlas_area = 0u64;
        let mut used_area = 0u64;
        let mut max_atlas_width = 0i32;
        let mut max_atlas_height = 0i32;

        for atlas in &self.atlases {
            total_atlas_area += atlas.total_area();
            used_area += atlas.used_area();
            num_rects += atlas.rects.len();
            max_atlas_width = max_atlas_width.max(atlas.size.w);
            max_atlas_height = max_atlas_height.max(atlas.size.h);
        }

        let occupancy = if total_atlas_area > 0 {
            used_area as f64 / total_atlas_area as f64
        } else {
            0.0
        };

        let (avg_atlas_width, avg_atlas_height) = if num_atlases > 0 {
            let total_width: i64 = self.atlases.iter().map(|a| a.size.w as i64).sum();
            let total_height: i64 = self.atlases.iter().map(|a| a.size.h as i64).sum();
            (
                total_width as f64 / num_atlases as f64,
                total_height as f64 / num_atlases as f64,
            )
        } else {
            (0.0, 0.0)
        };

        PackStats {
            num_atlases,
            num_rects,
            num_not_packed: self.not_packed.len(),
            total_atlas_area,
            used_area,
            occupancy,
            avg_atlas_width,
            avg_atlas_height,
            max_atlas_width,
            max_atlas_height,
        }
    }
}

/// Statistics about packing efficiency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PackStats {
    pub num_atlases: usize,
    /// Rectangles placed in some atlas.
    pub num_rects: usize,
    /// Rectangles routed to the un-packable list.
    pub num_not_packed: usize,
    /// Sum of atlas areas (reported sizes, padding excluded).
    pub total_atlas_area: u64,
    /// Sum of placed rectangle areas.
    pub used_area: u64,
    /// used_area / total_atlas_area (0.0 to 1.0). Same value as `average_fill_ratio`.
    pub occupancy: f64,
    pub avg_atlas_width: f64,
    pub avg_atlas_height: f64,
    pub max_atlas_width: i32,
    pub max_atlas_height: i32,
}

impl PackStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Atlases: {}, Rects: {}, Not packed: {}, Occupancy: {:.2}%, Total Area: {} px², Used Area: {} px²",
            self.num_atlases,
            self.num_rects,
            self.num_not_packed,
            self.occupancy * 100.0,
            self.total_atlas_area,
            self.used_area,
        )
    }

    /// Returns wasted space in pixels.
    pub fn wasted_area(&self) -> u64 {
        self.total_atlas_area.saturating_sub(self.used_area)
    }

    /// Returns wasted space as a percentage (0.0 to 100.0).
    pub fn waste_percentage(&self) -> f64 {
        if self.total_atlas_area > 0 {
            (self.wasted_area() as f64 / self.total_atlas_area as f64) * 100.0
        } else {
            0.0
        }
    }
}
