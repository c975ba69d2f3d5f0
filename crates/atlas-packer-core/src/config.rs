use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::AtlasRect;

/// Insertion orders tried by the order search.
/// Every order sorts descending; ties on the primary key fall back to the secondary key,
/// then to input order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum RectOrder {
    #[default]
    HeightThenWidth,
    WidthThenHeight,
    AreaThenHeight,
    AreaThenWidth,
}

impl RectOrder {
    /// All orders, in the sequence the order search evaluates them.
    pub const ALL: [RectOrder; 4] = [
        RectOrder::HeightThenWidth,
        RectOrder::WidthThenHeight,
        RectOrder::AreaThenHeight,
        RectOrder::AreaThenWidth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RectOrder::HeightThenWidth => "height_then_width",
            RectOrder::WidthThenHeight => "width_then_height",
            RectOrder::AreaThenHeight => "area_then_height",
            RectOrder::AreaThenWidth => "area_then_width",
        }
    }

    /// Sorts `rects` in place. The sort is stable.
    pub fn sort<K>(&self, rects: &mut [AtlasRect<K>]) {
        let area = |r: &AtlasRect<K>| r.bounds.w as i64 * r.bounds.h as i64;
        match self {
            RectOrder::HeightThenWidth => rects.sort_by(|a, b| {
                b.bounds
                    .h
                    .cmp(&a.bounds.h)
                    .then_with(|| b.bounds.w.cmp(&a.bounds.w))
            }),
            RectOrder::WidthThenHeight => rects.sort_by(|a, b| {
                b.bounds
                    .w
                    .cmp(&a.bounds.w)
                    .then_with(|| b.bounds.h.cmp(&a.bounds.h))
            }),
            RectOrder::AreaThenHeight => rects.sort_by(|a, b| {
                area(b)
                    .cmp(&area(a))
                    .then_with(|| b.bounds.h.cmp(&a.bounds.h))
            }),
            RectOrder::AreaThenWidth => rects.sort_by(|a, b| {
                area(b)
                    .cmp(&area(a))
                    .then_with(|| b.bounds.w.cmp(&a.bounds.w))
            }),
        }
    }
}

impl fmt::Display for RectOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RectOrder {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "height_then_width" | "htw" | "height" => Ok(Self::HeightThenWidth),
            "width_then_height" | "wth" | "width" => Ok(Self::WidthThenHeight),
            "area_then_height" | "ath" => Ok(Self::AreaThenHeight),
            "area_then_width" | "atw" => Ok(Self::AreaThenWidth),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackerConfig {
    /// Gap reserved to the right and below every placed rectangle (pixels).
    #[serde(default = "default_padding")]
    pub padding: u32,
    /// Maximum atlas size per axis, before padding is added internally.
    #[serde(default = "default_max_size")]
    pub max_size: u32,
    /// Evaluate sort orders in parallel when feature "parallel" is on.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            padding: default_padding(),
            max_size: default_max_size(),
            parallel: false,
        }
    }
}

impl PackerConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if the max size is zero, or if padding added to the max size
    /// does not fit the packer's signed coordinate space.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::PackerError;

        if self.max_size == 0 {
            return Err(PackerError::InvalidMaxSize(self.max_size));
        }

        let padded = self.max_size as u64 + self.padding as u64;
        if padded > i32::MAX as u64 {
            return Err(PackerError::InvalidConfig(format!(
                "max_size ({}) + padding ({}) exceeds {}",
                self.max_size,
                self.padding,
                i32::MAX
            )));
        }

        Ok(())
    }

    /// Padding as a signed per-axis extent.
    pub(crate) fn padding_size(&self) -> crate::geometry::Size {
        crate::geometry::Size::splat(clamp_i32(self.padding))
    }

    /// Max size with padding added, as used internally by the contexts.
    pub(crate) fn padded_max_size(&self) -> i32 {
        clamp_i32(self.max_size).saturating_add(clamp_i32(self.padding))
    }
}

fn clamp_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

fn default_padding() -> u32 {
    2
}
fn default_max_size() -> u32 {
    4096
}

/// Builder for `PackerConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PackerConfigBuilder {
    cfg: PackerConfig,
}

impl PackerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PackerConfig::default(),
        }
    }
    pub fn padding(mut self, v: u32) -> Self {
        self.cfg.padding = v;
        self
    }
    pub fn max_size(mut self, v: u32) -> Self {
        self.cfg.max_size = v;
        self
    }
    pub fn parallel(mut self, v: bool) -> Self {
        self.cfg.parallel = v;
        self
    }
    pub fn build(self) -> PackerConfig {
        self.cfg
    }
}

impl PackerConfig {
    /// Create a fluent builder for `PackerConfig`.
    pub fn builder() -> PackerConfigBuilder {
        PackerConfigBuilder::new()
    }
}
