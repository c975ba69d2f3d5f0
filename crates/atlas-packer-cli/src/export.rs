use atlas_packer_core::{BestOrder, PackResult, PackerConfig, RectOrder};
use serde_json::{Value, json};

/// Run-level metadata written next to the layout.
pub struct ExportMeta<'a> {
    pub cfg: &'a PackerConfig,
    pub order: RectOrder,
    pub fill_ratio: f64,
    /// True when `order` was picked by the order search.
    pub searched: bool,
}

impl<'a> ExportMeta<'a> {
    pub fn from_best(cfg: &'a PackerConfig, best: &BestOrder<String>) -> Self {
        Self {
            cfg,
            order: best.order,
            fill_ratio: best.fill_ratio,
            searched: true,
        }
    }

    fn to_value(&self) -> Value {
        json!({
            "app": "atlas-packer",
            "version": env!("CARGO_PKG_VERSION"),
            "padding": self.cfg.padding,
            "maxSize": self.cfg.max_size,
            "order": self.order.as_str(),
            "orderSearched": self.searched,
            "fillRatio": self.fill_ratio,
        })
    }
}

fn not_packed_value(result: &PackResult<String>) -> Value {
    result
        .not_packed
        .iter()
        .map(|r| json!({"id": r.id, "w": r.bounds.w, "h": r.bounds.h}))
        .collect::<Vec<_>>()
        .into()
}

/// `{ atlases: [{ id, width, height, fillRatio, rects: [...] }], notPacked, meta }`.
pub fn to_json_array(result: &PackResult<String>, meta: &ExportMeta<'_>) -> Value {
    let atlases = result
        .atlases
        .iter()
        .enumerate()
        .map(|(i, atlas)| {
            let rects: Vec<Value> = atlas
                .rects
                .iter()
                .map(|r| {
                    json!({
                        "id": r.id,
                        "frame": {"x": r.bounds.x, "y": r.bounds.y, "w": r.bounds.w, "h": r.bounds.h},
                    })
                })
                .collect();
            json!({
                "id": i,
                "width": atlas.size.w,
                "height": atlas.size.h,
                "fillRatio": atlas.fill_ratio(),
                "rects": rects,
            })
        })
        .collect::<Vec<_>>();
    json!({
        "atlases": atlases,
        "notPacked": not_packed_value(result),
        "meta": meta.to_value(),
    })
}

/// Flatten placements keyed by id, with atlas index and size hints.
/// Shape: `{ frames: { id: { frame, atlas, atlasSize } }, notPacked, meta }`.
pub fn to_json_hash(result: &PackResult<String>, meta: &ExportMeta<'_>) -> Value {
    let mut frames = serde_json::Map::new();
    for (i, atlas) in result.atlases.iter().enumerate() {
        for r in &atlas.rects {
            frames.insert(
                r.id.clone(),
                json!({
                    "frame": {"x": r.bounds.x, "y": r.bounds.y, "w": r.bounds.w, "h": r.bounds.h},
                    "atlas": i,
                    "atlasSize": {"w": atlas.size.w, "h": atlas.size.h},
                }),
            );
        }
    }
    json!({
        "frames": frames,
        "notPacked": not_packed_value(result),
        "meta": meta.to_value(),
    })
}
