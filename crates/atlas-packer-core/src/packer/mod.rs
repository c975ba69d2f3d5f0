use std::fmt;

use tracing::{debug, warn};

use crate::config::PackerConfig;
use crate::geometry::{Rect, Size};
use crate::model::{Atlas, AtlasRect, PackResult};

pub mod context;

pub use context::{ExpandCandidate, PackingContext};

/// Multi-atlas orchestrator.
///
/// Rectangles are added one at a time. Each goes to the cheapest placement across all
/// open atlases; a new atlas is opened only when none of them can hold it, even after
/// growing. Rectangles that can never fit are collected instead of failing the run.
#[derive(Debug, Clone)]
pub struct AtlasPacker<K = String> {
    config: PackerConfig,
    padding: Size,
    max_size: i32,
    contexts: Vec<PackingContext<K>>,
    not_packed: Vec<AtlasRect<K>>,
}

impl<K> AtlasPacker<K> {
    pub fn new(config: PackerConfig) -> Self {
        Self {
            padding: config.padding_size(),
            max_size: config.padded_max_size(),
            config,
            contexts: Vec::new(),
            not_packed: Vec::new(),
        }
    }

    pub fn config(&self) -> &PackerConfig {
        &self.config
    }

    /// Open contexts, one per atlas, in creation order.
    pub fn contexts(&self) -> &[PackingContext<K>] {
        &self.contexts
    }

    pub fn atlas_count(&self) -> usize {
        self.contexts.len()
    }

    pub fn not_packed(&self) -> &[AtlasRect<K>] {
        &self.not_packed
    }

    /// Discards all atlases and rejected rectangles.
    pub fn reset(&mut self) {
        self.contexts.clear();
        self.not_packed.clear();
    }
}

impl<K> Default for AtlasPacker<K> {
    fn default() -> Self {
        Self::new(PackerConfig::default())
    }
}

impl<K: Clone + fmt::Debug> AtlasPacker<K> {
    /// Packs a rectangle of `w` x `h`.
    ///
    /// Returns the index of the atlas it was placed in, or `None` if it went to the
    /// un-packable list.
    pub fn add_rect(&mut self, w: i32, h: i32, id: K) -> Option<usize> {
        if w <= 0 || h <= 0 {
            warn!(?id, width = w, height = h, "invalid size for packing");
            self.reject(id, Size::new(w, h));
            return None;
        }

        let size = Size::new(w, h).grow(self.padding);
        if size.w > self.max_size || size.h > self.max_size {
            warn!(?id, width = w, height = h, "rect exceeds max atlas size");
            self.reject(id, Size::new(w, h));
            return None;
        }

        if self.contexts.is_empty() {
            self.contexts.push(PackingContext::new(size, self.max_size));
        }

        let mut best: Option<(usize, ExpandCandidate)> = None;
        for index in 0..self.contexts.len() {
            let Some(candidate) = self.contexts[index].try_get_placement(size) else {
                continue;
            };
            if candidate.is_exact_fit() {
                self.contexts[index].insert(candidate.bounds, id);
                return Some(index);
            }
            if best.is_none_or(|(_, b)| candidate.area_penalty < b.area_penalty) {
                best = Some((index, candidate));
            }
        }

        if let Some((index, candidate)) = best {
            let context = &mut self.contexts[index];
            context.expand(candidate.delta);
            context.insert(candidate.bounds, id);
            return Some(index);
        }

        if self.contexts.last().is_some_and(PackingContext::is_empty) {
            warn!(?id, width = w, height = h, "cannot pack rect");
            self.reject(id, Size::new(w, h));
            return None;
        }

        let index = self.contexts.len();
        debug!(atlas = index, ?id, width = w, height = h, "opening new atlas");
        let mut context = PackingContext::new(size, self.max_size);
        context.insert(Rect::from_size(size), id);
        self.contexts.push(context);
        Some(index)
    }

    /// Adds every rectangle in order. Only the size of each input is read.
    pub fn add_rects<'a, I>(&mut self, rects: I)
    where
        I: IntoIterator<Item = &'a AtlasRect<K>>,
        K: 'a,
    {
        for rect in rects {
            self.add_rect(rect.bounds.w, rect.bounds.h, rect.id.clone());
        }
    }

    /// Reported view of atlas `index`: padding removed from the size and every placement.
    pub fn atlas(&self, index: usize) -> Option<Atlas<K>> {
        let context = self.contexts.get(index)?;
        let rects = context
            .placed()
            .iter()
            .map(|r| AtlasRect {
                id: r.id.clone(),
                bounds: Rect::from_parts(
                    r.bounds.position(),
                    r.bounds.size().shrink(self.padding),
                ),
            })
            .collect();
        Some(Atlas {
            size: context.size().shrink(self.padding),
            rects,
        })
    }

    /// Snapshot of the current state as a [`PackResult`].
    pub fn result(&self) -> PackResult<K> {
        PackResult {
            atlases: (0..self.contexts.len())
                .filter_map(|i| self.atlas(i))
                .collect(),
            not_packed: self.not_packed.clone(),
        }
    }

    /// Returns the current result and resets the packer.
    pub fn take_result(&mut self) -> PackResult<K> {
        let result = self.result();
        self.reset();
        result
    }

    fn reject(&mut self, id: K, size: Size) {
        self.not_packed.push(AtlasRect {
            id,
            bounds: Rect::from_size(size),
        });
    }
}
