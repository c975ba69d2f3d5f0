use std::fmt;

use tracing::{debug, instrument};

use crate::config::{PackerConfig, RectOrder};
use crate::model::{AtlasRect, PackResult};
use crate::packer::AtlasPacker;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Result of an order search: the winning layout and the order that produced it.
#[derive(Debug, Clone)]
pub struct BestOrder<K = String> {
    pub result: PackResult<K>,
    pub order: RectOrder,
    /// Area-weighted average fill ratio of `result`.
    pub fill_ratio: f64,
}

impl<K: Clone + fmt::Debug> AtlasPacker<K> {
    /// Packs `rects` sorted by `order` and returns the result.
    /// The packer is reset before and after the run.
    pub fn pack_rects(&mut self, rects: &[AtlasRect<K>], order: RectOrder) -> PackResult<K> {
        self.reset();

        let mut sorted = rects.to_vec();
        order.sort(&mut sorted);
        self.add_rects(&sorted);

        self.take_result()
    }

    /// Packs `rects` once per [`RectOrder`] and keeps the result with the strictly
    /// highest average fill ratio. The first order wins ties.
    #[instrument(skip_all, fields(count = rects.len()))]
    pub fn pack_with_best_order(&mut self, rects: &[AtlasRect<K>]) -> BestOrder<K> {
        let runs = RectOrder::ALL.map(|order| (order, self.pack_rects(rects, order)));
        select_best(runs)
    }
}

/// Runs the order search with a fresh packer per order.
///
/// With feature "parallel" and `cfg.parallel` set, orders are evaluated on the rayon
/// pool. Selection is the same either way.
#[instrument(skip_all, fields(count = rects.len()))]
pub fn pack_with_best_order<K>(rects: &[AtlasRect<K>], cfg: &PackerConfig) -> BestOrder<K>
where
    K: Clone + fmt::Debug + Send + Sync,
{
    #[cfg(feature = "parallel")]
    {
        if cfg.parallel {
            let runs: Vec<(RectOrder, PackResult<K>)> = RectOrder::ALL
                .par_iter()
                .map(|&order| {
                    let mut packer = AtlasPacker::new(cfg.clone());
                    (order, packer.pack_rects(rects, order))
                })
                .collect();
            return select_best(runs);
        }
    }

    AtlasPacker::new(cfg.clone()).pack_with_best_order(rects)
}

fn select_best<K, I>(runs: I) -> BestOrder<K>
where
    I: IntoIterator<Item = (RectOrder, PackResult<K>)>,
{
    let mut best: Option<BestOrder<K>> = None;
    for (order, result) in runs {
        let fill_ratio = result.average_fill_ratio();
        debug!(%order, fill_ratio, atlases = result.atlases.len(), "order evaluated");
        if best.as_ref().is_none_or(|b| fill_ratio > b.fill_ratio) {
            best = Some(BestOrder {
                result,
                order,
                fill_ratio,
            });
        }
    }

    let best = best.unwrap_or_else(|| BestOrder {
        result: PackResult::default(),
        order: RectOrder::default(),
        fill_ratio: 0.0,
    });
    debug!(order = %best.order, fill_ratio = best.fill_ratio, "selected order");
    best
}
