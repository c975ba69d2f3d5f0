use std::collections::HashMap;

use atlas_packer_core::prelude::*;
use rand::{Rng, SeedableRng};

fn random_rects(seed: u64, count: usize, min: i32, max: i32) -> Vec<AtlasRect<usize>> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let w = rng.gen_range(min..=max);
            let h = rng.gen_range(min..=max);
            AtlasRect::new(i, w, h)
        })
        .collect()
}

fn check_invariants(rects: &[AtlasRect<usize>], cfg: &PackerConfig, result: &PackResult<usize>) {
    let pad = cfg.padding as i32;
    let max = cfg.max_size as i32;

    for atlas in &result.atlases {
        assert!(
            atlas.size.w <= max && atlas.size.h <= max,
            "atlas {:?} too large",
            atlas.size
        );
        let padded: Vec<Rect> = atlas
            .rects
            .iter()
            .map(|r| Rect::new(r.bounds.x, r.bounds.y, r.bounds.w + pad, r.bounds.h + pad))
            .collect();
        for (i, a) in padded.iter().enumerate() {
            assert!(a.x >= 0 && a.y >= 0);
            assert!(a.max_x() <= atlas.size.w + pad && a.max_y() <= atlas.size.h + pad);
            for b in &padded[i + 1..] {
                assert!(!a.intersects(b), "overlap {:?} / {:?}", a, b);
            }
        }
    }

    // Every input shows up exactly once, with its original size.
    let mut seen: HashMap<usize, Size> = HashMap::new();
    for (_, r) in result.placements() {
        assert!(seen.insert(r.id, r.size()).is_none(), "id {} placed twice", r.id);
    }
    for r in &result.not_packed {
        assert!(seen.insert(r.id, r.size()).is_none(), "id {} reported twice", r.id);
    }
    assert_eq!(seen.len(), rects.len());
    for r in rects {
        assert_eq!(seen[&r.id], r.size());
    }
}

#[test]
fn random_runs_hold_invariants() {
    for (seed, padding, max_size) in [(1u64, 2u32, 128u32), (7, 0, 64), (99, 1, 48)] {
        let cfg = PackerConfig::builder()
            .padding(padding)
            .max_size(max_size)
            .build();
        let rects = random_rects(seed, 100, 1, 40);
        for order in RectOrder::ALL {
            let mut packer = AtlasPacker::new(cfg.clone());
            let result = packer.pack_rects(&rects, order);
            check_invariants(&rects, &cfg, &result);
        }
    }
}

#[test]
fn invalid_and_oversized_inputs_are_conserved() {
    let cfg = PackerConfig::builder().padding(2).max_size(32).build();
    let mut rects = random_rects(5, 60, -4, 40);
    rects.push(AtlasRect::new(1000, 0, 0));
    let mut packer = AtlasPacker::new(cfg.clone());
    packer.add_rects(&rects);
    let result = packer.result();
    check_invariants(&rects, &cfg, &result);

    for r in &result.not_packed {
        let s = r.size();
        assert!(s.w <= 0 || s.h <= 0 || s.w + 2 > 34 || s.h + 2 > 34, "{:?}", r);
    }
}

#[test]
fn reset_then_rerun_is_identical_to_fresh_run() {
    let cfg = PackerConfig::builder().padding(2).max_size(96).build();
    let rects = random_rects(11, 80, 2, 30);

    let mut reused = AtlasPacker::new(cfg.clone());
    reused.add_rects(&rects);
    let first = reused.result();
    reused.reset();
    reused.add_rects(&rects);
    let second = reused.result();

    let mut fresh = AtlasPacker::new(cfg);
    fresh.add_rects(&rects);

    assert_eq!(first, second);
    assert_eq!(second, fresh.result());
}

#[test]
fn packing_is_deterministic() {
    let cfg = PackerConfig::default();
    let rects = random_rects(3, 50, 8, 64);
    let a = AtlasPacker::new(cfg.clone()).pack_with_best_order(&rects);
    let b = AtlasPacker::new(cfg).pack_with_best_order(&rects);
    assert_eq!(a.order, b.order);
    assert_eq!(a.result, b.result);
}
