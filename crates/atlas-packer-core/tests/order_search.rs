use atlas_packer_core::prelude::*;

fn ids(rects: &[AtlasRect<&'static str>]) -> Vec<&'static str> {
    rects.iter().map(|r| r.id).collect()
}

fn sample() -> Vec<AtlasRect<&'static str>> {
    vec![
        AtlasRect::new("a", 10, 30),
        AtlasRect::new("b", 30, 10),
        AtlasRect::new("c", 20, 20),
        AtlasRect::new("d", 15, 30),
        AtlasRect::new("e", 30, 15),
    ]
}

#[test]
fn orders_sort_descending_with_secondary_key() {
    let mut r = sample();
    RectOrder::HeightThenWidth.sort(&mut r);
    assert_eq!(ids(&r), vec!["d", "a", "c", "e", "b"]);

    let mut r = sample();
    RectOrder::WidthThenHeight.sort(&mut r);
    assert_eq!(ids(&r), vec!["e", "b", "c", "d", "a"]);

    // d and e share area 450, c is 400, a and b 300
    let mut r = sample();
    RectOrder::AreaThenHeight.sort(&mut r);
    assert_eq!(ids(&r), vec!["d", "e", "c", "a", "b"]);

    let mut r = sample();
    RectOrder::AreaThenWidth.sort(&mut r);
    assert_eq!(ids(&r), vec!["e", "d", "c", "b", "a"]);
}

#[test]
fn full_ties_keep_input_order() {
    let mut r = vec![
        AtlasRect::new("x", 5, 5),
        AtlasRect::new("y", 5, 5),
        AtlasRect::new("z", 5, 5),
    ];
    RectOrder::AreaThenWidth.sort(&mut r);
    assert_eq!(ids(&r), vec!["x", "y", "z"]);
}

#[test]
fn order_names_round_trip() {
    for order in RectOrder::ALL {
        assert_eq!(order.to_string().parse::<RectOrder>(), Ok(order));
    }
    assert_eq!("HTW".parse::<RectOrder>(), Ok(RectOrder::HeightThenWidth));
    assert!("diagonal".parse::<RectOrder>().is_err());
    assert_eq!(
        serde_json::to_string(&RectOrder::AreaThenWidth).unwrap(),
        "\"area_then_width\""
    );
}

#[test]
fn best_order_dominates_every_single_order() {
    let cfg = PackerConfig::builder().padding(1).max_size(64).build();
    let rects: Vec<AtlasRect<u32>> = (0..60u32)
        .map(|i| AtlasRect::new(i, 3 + (i * 7 % 23) as i32, 2 + (i * 13 % 19) as i32))
        .collect();

    let mut packer = AtlasPacker::new(cfg);
    let best = packer.pack_with_best_order(&rects);
    assert_eq!(best.fill_ratio, best.result.average_fill_ratio());
    for order in RectOrder::ALL {
        let ratio = packer.pack_rects(&rects, order).average_fill_ratio();
        assert!(best.fill_ratio >= ratio, "{} beat the search", order);
    }
}

#[test]
fn first_order_wins_ties() {
    // Identical squares give the same layout for every order.
    let rects: Vec<AtlasRect<u32>> = (0..4).map(|i| AtlasRect::new(i, 8, 8)).collect();
    let best = pack_with_best_order(&rects, &PackerConfig::builder().padding(0).build());
    assert_eq!(best.order, RectOrder::HeightThenWidth);
    assert_eq!(best.fill_ratio, 1.0);
}

#[test]
fn empty_input_yields_empty_result() {
    let rects: Vec<AtlasRect<u32>> = Vec::new();
    let best = pack_with_best_order(&rects, &PackerConfig::default());
    assert!(best.result.atlases.is_empty());
    assert!(best.result.not_packed.is_empty());
    assert_eq!(best.fill_ratio, 0.0);
    assert_eq!(best.order, RectOrder::HeightThenWidth);
}

#[test]
fn pack_rects_leaves_packer_reset() {
    let mut packer: AtlasPacker<&str> = AtlasPacker::default();
    let result = packer.pack_rects(&sample(), RectOrder::AreaThenHeight);
    assert_eq!(result.packed_count(), 5);
    assert_eq!(packer.atlas_count(), 0);
    assert!(packer.not_packed().is_empty());
}

#[test]
fn parallel_flag_selects_the_same_order() {
    let rects: Vec<AtlasRect<u32>> = (0..40u32)
        .map(|i| AtlasRect::new(i, 4 + (i * 5 % 17) as i32, 4 + (i * 11 % 13) as i32))
        .collect();
    let seq = pack_with_best_order(&rects, &PackerConfig::builder().max_size(48).build());
    let par = pack_with_best_order(
        &rects,
        &PackerConfig::builder().max_size(48).parallel(true).build(),
    );
    assert_eq!(seq.order, par.order);
    assert_eq!(seq.result, par.result);
}
