//! Property tests for recursion depth and primitive defaults
//!
//! Self-referential types must terminate for every depth limit, with the
//! populated chain growing exactly with the limit. Every configured default
//! must land in the member of its category.

#![allow(clippy::unwrap_used)]

use fixgen::{Builder, Decimal, Fixture};
use proptest::prelude::*;

#[derive(Debug, Default, Fixture)]
struct Node {
    label: String,
    next: Option<Box<Node>>,
}

/// Links below the root, paired with whether each one was populated
fn chain(root: &Node) -> Vec<bool> {
    let mut links = Vec::new();
    let mut current = root.next.as_deref();
    while let Some(node) = current {
        links.push(!node.label.is_empty());
        current = node.next.as_deref();
    }
    links
}

#[derive(Debug, Default, Fixture)]
struct Sample {
    flag: bool,
    count: i32,
    total: i64,
    ratio: f32,
    weight: f64,
    price: Decimal,
    initial: char,
    code: i8,
    title: String,
}

/// Strategy for the depth limits exercised, including clamped negatives
fn depth_limits() -> impl Strategy<Value = i64> {
    prop_oneof![Just(-3i64), Just(0i64), 1i64..8]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn self_referential_chain_tracks_depth_limit(limit in depth_limits()) {
        let root = Builder::<Node>::new().with_depth_limit(limit).build().unwrap();
        let links = chain(&root);
        let expected = usize::try_from(limit.max(1)).unwrap();

        prop_assert_eq!(root.label.as_str(), "text");
        prop_assert_eq!(links.len(), expected);
        // Only the last link is left unpopulated.
        prop_assert_eq!(links.last().copied(), Some(false));
        prop_assert!(links[..expected - 1].iter().all(|populated| *populated));
    }

    #[test]
    fn defaults_land_in_their_category(
        flag in any::<bool>(),
        count in any::<i32>(),
        total in any::<i64>(),
        ratio in -1.0e6f32..1.0e6,
        weight in -1.0e9f64..1.0e9,
        cents in any::<i64>(),
        initial in any::<char>(),
        code in any::<i8>(),
        title in "[a-z]{0,12}",
    ) {
        let price = Decimal::new(cents, 2);
        let sample = Builder::<Sample>::new()
            .with_bool_default(flag)
            .with_int_default(count)
            .with_long_default(total)
            .with_float_default(ratio)
            .with_double_default(weight)
            .with_decimal_default(price)
            .with_char_default(initial)
            .with_byte_default(code)
            .with_string_default(title.clone())
            .build()
            .unwrap();

        prop_assert_eq!(sample.flag, flag);
        prop_assert_eq!(sample.count, count);
        prop_assert_eq!(sample.total, total);
        prop_assert_eq!(sample.ratio, ratio);
        prop_assert_eq!(sample.weight, weight);
        prop_assert_eq!(sample.price, price);
        prop_assert_eq!(sample.initial, initial);
        prop_assert_eq!(sample.code, code);
        prop_assert_eq!(sample.title, title);
    }

    #[test]
    fn collection_size_is_clamped_to_positive(size in -5i64..6) {
        let builder = Builder::<Sample>::new().with_collection_size(size);
        let expected = if size > 0 { usize::try_from(size).unwrap() } else { 1 };
        prop_assert_eq!(builder.config().collection_size(), expected);
        prop_assert_eq!(builder.build_list().len(), expected);
    }
}
