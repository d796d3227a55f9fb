//! SKU catalog fixtures.

use seedforge_core::Sku;

/// A catalog of `n` SKUs priced evenly from $10 to $100.
///
/// SKU `i` (zero based) is `SKU-{i+1:02}`. Category scores are spread so
/// that ranking order differs from catalog order.
pub fn priced_catalog(n: usize) -> Vec<Sku> {
    (0..n)
        .map(|i| {
            let cost = if n > 1 {
                10.0 + 90.0 * i as f64 / (n - 1) as f64
            } else {
                10.0
            };
            let score = ((i * 7) % n.max(1)) as f64 / n.max(1) as f64;
            let category = if i % 2 == 0 { "apparel" } else { "footwear" };
            Sku::new(format!("SKU-{:02}", i + 1), category, cost, score)
        })
        .collect()
}

/// A catalog where every SKU costs `cost` and scores fall with catalog position.
pub fn flat_catalog(n: usize, cost: f64) -> Vec<Sku> {
    (0..n)
        .map(|i| Sku::new(format!("SKU-{:02}", i + 1), "basics", cost, (n - i) as f64))
        .collect()
}
