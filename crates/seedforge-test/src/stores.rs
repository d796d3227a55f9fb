//! Store fixtures.

use seedforge_core::Store;

/// The feature names used by [`sample_stores`].
pub const SAMPLE_FEATURES: [&str; 2] = ["capacity", "footfall"];

/// Eight stores in three well separated groups over `capacity` and `footfall`.
///
/// Groups: {S1, S3, S8} small-town, {S2, S4, S6} flagship, {S5, S7} outlet.
pub fn sample_stores() -> Vec<Store> {
    [
        ("S1", 150.0, 500.0),
        ("S2", 200.0, 800.0),
        ("S3", 148.0, 510.0),
        ("S4", 205.0, 790.0),
        ("S5", 100.0, 300.0),
        ("S6", 198.0, 812.0),
        ("S7", 102.0, 295.0),
        ("S8", 153.0, 492.0),
    ]
    .into_iter()
    .map(|(id, capacity, footfall)| {
        Store::new(id)
            .with_feature("capacity", capacity)
            .with_feature("footfall", footfall)
    })
    .collect()
}

/// `n` stores that share the exact same feature values.
pub fn identical_stores(n: usize) -> Vec<Store> {
    (1..=n)
        .map(|i| {
            Store::new(format!("S{}", i))
                .with_feature("capacity", 120.0)
                .with_feature("footfall", 400.0)
        })
        .collect()
}

/// Returns the sample feature names as owned strings.
pub fn sample_features() -> Vec<String> {
    SAMPLE_FEATURES.iter().map(|f| f.to_string()).collect()
}
