//! Cluster selection over store features.
//!
//! Stores are standardized per feature, partitioned with seeded k-means and,
//! when no `k` is requested, the candidate with the best silhouette wins.

mod features;
mod kmeans;
mod silhouette;

pub use features::FeatureMatrix;
pub use kmeans::{KMeans, KMeansFit};
pub use silhouette::silhouette_score;

use std::collections::BTreeMap;
use std::time::Instant;

use tracing::{debug, info};

use seedforge_config::ClusteringConfig;
use seedforge_core::{
    ClusterAssignment, ClusterProfile, ClusterResult, Result, SeedForgeError, Store,
};

/// Partitions stores into clusters.
///
/// # Examples
///
/// ```
/// use seedforge_config::ClusteringConfig;
/// use seedforge_core::Store;
/// use seedforge_solver::ClusterSelector;
///
/// let stores: Vec<Store> = [(1.0, 1.0), (1.1, 0.9), (9.0, 9.0), (9.2, 8.8)]
///     .iter()
///     .enumerate()
///     .map(|(i, &(a, b))| {
///         Store::new(format!("S{}", i + 1))
///             .with_feature("capacity", a)
///             .with_feature("footfall", b)
///     })
///     .collect();
/// let features = vec!["capacity".to_string(), "footfall".to_string()];
///
/// let result = ClusterSelector::new(ClusteringConfig::default())
///     .select(&stores, &features, Some(2))
///     .unwrap();
///
/// assert_eq!(result.k, 2);
/// assert_eq!(result.assignment.get("S1"), result.assignment.get("S2"));
/// assert_ne!(result.assignment.get("S1"), result.assignment.get("S3"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClusterSelector {
    config: ClusteringConfig,
}

impl ClusterSelector {
    pub fn new(config: ClusteringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClusteringConfig {
        &self.config
    }

    /// Clusters `stores` over `features`.
    ///
    /// With `k` given it must satisfy `1 < k < stores.len()`. Without it,
    /// every candidate in the configured range is scored and the highest
    /// silhouette wins, ties going to the smaller `k`.
    pub fn select(
        &self,
        stores: &[Store],
        features: &[String],
        k: Option<usize>,
    ) -> Result<ClusterResult> {
        let start = Instant::now();
        let matrix = FeatureMatrix::from_stores(stores, features)?;
        let n = matrix.len();

        let (k, fit, silhouette) = match k {
            Some(k) => {
                if k <= 1 || k >= n {
                    return Err(SeedForgeError::invalid_input(format!(
                        "k must satisfy 1 < k < {} (store count), got {}",
                        n, k
                    )));
                }
                let fit = KMeans::from_config(k, &self.config).fit(&matrix.scaled)?;
                let score = silhouette_score(&matrix.scaled, &fit.labels);
                (k, fit, score)
            }
            None => self.search(&matrix)?,
        };

        let mut assignment = ClusterAssignment::new();
        for (store_id, &label) in matrix.store_ids.iter().zip(&fit.labels) {
            assignment.insert(store_id.clone(), label)?;
        }
        let profiles = profiles(&matrix, &fit.labels, k);

        info!(
            event = "clusters_selected",
            k,
            silhouette = silhouette.unwrap_or(f64::NAN),
            store_count = n,
            duration_ms = start.elapsed().as_millis() as u64,
        );

        Ok(ClusterResult {
            assignment,
            k,
            silhouette,
            profiles,
        })
    }

    fn search(&self, matrix: &FeatureMatrix) -> Result<(usize, KMeansFit, Option<f64>)> {
        let n = matrix.len();
        let (low, high) = self.config.candidate_range(n).ok_or_else(|| {
            SeedForgeError::invalid_input(format!(
                "{} stores are not enough to search k in [{}, {}]; need at least {}",
                n,
                self.config.min_k,
                self.config.max_k,
                self.config.min_k + 1
            ))
        })?;

        let mut best: Option<(usize, KMeansFit, f64)> = None;
        for k in low..=high {
            let fit = KMeans::from_config(k, &self.config).fit(&matrix.scaled)?;
            let score = silhouette_score(&matrix.scaled, &fit.labels).unwrap_or(f64::NEG_INFINITY);
            debug!(k, silhouette = score, inertia = fit.inertia, "Scored cluster candidate");

            let better = match &best {
                Some((_, _, best_score)) => score > *best_score,
                None => true,
            };
            if better {
                best = Some((k, fit, score));
            }
        }

        let (k, fit, score) = best.ok_or_else(|| {
            SeedForgeError::invalid_input(format!("no candidate k in [{}, {}]", low, high))
        })?;
        Ok((k, fit, score.is_finite().then_some(score)))
    }
}

/// Clusters with the default [`ClusteringConfig`].
pub fn select_clusters(
    stores: &[Store],
    features: &[String],
    k: Option<usize>,
) -> Result<ClusterResult> {
    ClusterSelector::default().select(stores, features, k)
}

fn profiles(matrix: &FeatureMatrix, labels: &[usize], k: usize) -> Vec<ClusterProfile> {
    let dims = matrix.features.len();
    let mut counts = vec![0usize; k];
    let mut sums = vec![vec![0.0; dims]; k];
    for (row, &label) in matrix.raw.iter().zip(labels) {
        counts[label] += 1;
        for (s, v) in sums[label].iter_mut().zip(row) {
            *s += v;
        }
    }

    (0..k)
        .map(|cluster_id| {
            let count = counts[cluster_id];
            let feature_means: BTreeMap<String, f64> = matrix
                .features
                .iter()
                .zip(&sums[cluster_id])
                .map(|(name, sum)| {
                    let mean = if count > 0 { sum / count as f64 } else { 0.0 };
                    (name.clone(), mean)
                })
                .collect();
            ClusterProfile {
                cluster_id,
                store_count: count,
                feature_means,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests;
