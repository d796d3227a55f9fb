//! Seeded k-means with k-means++ initialization.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use seedforge_config::ClusteringConfig;
use seedforge_core::{Result, SeedForgeError};

/// Squared Euclidean distance.
pub(crate) fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Result of one k-means fit.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    /// Cluster id per point, dense in `[0, k)` and numbered by first appearance.
    pub labels: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
    /// Sum of squared distances to the assigned centroid.
    pub inertia: f64,
    pub iterations: usize,
}

/// Lloyd's k-means, deterministic for a given seed.
///
/// # Examples
///
/// ```
/// use seedforge_solver::KMeans;
///
/// let points = vec![
///     vec![0.0, 0.0], vec![0.1, 0.0],
///     vec![5.0, 5.0], vec![5.1, 5.0],
/// ];
/// let fit = KMeans::new(2).with_seed(7).fit(&points).unwrap();
///
/// assert_eq!(fit.labels, vec![0, 0, 1, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct KMeans {
    k: usize,
    max_iterations: usize,
    tolerance: f64,
    n_init: usize,
    seed: u64,
}

impl KMeans {
    pub fn new(k: usize) -> Self {
        let defaults = ClusteringConfig::default();
        Self {
            k,
            max_iterations: defaults.max_iterations,
            tolerance: defaults.tolerance,
            n_init: defaults.n_init,
            seed: defaults.random_seed,
        }
    }

    /// Takes iteration limits, restarts and seed from configuration.
    pub fn from_config(k: usize, config: &ClusteringConfig) -> Self {
        Self {
            k,
            max_iterations: config.max_iterations.max(1),
            tolerance: config.tolerance,
            n_init: config.n_init.max(1),
            seed: config.random_seed,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init.max(1);
        self
    }

    /// Fits `k` clusters to `points`.
    ///
    /// Runs `n_init` restarts, restart `r` seeded with `seed + r`, and keeps
    /// the lowest-inertia fit (earliest restart on ties).
    ///
    /// Fails with `InvalidInput` unless `1 <= k <= points.len()`.
    pub fn fit(&self, points: &[Vec<f64>]) -> Result<KMeansFit> {
        if self.k == 0 || self.k > points.len() {
            return Err(SeedForgeError::invalid_input(format!(
                "k-means needs 1 <= k <= {} points, got k = {}",
                points.len(),
                self.k
            )));
        }

        let mut best = self.fit_once(points, &mut ChaCha8Rng::seed_from_u64(self.seed));
        for restart in 1..self.n_init {
            let mut rng = ChaCha8Rng::seed_from_u64(self.seed.wrapping_add(restart as u64));
            let fit = self.fit_once(points, &mut rng);
            if fit.inertia < best.inertia {
                best = fit;
            }
        }
        Ok(best)
    }

    fn fit_once(&self, points: &[Vec<f64>], rng: &mut ChaCha8Rng) -> KMeansFit {
        let mut centroids = plus_plus_init(points, self.k, rng);
        let mut labels = vec![0; points.len()];
        let mut iterations = 0;

        while iterations < self.max_iterations {
            iterations += 1;
            assign(points, &centroids, &mut labels);
            fill_empty_clusters(points, &mut centroids, &mut labels);

            let updated = means(points, &labels, self.k);
            let shift: f64 = centroids
                .iter()
                .zip(&updated)
                .map(|(old, new)| squared_distance(old, new))
                .sum();
            centroids = updated;
            if shift <= self.tolerance {
                break;
            }
        }

        assign(points, &centroids, &mut labels);
        fill_empty_clusters(points, &mut centroids, &mut labels);
        centroids = means(points, &labels, self.k);

        let inertia = points
            .iter()
            .zip(&labels)
            .map(|(p, &l)| squared_distance(p, &centroids[l]))
            .sum();

        let (labels, centroids) = renumber(labels, centroids);
        KMeansFit {
            labels,
            centroids,
            inertia,
            iterations,
        }
    }
}

fn plus_plus_init(points: &[Vec<f64>], k: usize, rng: &mut ChaCha8Rng) -> Vec<Vec<f64>> {
    let n = points.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.random_range(0..n)].clone());

    let mut nearest: Vec<f64> = points
        .iter()
        .map(|p| squared_distance(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = nearest.iter().sum();
        let idx = if total > 0.0 {
            let target = rng.random::<f64>() * total;
            let mut acc = 0.0;
            let mut chosen = n - 1;
            for (i, d) in nearest.iter().enumerate() {
                acc += d;
                if acc >= target && *d > 0.0 {
                    chosen = i;
                    break;
                }
            }
            chosen
        } else {
            rng.random_range(0..n)
        };

        let centroid = points[idx].clone();
        for (d, p) in nearest.iter_mut().zip(points) {
            *d = d.min(squared_distance(p, &centroid));
        }
        centroids.push(centroid);
    }
    centroids
}

fn assign(points: &[Vec<f64>], centroids: &[Vec<f64>], labels: &mut [usize]) {
    for (label, p) in labels.iter_mut().zip(points) {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (c, centroid) in centroids.iter().enumerate() {
            let d = squared_distance(p, centroid);
            if d < best_dist {
                best = c;
                best_dist = d;
            }
        }
        *label = best;
    }
}

// Moves the point farthest from its centroid into each empty cluster,
// taking only from clusters that keep at least one member.
fn fill_empty_clusters(points: &[Vec<f64>], centroids: &mut [Vec<f64>], labels: &mut [usize]) {
    let k = centroids.len();
    let mut counts = vec![0usize; k];
    for &l in labels.iter() {
        counts[l] += 1;
    }

    for empty in 0..k {
        if counts[empty] > 0 {
            continue;
        }
        let donor = (0..points.len())
            .filter(|&i| counts[labels[i]] > 1)
            .max_by(|&a, &b| {
                let da = squared_distance(&points[a], &centroids[labels[a]]);
                let db = squared_distance(&points[b], &centroids[labels[b]]);
                da.total_cmp(&db).then(b.cmp(&a))
            });
        if let Some(i) = donor {
            counts[labels[i]] -= 1;
            labels[i] = empty;
            counts[empty] = 1;
            centroids[empty] = points[i].clone();
        }
    }
}

fn means(points: &[Vec<f64>], labels: &[usize], k: usize) -> Vec<Vec<f64>> {
    let dims = points.first().map_or(0, Vec::len);
    let mut sums = vec![vec![0.0; dims]; k];
    let mut counts = vec![0usize; k];
    for (p, &l) in points.iter().zip(labels) {
        counts[l] += 1;
        for (s, v) in sums[l].iter_mut().zip(p) {
            *s += v;
        }
    }
    for (sum, &count) in sums.iter_mut().zip(&counts) {
        if count > 0 {
            for s in sum.iter_mut() {
                *s /= count as f64;
            }
        }
    }
    sums
}

fn renumber(labels: Vec<usize>, centroids: Vec<Vec<f64>>) -> (Vec<usize>, Vec<Vec<f64>>) {
    let mut mapping: Vec<Option<usize>> = vec![None; centroids.len()];
    let mut next = 0;
    for &l in &labels {
        if mapping[l].is_none() {
            mapping[l] = Some(next);
            next += 1;
        }
    }

    let mut reordered = vec![Vec::new(); centroids.len()];
    for (old, centroid) in centroids.into_iter().enumerate() {
        let new = mapping[old].unwrap_or_else(|| {
            let id = next;
            next += 1;
            id
        });
        reordered[new] = centroid;
    }

    let labels = labels
        .into_iter()
        .map(|l| mapping[l].unwrap_or(l))
        .collect();
    (labels, reordered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0],
            vec![10.0, 10.0],
            vec![0.2, 0.1],
            vec![10.1, 9.9],
            vec![-5.0, 8.0],
            vec![-5.2, 8.1],
        ]
    }

    #[test]
    fn test_separates_blobs() {
        let fit = KMeans::new(3).fit(&blobs()).unwrap();
        assert_eq!(fit.labels, vec![0, 1, 0, 1, 2, 2]);
        assert!(fit.inertia < 1.0);
        assert_eq!(fit.centroids.len(), 3);
    }

    #[test]
    fn test_same_seed_same_fit() {
        let a = KMeans::new(2).with_seed(3).fit(&blobs()).unwrap();
        let b = KMeans::new(2).with_seed(3).fit(&blobs()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_every_cluster_used_with_duplicate_points() {
        let points = vec![
            vec![1.0],
            vec![1.0],
            vec![1.0],
            vec![2.0],
        ];
        let fit = KMeans::new(3).with_n_init(1).fit(&points).unwrap();
        let mut used = fit.labels.clone();
        used.sort_unstable();
        used.dedup();
        assert_eq!(used, vec![0, 1, 2]);
    }

    #[test]
    fn test_k_out_of_range() {
        assert!(KMeans::new(0).fit(&blobs()).is_err());
        assert!(KMeans::new(7).fit(&blobs()).is_err());
    }

    #[test]
    fn test_k_equals_one() {
        let fit = KMeans::new(1).fit(&blobs()).unwrap();
        assert!(fit.labels.iter().all(|&l| l == 0));
    }
}
