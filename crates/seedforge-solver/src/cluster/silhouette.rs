//! Mean silhouette coefficient over Euclidean distance.

use super::kmeans::squared_distance;

fn distance(a: &[f64], b: &[f64]) -> f64 {
    squared_distance(a, b).sqrt()
}

/// Mean silhouette of a labelling, in `[-1, 1]`.
///
/// Returns `None` unless the labelling has between 2 and `n - 1` distinct
/// clusters. Members of singleton clusters score 0.
pub fn silhouette_score(points: &[Vec<f64>], labels: &[usize]) -> Option<f64> {
    let n = points.len();
    if n != labels.len() || n < 3 {
        return None;
    }

    let k = labels.iter().copied().max().map_or(0, |m| m + 1);
    let mut sizes = vec![0usize; k];
    for &l in labels {
        sizes[l] += 1;
    }
    let distinct = sizes.iter().filter(|&&s| s > 0).count();
    if distinct < 2 || distinct > n - 1 {
        return None;
    }

    let mut total = 0.0;
    let mut sums = vec![0.0; k];
    for i in 0..n {
        let own = labels[i];
        if sizes[own] == 1 {
            continue;
        }

        sums.iter_mut().for_each(|s| *s = 0.0);
        for j in 0..n {
            if i != j {
                sums[labels[j]] += distance(&points[i], &points[j]);
            }
        }

        let a = sums[own] / (sizes[own] - 1) as f64;
        let b = (0..k)
            .filter(|&c| c != own && sizes[c] > 0)
            .map(|c| sums[c] / sizes[c] as f64)
            .fold(f64::INFINITY, f64::min);

        let denom = a.max(b);
        if denom > 0.0 {
            total += (b - a) / denom;
        }
    }

    Some(total / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_separated_near_one() {
        let points = vec![vec![0.0], vec![0.1], vec![10.0], vec![10.1]];
        let score = silhouette_score(&points, &[0, 0, 1, 1]).unwrap();
        assert!(score > 0.95, "score {score}");
    }

    #[test]
    fn test_bad_labelling_negative() {
        let points = vec![vec![0.0], vec![0.1], vec![10.0], vec![10.1]];
        let score = silhouette_score(&points, &[0, 1, 0, 1]).unwrap();
        assert!(score < 0.0, "score {score}");
    }

    #[test]
    fn test_singleton_scores_zero() {
        let points = vec![vec![0.0], vec![1.0], vec![1.0], vec![50.0]];
        // Only the two members of cluster 0 contribute; each has a = 0.
        let score = silhouette_score(&points, &[1, 0, 0, 2]).unwrap();
        assert!((score - 0.5).abs() < 1e-12, "score {score}");
    }

    #[test]
    fn test_degenerate_labellings() {
        let points = vec![vec![0.0], vec![1.0], vec![2.0]];
        assert_eq!(silhouette_score(&points, &[0, 0, 0]), None);
        assert_eq!(silhouette_score(&points, &[0, 1, 2]), None);
        assert_eq!(silhouette_score(&points[..2], &[0, 1]), None);
    }
}
