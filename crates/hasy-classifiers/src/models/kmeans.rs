use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{HarnessError, Result};
use crate::math::Array2;
use crate::models::method_trait::Method;
use crate::models::utils::{check_features, check_fit_inputs, majority_label};

/// K-Means clustering (Lloyd iterations) used as a classifier.
///
/// Centroids start at `k` distinct training samples drawn with a seeded RNG.
/// After convergence each cluster is named by the majority training label of
/// its members, so `fit` and `predict` return class labels rather than raw
/// cluster indices.
pub struct KMeans {
    k: usize,
    max_iters: usize,
    seed: u64,
    centroids: Option<Array2<f32>>,
    cluster_labels: Vec<i32>,
}

impl KMeans {
    pub fn new(k: usize, max_iters: usize, seed: u64) -> Self {
        KMeans {
            k,
            max_iters,
            seed,
            centroids: None,
            cluster_labels: Vec::new(),
        }
    }

    pub fn centroids(&self) -> Option<&Array2<f32>> {
        self.centroids.as_ref()
    }

    fn init_centroids(&self, x: &Array2<f32>) -> Array2<f32> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let picked = rand::seq::index::sample(&mut rng, x.nrows(), self.k).into_vec();
        x.select_rows(&picked)
    }

    /// Recompute each centroid as the mean of its members. Empty clusters
    /// keep their previous centroid.
    fn update_centroids(&self, x: &Array2<f32>, assignments: &[usize], centroids: &mut Array2<f32>) {
        let d = x.ncols();
        let mut sums = vec![0.0f64; self.k * d];
        let mut counts = vec![0usize; self.k];
        for (row, &cluster) in x.rows().zip(assignments) {
            counts[cluster] += 1;
            for (acc, &v) in sums[cluster * d..(cluster + 1) * d].iter_mut().zip(row) {
                *acc += v as f64;
            }
        }
        for cluster in 0..self.k {
            if counts[cluster] == 0 {
                log::trace!("kmeans: cluster {} is empty, keeping previous centroid", cluster);
                continue;
            }
            for c in 0..d {
                centroids[(cluster, c)] = (sums[cluster * d + c] / counts[cluster] as f64) as f32;
            }
        }
    }
}

fn squared_distance(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&u, &v)| {
            let diff = (u - v) as f64;
            diff * diff
        })
        .sum()
}

fn nearest(centroids: &Array2<f32>, sample: &[f32]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (idx, centroid) in centroids.rows().enumerate() {
        let dist = squared_distance(centroid, sample);
        if dist < best_dist {
            best_dist = dist;
            best = idx;
        }
    }
    best
}

fn assign(centroids: &Array2<f32>, x: &Array2<f32>) -> Vec<usize> {
    x.rows().map(|row| nearest(centroids, row)).collect()
}

impl Method for KMeans {
    fn fit(&mut self, x: &Array2<f32>, y: &[i32]) -> Result<Vec<i32>> {
        check_fit_inputs(x, y)?;
        if self.k == 0 {
            return Err(HarnessError::InvalidConfig(
                "kmeans: number of clusters K must be at least 1".to_string(),
            ));
        }
        if self.k > x.nrows() {
            return Err(HarnessError::InvalidConfig(format!(
                "kmeans: K={} exceeds the {} training samples",
                self.k,
                x.nrows()
            )));
        }

        let mut centroids = self.init_centroids(x);
        let mut assignments = assign(&centroids, x);
        let mut iterations = 0;
        for _ in 0..self.max_iters {
            iterations += 1;
            self.update_centroids(x, &assignments, &mut centroids);
            let next = assign(&centroids, x);
            if next == assignments {
                break;
            }
            assignments = next;
        }
        log::debug!("kmeans: {} clusters after {} iterations", self.k, iterations);

        let fallback = majority_label(y).unwrap_or_default();
        self.cluster_labels = (0..self.k)
            .map(|cluster| {
                let members = assignments
                    .iter()
                    .zip(y)
                    .filter(|(&a, _)| a == cluster)
                    .map(|(_, label)| label);
                majority_label(members).unwrap_or(fallback)
            })
            .collect();
        self.centroids = Some(centroids);

        Ok(assignments
            .into_iter()
            .map(|cluster| self.cluster_labels[cluster])
            .collect())
    }

    fn predict(&self, x: &Array2<f32>) -> Result<Vec<i32>> {
        let centroids = self.centroids.as_ref().ok_or(HarnessError::NotFitted("kmeans"))?;
        check_features(centroids.ncols(), x)?;
        Ok(assign(centroids, x)
            .into_iter()
            .map(|cluster| self.cluster_labels[cluster])
            .collect())
    }

    fn name(&self) -> &str {
        "kmeans"
    }
}
