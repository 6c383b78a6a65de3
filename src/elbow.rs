use crate::algorithm::{count_distinct_points, run_kmeans, KMeansResult};
use crate::config::{ElbowConfig, KMeansConfig};
use crate::error::KMeansError;
use crate::plot::{report, NoopVisualizer, Visualizer};
use log::{info, warn};
use ndarray::ArrayView2;

/// Outcome of an elbow-method sweep
#[derive(Debug, Clone)]
pub struct ElbowResult {
    /// Selected number of clusters
    pub best_k: usize,
    /// Final WCSS for every k tried, as `(k, wcss)` pairs in increasing k
    pub errors: Vec<(usize, f64)>,
    /// Full result of every run, `runs[k - 1]` for cluster count k
    pub runs: Vec<KMeansResult>,
}

impl ElbowResult {
    /// Result of the run with the selected k
    pub fn best(&self) -> &KMeansResult {
        &self.runs[self.best_k - 1]
    }

    pub fn wcss_for(&self, k: usize) -> Option<f64> {
        self.errors.iter().find(|(kk, _)| *kk == k).map(|(_, wcss)| *wcss)
    }
}

/// Pick k from final errors, where `errors[i]` is the WCSS for k = i + 1.
///
/// The score of k is how much larger the drop into k is than the drop out
/// of k. The k with the largest positive score wins; ties keep the smaller
/// k. Returns 1 when fewer than three errors are given or no score is
/// positive.
///
/// ```
/// use lloydkmeans_rs::select_k;
///
/// assert_eq!(select_k(&[100.0, 50.0, 10.0, 8.0, 7.0]), 3);
/// ```
pub fn select_k(errors: &[f64]) -> usize {
    let mut best_k = 1;
    let mut best_score = 0.0;

    for i in 2..errors.len() {
        let previous_drop = errors[i - 2] - errors[i - 1];
        let drop = errors[i - 1] - errors[i];
        let score = previous_drop - drop;
        if score > best_score {
            best_score = score;
            best_k = i;
        }
    }

    best_k
}

/// Run k-means for every k in `1..=config.k_max` and pick k with
/// [`select_k`].
///
/// The runs draw nothing; `visualizer` only receives the error-vs-k curve.
/// A `k_max` larger than the number of distinct points is lowered to that
/// number.
///
/// # Errors
///
/// Any failing run fails the whole sweep, and the results of the runs that
/// already finished are dropped. In particular an `EmptyCluster` at some
/// large k is not retried, so a smaller `k_max` or another seed may succeed
/// where this call did not.
pub fn elbow_method(
    data: &ArrayView2<f64>,
    config: &ElbowConfig,
    visualizer: &mut dyn Visualizer,
) -> Result<ElbowResult, KMeansError> {
    if config.k_max == 0 {
        return Err(KMeansError::InvalidK(
            "k_max must be greater than 0".to_string(),
        ));
    }
    if data.nrows() == 0 {
        return Err(KMeansError::InsufficientData(
            "dataset is empty".to_string(),
        ));
    }

    let distinct = count_distinct_points(data);
    let k_max = if config.k_max > distinct {
        warn!(
            "k_max = {} exceeds the {} distinct points, sweeping up to {}",
            config.k_max, distinct, distinct
        );
        distinct
    } else {
        config.k_max
    };

    let mut runs = Vec::with_capacity(k_max);
    for k in 1..=k_max {
        let run_config = KMeansConfig {
            k,
            ..config.kmeans.clone()
        };
        let result = run_kmeans(data, &run_config, &mut NoopVisualizer)?;
        info!(
            "k = {}: wcss = {:.6} after {} iterations",
            k, result.wcss, result.n_iterations
        );
        runs.push(result);
    }

    let wcss: Vec<f64> = runs.iter().map(|r| r.wcss).collect();
    let best_k = select_k(&wcss);
    let errors: Vec<(usize, f64)> = wcss
        .into_iter()
        .enumerate()
        .map(|(i, e)| (i + 1, e))
        .collect();

    info!("Elbow method selected k = {}", best_k);
    report(visualizer.elbow_curve(&errors), "elbow");

    Ok(ElbowResult {
        best_k,
        errors,
        runs,
    })
}
