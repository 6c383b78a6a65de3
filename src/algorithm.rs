use crate::config::KMeansConfig;
use crate::distance::{
    centroid, check_labels, compute_center_shift, compute_wcss, find_nearest_centers,
};
use crate::error::KMeansError;
use crate::plot::{report, Visualizer};
use log::{debug, info};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::cmp::Ordering;
use std::time::Instant;

/// How a run of the assignment/update loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Two consecutive iterations produced the same WCSS
    Converged,
    /// The iteration cap was hit before the WCSS stabilized
    MaxItersReached,
}

/// Result of the k-means algorithm
#[derive(Debug, Clone)]
pub struct KMeansResult {
    /// Final centers, one row per center. Row `j` is center `j` for the
    /// whole run.
    pub centers: Array2<f64>,
    /// Index of the assigned center for every input point
    pub labels: Array1<usize>,
    /// WCSS of `labels` against `centers`
    pub wcss: f64,
    /// WCSS of every iteration, in order
    pub wcss_trace: Vec<f64>,
    pub n_iterations: usize,
    pub termination: Termination,
}

impl KMeansResult {
    /// Number of centers
    pub fn k(&self) -> usize {
        self.centers.nrows()
    }

    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }

    /// Indices of the points assigned to each center
    pub fn clusters(&self) -> Vec<Vec<usize>> {
        group_labels(&self.labels.view(), self.k())
    }
}

/// Labels at or above `k` are skipped; callers check them first.
fn group_labels(labels: &ArrayView1<usize>, k: usize) -> Vec<Vec<usize>> {
    let mut groups = vec![Vec::new(); k];
    for (i, &label) in labels.iter().enumerate() {
        if label < k {
            groups[label].push(i);
        }
    }
    groups
}

/// Group point indices by the center they are assigned to.
///
/// # Errors
///
/// Returns `InvalidLabel` if a label is not below `k`.
pub fn group_by_center(
    labels: &ArrayView1<usize>,
    k: usize,
) -> Result<Vec<Vec<usize>>, KMeansError> {
    check_labels(labels.len(), labels, k)?;
    Ok(group_labels(labels, k))
}

/// Number of distinct rows in `data`
pub fn count_distinct_points(data: &ArrayView2<f64>) -> usize {
    // Adding 0.0 folds -0.0 into 0.0 so sorting agrees with `==`.
    let mut rows: Vec<Vec<f64>> = data
        .outer_iter()
        .map(|row| row.iter().map(|v| v + 0.0).collect())
        .collect();
    rows.sort_by(|a, b| {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| x.total_cmp(y))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
    rows.dedup_by(|a, b| a == b);
    rows.len()
}

/// Initialize centers by sampling k distinct data points without replacement.
///
/// Walks a seeded permutation of the row indices and keeps every row whose
/// coordinates differ from the centers picked so far, so at most n rows are
/// drawn.
pub fn initialize_centers<R: Rng + ?Sized>(
    data: &ArrayView2<f64>,
    k: usize,
    rng: &mut R,
) -> Result<Array2<f64>, KMeansError> {
    let n_samples = data.nrows();

    if k == 0 {
        return Err(KMeansError::InvalidK(
            "k must be greater than 0".to_string(),
        ));
    }
    if n_samples == 0 {
        return Err(KMeansError::InsufficientData(
            "dataset is empty".to_string(),
        ));
    }
    if n_samples < k {
        return Err(KMeansError::InsufficientData(format!(
            "Number of samples ({}) is less than k ({})",
            n_samples, k
        )));
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    indices.shuffle(rng);

    let mut selected: Vec<usize> = Vec::with_capacity(k);
    for &idx in &indices {
        if selected.len() == k {
            break;
        }
        let candidate = data.row(idx);
        if selected.iter().all(|&s| data.row(s) != candidate) {
            selected.push(idx);
        }
    }

    if selected.len() < k {
        return Err(KMeansError::InsufficientData(format!(
            "only {} distinct points available for k = {}",
            selected.len(),
            k
        )));
    }

    Ok(data.select(Axis(0), &selected))
}

/// Recompute every center as the centroid of the points assigned to it.
///
/// Center `j` of the output replaces center `j` of the input.
///
/// # Errors
///
/// Returns `EmptyCluster` if some center has no assigned points,
/// `DimensionMismatch` if there is not one label per point, and
/// `InvalidLabel` if a label is not below `k`.
pub fn update_centers(
    data: &ArrayView2<f64>,
    labels: &ArrayView1<usize>,
    k: usize,
) -> Result<Array2<f64>, KMeansError> {
    if k == 0 {
        return Err(KMeansError::InvalidK(
            "k must be greater than 0".to_string(),
        ));
    }
    check_labels(data.nrows(), labels, k)?;

    let mut centers = Array2::zeros((k, data.ncols()));

    for (center_idx, members) in group_labels(labels, k).iter().enumerate() {
        if members.is_empty() {
            return Err(KMeansError::EmptyCluster(format!(
                "center {} has no assigned points",
                center_idx
            )));
        }
        let center = centroid(&data.select(Axis(0), members).view())?;
        centers.row_mut(center_idx).assign(&center);
    }

    Ok(centers)
}

/// Run the assignment/update loop from the given centers.
///
/// Each iteration assigns every point to its nearest center, records the
/// WCSS of that assignment, then moves the centers to their centroids. The
/// loop stops as soon as the WCSS matches the previous iteration's (within
/// `config.tol`), reporting the assignment and centers that produced it, or
/// after `config.max_iters` iterations.
pub fn lloyd(
    data: &ArrayView2<f64>,
    initial_centers: Array2<f64>,
    config: &KMeansConfig,
    visualizer: &mut dyn Visualizer,
) -> Result<KMeansResult, KMeansError> {
    let k = initial_centers.nrows();

    if config.max_iters == 0 {
        return Err(KMeansError::InvalidConfig(
            "max_iters must be greater than 0".to_string(),
        ));
    }
    if data.nrows() == 0 {
        return Err(KMeansError::InsufficientData(
            "dataset is empty".to_string(),
        ));
    }

    let mut centers = initial_centers;
    let mut wcss_trace: Vec<f64> = Vec::new();
    let mut n_iterations = 0;

    let (termination, labels, wcss) = loop {
        let iter_start = Instant::now();
        n_iterations += 1;

        let labels = find_nearest_centers(data, &centers.view())?;
        let wcss = compute_wcss(data, &centers.view(), &labels.view())?;

        report(
            visualizer.assignments(
                &format!("Iteration {}", n_iterations),
                data,
                &centers.view(),
                &labels.view(),
            ),
            "assignment",
        );

        if let Some(&previous) = wcss_trace.last() {
            if config.tol >= 0.0 && (previous - wcss).abs() <= config.tol {
                info!(
                    "Converged after {} iterations (wcss = {:.6})",
                    n_iterations, wcss
                );
                break (Termination::Converged, labels, wcss);
            }
        }
        wcss_trace.push(wcss);

        if n_iterations >= config.max_iters {
            info!(
                "Stopped after reaching max_iters = {} (wcss = {:.6})",
                config.max_iters, wcss
            );
            break (Termination::MaxItersReached, labels, wcss);
        }

        let next_centers = update_centers(data, &labels.view(), k)?;
        let shift = compute_center_shift(&centers.view(), &next_centers.view())?;
        debug!(
            "Iteration {}/{}: wcss = {:.6}, shift = {:.6}, time = {:.4}s",
            n_iterations,
            config.max_iters,
            wcss,
            shift,
            iter_start.elapsed().as_secs_f64()
        );
        centers = next_centers;
    };

    report(
        visualizer.assignments("Final clusters", data, &centers.view(), &labels.view()),
        "final cluster",
    );
    report(visualizer.wcss_trace(&wcss_trace), "wcss trace");

    Ok(KMeansResult {
        centers,
        labels,
        wcss,
        wcss_trace,
        n_iterations,
        termination,
    })
}

/// Run k-means: seeded center initialization followed by the Lloyd loop.
pub fn run_kmeans(
    data: &ArrayView2<f64>,
    config: &KMeansConfig,
    visualizer: &mut dyn Visualizer,
) -> Result<KMeansResult, KMeansError> {
    config.validate()?;

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let centers = initialize_centers(data, config.k, &mut rng)?;

    info!(
        "Training k-means: {} samples, {} features, {} clusters",
        data.nrows(),
        data.ncols(),
        config.k
    );
    report(visualizer.raw_points(data), "raw points");

    lloyd(data, centers, config, visualizer)
}
