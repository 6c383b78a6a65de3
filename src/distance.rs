use crate::error::KMeansError;
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

/// Squared L2 distance between two rows of equal length
#[inline]
fn squared_l2(a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

fn ensure_same_dimension(left: usize, right: usize, what: &str) -> Result<(), KMeansError> {
    if left != right {
        return Err(KMeansError::DimensionMismatch(format!(
            "{} have {} and {} coordinates",
            what, left, right
        )));
    }
    Ok(())
}

/// Squared Euclidean distance between two points.
///
/// Points of different length are rejected rather than compared over their
/// shared prefix.
pub fn squared_distance(a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> Result<f64, KMeansError> {
    ensure_same_dimension(a.len(), b.len(), "points")?;
    Ok(squared_l2(a, b))
}

/// Euclidean distance between two points.
///
/// Symmetric, non-negative, and zero exactly when both points agree in
/// every coordinate.
///
/// # Example
///
/// ```
/// use lloydkmeans_rs::distance;
/// use ndarray::array;
///
/// let a = array![0.0, 0.0];
/// let b = array![3.0, 4.0];
/// assert_eq!(distance(&a.view(), &b.view()).unwrap(), 5.0);
/// ```
pub fn distance(a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> Result<f64, KMeansError> {
    squared_distance(a, b).map(f64::sqrt)
}

/// Coordinate-wise mean of a set of points (one point per row).
///
/// # Errors
///
/// Returns `EmptyCluster` when `points` has no rows, since the mean of an
/// empty set is undefined.
pub fn centroid(points: &ArrayView2<f64>) -> Result<Array1<f64>, KMeansError> {
    points.mean_axis(Axis(0)).ok_or_else(|| {
        KMeansError::EmptyCluster("cannot compute the centroid of zero points".to_string())
    })
}

/// Index and squared distance of the center nearest to `point`.
/// Ties go to the center that comes first.
#[inline]
fn nearest_center(point: &ArrayView1<f64>, centers: &ArrayView2<f64>) -> (usize, f64) {
    let mut best_label = 0;
    let mut best_dist = f64::INFINITY;

    for (j, center) in centers.outer_iter().enumerate() {
        let dist = squared_l2(point, &center);
        if dist < best_dist {
            best_dist = dist;
            best_label = j;
        }
    }

    (best_label, best_dist)
}

/// Find the nearest center for each data point (the assignment step).
///
/// # Arguments
/// * `data` - Data points (n_data, n_features)
/// * `centers` - Current centers (k, n_features)
///
/// # Returns
/// * `labels` - Index of the nearest center for each data point (n_data,)
///
/// Ties are broken in favour of the center with the lowest index, so the
/// result is fully determined by the order of `centers`.
pub fn find_nearest_centers(
    data: &ArrayView2<f64>,
    centers: &ArrayView2<f64>,
) -> Result<Array1<usize>, KMeansError> {
    if centers.nrows() == 0 {
        return Err(KMeansError::InvalidK(
            "at least one center is required".to_string(),
        ));
    }
    ensure_same_dimension(data.ncols(), centers.ncols(), "data points and centers")?;

    Ok(data
        .outer_iter()
        .map(|point| nearest_center(&point, centers).0)
        .collect())
}

/// Check that `labels` holds one entry per point and only names centers
/// below `k`.
pub(crate) fn check_labels(
    n_points: usize,
    labels: &ArrayView1<usize>,
    k: usize,
) -> Result<(), KMeansError> {
    if labels.len() != n_points {
        return Err(KMeansError::DimensionMismatch(format!(
            "{} labels for {} points",
            labels.len(),
            n_points
        )));
    }
    if let Some((i, &label)) = labels.iter().enumerate().find(|&(_, &label)| label >= k) {
        return Err(KMeansError::InvalidLabel(format!(
            "point {} is assigned to center {}, but there are only {} centers",
            i, label, k
        )));
    }
    Ok(())
}

/// Within-cluster sum of squares: total squared distance from every point
/// to the center it is assigned to.
///
/// # Errors
///
/// `DimensionMismatch` when points and centers differ in width or the label
/// count differs from the point count, `InvalidLabel` when a label names a
/// center that does not exist.
pub fn compute_wcss(
    data: &ArrayView2<f64>,
    centers: &ArrayView2<f64>,
    labels: &ArrayView1<usize>,
) -> Result<f64, KMeansError> {
    ensure_same_dimension(data.ncols(), centers.ncols(), "data points and centers")?;
    check_labels(data.nrows(), labels, centers.nrows())?;

    Ok(data
        .outer_iter()
        .zip(labels.iter())
        .map(|(point, &label)| squared_l2(&point, &centers.row(label)))
        .sum())
}

/// Compute center shift (sum of L2 norms of center movements)
pub fn compute_center_shift(
    old_centers: &ArrayView2<f64>,
    new_centers: &ArrayView2<f64>,
) -> Result<f64, KMeansError> {
    if old_centers.dim() != new_centers.dim() {
        return Err(KMeansError::DimensionMismatch(format!(
            "old centers are {:?} but new centers are {:?}",
            old_centers.dim(),
            new_centers.dim()
        )));
    }

    Ok(old_centers
        .outer_iter()
        .zip(new_centers.outer_iter())
        .map(|(old_c, new_c)| squared_l2(&old_c, &new_c).sqrt())
        .sum())
}
