use crate::algorithm::{run_kmeans, KMeansResult};
use crate::config::KMeansConfig;
use crate::distance::find_nearest_centers;
use crate::error::KMeansError;
use crate::plot::{NoopVisualizer, Visualizer};
use ndarray::{Array1, Array2, ArrayView2};

/// Lloyd's k-means clustering compatible with ndarray.
///
/// Wraps [`run_kmeans`] behind a scikit-learn style `fit()` / `predict()`
/// interface and keeps the last result around.
///
/// # Example
///
/// ```
/// use lloydkmeans_rs::KMeans;
/// use ndarray::array;
///
/// let data = array![[1.0, 1.0], [1.0, 2.0], [9.0, 9.0], [9.0, 8.0]];
///
/// let mut kmeans = KMeans::new(2, 2);
/// kmeans.train(&data.view()).unwrap();
///
/// let labels = kmeans.predict(&data.view()).unwrap();
/// assert_eq!(labels[0], labels[1]);
/// assert_ne!(labels[0], labels[2]);
/// ```
pub struct KMeans {
    /// Model configuration
    config: KMeansConfig,

    /// Number of features (dimensions)
    d: usize,

    /// Result of the last training run (None if not yet fitted)
    result: Option<KMeansResult>,
}

impl KMeans {
    /// Create a new KMeans instance with default configuration.
    ///
    /// # Arguments
    ///
    /// * `d` - Number of features (dimensions) in the data
    /// * `k` - Number of clusters
    ///
    /// # Panics
    ///
    /// Panics if `k` is 0.
    pub fn new(d: usize, k: usize) -> Self {
        assert!(k > 0, "k must be greater than 0");

        Self {
            config: KMeansConfig::new(k),
            d,
            result: None,
        }
    }

    /// Create a new KMeans instance with custom configuration.
    ///
    /// # Panics
    ///
    /// Panics if `config.k` is 0.
    pub fn with_config(config: KMeansConfig) -> Self {
        assert!(config.k > 0, "k must be greater than 0");

        Self {
            d: 0, // Will be set on first train call
            config,
            result: None,
        }
    }

    /// Train the model on the given data.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The data holds fewer than k distinct points
    /// - Data dimensions don't match (for subsequent calls)
    /// - A cluster becomes empty during an update step
    pub fn train(&mut self, data: &ArrayView2<f64>) -> Result<(), KMeansError> {
        self.train_with_visualizer(data, &mut NoopVisualizer)
    }

    /// Train the model, sending the raw points, every iteration's
    /// assignment and the WCSS trace to `visualizer`.
    pub fn train_with_visualizer(
        &mut self,
        data: &ArrayView2<f64>,
        visualizer: &mut dyn Visualizer,
    ) -> Result<(), KMeansError> {
        let n_features = data.ncols();

        // Set dimensions on first call, validate on subsequent calls
        if self.d == 0 {
            self.d = n_features;
        } else if n_features != self.d {
            return Err(KMeansError::DimensionMismatch(format!(
                "Expected {} features, got {}",
                self.d, n_features
            )));
        }

        let result = run_kmeans(data, &self.config, visualizer)?;

        self.result = Some(result);
        Ok(())
    }

    /// Fit the model to the data.
    ///
    /// Equivalent to `train()`, returning `&mut Self` for method chaining.
    pub fn fit(&mut self, data: &ArrayView2<f64>) -> Result<&mut Self, KMeansError> {
        self.train(data)?;
        Ok(self)
    }

    /// Assign each row of `data` to the nearest trained center.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The model has not been fitted yet
    /// - Data dimensions don't match the training data
    pub fn predict(&self, data: &ArrayView2<f64>) -> Result<Array1<usize>, KMeansError> {
        let result = self.result.as_ref().ok_or(KMeansError::NotFitted)?;

        let n_features = data.ncols();
        if n_features != self.d {
            return Err(KMeansError::DimensionMismatch(format!(
                "Expected {} features, got {}",
                self.d, n_features
            )));
        }

        find_nearest_centers(data, &result.centers.view())
    }

    /// Fit the model and predict cluster assignments in one call.
    pub fn fit_predict(&mut self, data: &ArrayView2<f64>) -> Result<Array1<usize>, KMeansError> {
        self.train(data)?;
        self.predict(data)
    }

    /// Get the centers of the fitted model.
    pub fn centers(&self) -> Option<&Array2<f64>> {
        self.result.as_ref().map(|r| &r.centers)
    }

    /// Get the full result of the last training run.
    pub fn result(&self) -> Option<&KMeansResult> {
        self.result.as_ref()
    }

    /// Final WCSS of the last training run.
    pub fn wcss(&self) -> Option<f64> {
        self.result.as_ref().map(|r| r.wcss)
    }

    /// Per-iteration WCSS of the last training run.
    pub fn wcss_trace(&self) -> Option<&[f64]> {
        self.result.as_ref().map(|r| r.wcss_trace.as_slice())
    }

    /// Get the number of clusters.
    pub fn k(&self) -> usize {
        self.config.k
    }

    /// Get the number of features (dimensions).
    pub fn d(&self) -> usize {
        self.d
    }

    /// Get the configuration.
    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }
}
