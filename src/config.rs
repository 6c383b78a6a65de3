use crate::error::KMeansError;

/// Configuration for a single Lloyd's k-means run
#[derive(Debug, Clone)]
pub struct KMeansConfig {
    /// Number of clusters
    pub k: usize,

    /// Maximum number of assignment/update iterations
    pub max_iters: usize,

    /// Convergence tolerance on the WCSS of two consecutive iterations.
    /// The default of 0.0 stops only when the WCSS repeats exactly.
    /// Set to a negative value to disable early stopping.
    pub tol: f64,

    /// Random seed for center initialization
    pub seed: u64,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: 5,
            max_iters: 100,
            tol: 0.0,
            seed: 1,
        }
    }
}

impl KMeansConfig {
    /// Create a new configuration with the specified number of clusters
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Default::default()
        }
    }

    /// Set the maximum number of iterations
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Set the convergence tolerance
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check the values that do not depend on the dataset.
    pub fn validate(&self) -> Result<(), KMeansError> {
        if self.k == 0 {
            return Err(KMeansError::InvalidK(
                "k must be greater than 0".to_string(),
            ));
        }
        if self.max_iters == 0 {
            return Err(KMeansError::InvalidConfig(
                "max_iters must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration for the elbow-method sweep over k = 1..=k_max
#[derive(Debug, Clone)]
pub struct ElbowConfig {
    /// Largest candidate k (inclusive)
    pub k_max: usize,

    /// Settings shared by every run of the sweep. Its `k` is ignored.
    pub kmeans: KMeansConfig,
}

impl Default for ElbowConfig {
    fn default() -> Self {
        Self {
            k_max: 10,
            kmeans: KMeansConfig::default(),
        }
    }
}

impl ElbowConfig {
    pub fn new(k_max: usize) -> Self {
        Self {
            k_max,
            ..Default::default()
        }
    }

    pub fn with_kmeans(mut self, kmeans: KMeansConfig) -> Self {
        self.kmeans = kmeans;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.kmeans.seed = seed;
        self
    }

    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.kmeans.max_iters = max_iters;
        self
    }
}

/// Configuration for the synthetic point generator
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Number of points to generate
    pub num_points: usize,

    /// Number of coordinates per point
    pub dimension: usize,

    /// Smallest coordinate value (inclusive)
    pub low: i64,

    /// Largest coordinate value (inclusive)
    pub high: i64,

    /// Random seed
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_points: 50,
            dimension: 2,
            low: 0,
            high: 100,
            seed: 1,
        }
    }
}

impl GeneratorConfig {
    pub fn new(num_points: usize, dimension: usize) -> Self {
        Self {
            num_points,
            dimension,
            ..Default::default()
        }
    }

    /// Set the inclusive coordinate range
    pub fn with_range(mut self, low: i64, high: i64) -> Self {
        self.low = low;
        self.high = high;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = KMeansConfig::default();
        assert_eq!(config.max_iters, 100);
        assert_eq!(config.tol, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_chain() {
        let config = KMeansConfig::new(3).with_max_iters(7).with_seed(9).with_tol(1e-3);
        assert_eq!(config.k, 3);
        assert_eq!(config.max_iters, 7);
        assert_eq!(config.seed, 9);
        assert_eq!(config.tol, 1e-3);
    }

    #[test]
    fn test_validate_rejects_zero_k() {
        let result = KMeansConfig::new(0).validate();
        assert!(matches!(result, Err(KMeansError::InvalidK(_))));
    }

    #[test]
    fn test_validate_rejects_zero_iters() {
        let result = KMeansConfig::new(2).with_max_iters(0).validate();
        assert!(matches!(result, Err(KMeansError::InvalidConfig(_))));
    }

    #[test]
    fn test_elbow_defaults() {
        let config = ElbowConfig::default().with_seed(4);
        assert_eq!(config.k_max, 10);
        assert_eq!(config.kmeans.seed, 4);
    }
}
