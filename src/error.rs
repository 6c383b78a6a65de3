use thiserror::Error;

/// Error types for the lloydkmeans library
#[derive(Error, Debug)]
pub enum KMeansError {
    /// The number of clusters k is invalid (must be > 0)
    #[error("Invalid k value: {0}")]
    InvalidK(String),

    /// Dataset is empty, or holds fewer distinct points than the requested k
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// A center lost every member during an update step
    #[error("Empty cluster: {0}")]
    EmptyCluster(String),

    /// A CSV row holds a non-numeric cell or has the wrong number of columns
    #[error("Malformed row: {0}")]
    MalformedRow(String),

    /// A label refers to a center index that does not exist
    #[error("Invalid label: {0}")]
    InvalidLabel(String),

    /// Points and centers (or two points) disagree in dimensionality
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Plotting was requested for data with more than 3 dimensions
    #[error("Unsupported visualization: {0}")]
    UnsupportedVisualization(String),

    /// A configuration value is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Model has not been fitted yet
    #[error("Model has not been fitted. Call train() or fit() first.")]
    NotFitted,

    /// The plotting backend failed to draw
    #[error("Plot error: {0}")]
    Plot(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
