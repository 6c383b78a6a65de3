//! # lloydkmeans-rs
//!
//! Lloyd's k-means clustering over ndarray point sets, with automatic
//! selection of the cluster count by the elbow method.
//!
//! ## Features
//!
//! - **Classic Lloyd iteration**: alternating nearest-center assignment and
//!   centroid update until the within-cluster sum of squares (WCSS) repeats
//! - **Reproducible**: every random choice comes from a seeded ChaCha8 RNG
//! - **Elbow method**: sweeps k = 1..=k_max and picks the k where the WCSS
//!   curve bends
//! - **Data sources**: seeded synthetic points and CSV files with a header row
//! - **Plots**: optional SVG scatter and line plots through the
//!   [`Visualizer`] hooks
//!
//! ## Example
//!
//! ```rust
//! use lloydkmeans_rs::{generate_points, GeneratorConfig, KMeans};
//!
//! // 50 random integer points in [0, 100]^2
//! let data = generate_points(&GeneratorConfig::default()).unwrap();
//!
//! let mut kmeans = KMeans::new(2, 3);
//! kmeans.train(&data.view()).unwrap();
//!
//! let labels = kmeans.predict(&data.view()).unwrap();
//! assert_eq!(labels.len(), 50);
//!
//! let trace = kmeans.wcss_trace().unwrap();
//! assert!(trace.windows(2).all(|w| w[1] <= w[0] + 1e-9));
//! ```
//!
//! ## Choosing k
//!
//! ```rust
//! use lloydkmeans_rs::{elbow_method, ElbowConfig, NoopVisualizer};
//! use ndarray::array;
//!
//! let data = array![
//!     [0.0, 0.0], [0.0, 1.0], [1.0, 0.0],
//!     [50.0, 50.0], [50.0, 51.0], [51.0, 50.0],
//! ];
//!
//! let result = elbow_method(&data.view(), &ElbowConfig::new(4), &mut NoopVisualizer).unwrap();
//! assert_eq!(result.errors.len(), 4);
//! assert_eq!(result.best_k, 2);
//! ```

mod algorithm;
mod config;
mod data;
mod distance;
mod elbow;
mod error;
mod kmeans;
mod palette;
mod plot;

pub use algorithm::{
    count_distinct_points, group_by_center, initialize_centers, lloyd, run_kmeans,
    update_centers, KMeansResult, Termination,
};
pub use config::{ElbowConfig, GeneratorConfig, KMeansConfig};
pub use data::{
    default_column_names, generate_points, load_csv, read_csv, CsvDataset, DataSource, Dataset,
};
pub use distance::{
    centroid, compute_center_shift, compute_wcss, distance, find_nearest_centers,
    squared_distance,
};
pub use elbow::{elbow_method, select_k, ElbowResult};
pub use error::KMeansError;
pub use kmeans::KMeans;
pub use palette::{color_for_index, colors_for_centers, colors_for_ids, to_hex};
pub use plot::{check_plot_dimension, NoopVisualizer, PlotConfig, SvgPlotter, Visualizer};
