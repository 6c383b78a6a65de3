//! Plotting hooks called by the clustering loop.
//!
//! The loop only talks to the [`Visualizer`] trait. Failures returned by a
//! visualizer are logged and skipped, never propagated.

use crate::error::KMeansError;
use crate::palette::{color_for_index, colors_for_centers};
use log::{debug, warn};
use ndarray::{ArrayView1, ArrayView2};
use plotters::prelude::*;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Largest dimensionality that can be plotted
pub const MAX_PLOT_DIMENSION: usize = 3;

/// Receiver for the plots produced while clustering
pub trait Visualizer {
    /// Scatter of the raw data points
    fn raw_points(&mut self, data: &ArrayView2<f64>) -> Result<(), KMeansError>;

    /// Scatter of points color-coded by assigned center, with the centers
    fn assignments(
        &mut self,
        title: &str,
        data: &ArrayView2<f64>,
        centers: &ArrayView2<f64>,
        labels: &ArrayView1<usize>,
    ) -> Result<(), KMeansError>;

    /// Line plot of the per-iteration WCSS
    fn wcss_trace(&mut self, trace: &[f64]) -> Result<(), KMeansError>;

    /// Line plot of final WCSS against k
    fn elbow_curve(&mut self, errors: &[(usize, f64)]) -> Result<(), KMeansError>;
}

/// Visualizer that draws nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopVisualizer;

impl Visualizer for NoopVisualizer {
    fn raw_points(&mut self, _data: &ArrayView2<f64>) -> Result<(), KMeansError> {
        Ok(())
    }

    fn assignments(
        &mut self,
        _title: &str,
        _data: &ArrayView2<f64>,
        _centers: &ArrayView2<f64>,
        _labels: &ArrayView1<usize>,
    ) -> Result<(), KMeansError> {
        Ok(())
    }

    fn wcss_trace(&mut self, _trace: &[f64]) -> Result<(), KMeansError> {
        Ok(())
    }

    fn elbow_curve(&mut self, _errors: &[(usize, f64)]) -> Result<(), KMeansError> {
        Ok(())
    }
}

/// Log a failed plot and carry on
pub(crate) fn report(outcome: Result<(), KMeansError>, what: &str) {
    if let Err(e) = outcome {
        warn!("Skipping {} plot: {}", what, e);
    }
}

/// Returns an error when data of this dimensionality cannot be plotted
pub fn check_plot_dimension(dimension: usize) -> Result<(), KMeansError> {
    if dimension == 0 || dimension > MAX_PLOT_DIMENSION {
        return Err(KMeansError::UnsupportedVisualization(format!(
            "cannot plot {}-dimensional points (1 to {} supported)",
            dimension, MAX_PLOT_DIMENSION
        )));
    }
    Ok(())
}

/// Output settings for [`SvgPlotter`]
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Directory the SVG files are written to
    pub output_dir: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("plots"),
            width: 800,
            height: 600,
        }
    }
}

impl PlotConfig {
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

fn plot_err<E: std::fmt::Display>(e: E) -> KMeansError {
    KMeansError::Plot(e.to_string())
}

/// Padded plotting range covering every value
fn axis_range<I: Iterator<Item = f64>>(values: I) -> Range<f64> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    if min == max {
        return (min - 1.0)..(max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad)..(max + pad)
}

/// Coordinates of a row padded with zeros up to three values
fn coords(row: ArrayView1<f64>) -> (f64, f64, f64) {
    let get = |i: usize| row.get(i).copied().unwrap_or(0.0);
    (get(0), get(1), get(2))
}

/// Writes every plot as a numbered SVG file
pub struct SvgPlotter {
    config: PlotConfig,
    written: Vec<PathBuf>,
}

impl SvgPlotter {
    /// Create the plotter, creating the output directory if needed.
    pub fn new(config: PlotConfig) -> Result<Self, KMeansError> {
        fs::create_dir_all(&config.output_dir)?;
        Ok(Self {
            config,
            written: Vec::new(),
        })
    }

    /// Files written so far, in order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn next_path(&self, title: &str) -> PathBuf {
        let slug: String = title
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect();
        self.config
            .output_dir
            .join(format!("{:03}_{}.svg", self.written.len() + 1, slug))
    }

    fn scatter(
        &mut self,
        title: &str,
        data: &ArrayView2<f64>,
        point_colors: &[RGBColor],
        centers: Option<(&ArrayView2<f64>, Vec<RGBColor>)>,
    ) -> Result<(), KMeansError> {
        let dimension = data.ncols();
        check_plot_dimension(dimension)?;

        let path = self.next_path(title);
        let points: Vec<(f64, f64, f64)> = data.outer_iter().map(coords).collect();
        let center_points: Vec<((f64, f64, f64), RGBColor)> = match &centers {
            Some((c, colors)) => c
                .outer_iter()
                .map(coords)
                .zip(colors.iter().copied())
                .collect(),
            None => Vec::new(),
        };

        let all = || points.iter().chain(center_points.iter().map(|(p, _)| p));
        let x_range = axis_range(all().map(|p| p.0));
        let y_range = axis_range(all().map(|p| p.1));

        if dimension == 3 {
            let z_range = axis_range(all().map(|p| p.2));
            self.draw_scatter_3d(
                &path,
                title,
                &points,
                point_colors,
                &center_points,
                x_range,
                y_range,
                z_range,
            )?;
        } else {
            self.draw_scatter_2d(
                &path,
                title,
                &points,
                point_colors,
                &center_points,
                x_range,
                y_range,
            )?;
        }

        debug!("Wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_scatter_2d(
        &self,
        path: &Path,
        title: &str,
        points: &[(f64, f64, f64)],
        point_colors: &[RGBColor],
        centers: &[((f64, f64, f64), RGBColor)],
        x_range: Range<f64>,
        y_range: Range<f64>,
    ) -> Result<(), KMeansError> {
        let root = SVGBackend::new(path, (self.config.width, self.config.height)).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 30))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range, y_range)
            .map_err(plot_err)?;

        chart
            .configure_mesh()
            .x_desc("x")
            .y_desc("y")
            .draw()
            .map_err(plot_err)?;

        chart
            .draw_series(points.iter().zip(point_colors.iter()).map(|(&(x, y, _), color)| {
                Circle::new((x, y), 4, color.stroke_width(1))
            }))
            .map_err(plot_err)?;

        chart
            .draw_series(centers.iter().map(|&((x, y, _), color)| {
                EmptyElement::at((x, y)) + Rectangle::new([(-5, -5), (5, 5)], color.filled())
            }))
            .map_err(plot_err)?;

        root.present().map_err(plot_err)?;
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_scatter_3d(
        &self,
        path: &Path,
        title: &str,
        points: &[(f64, f64, f64)],
        point_colors: &[RGBColor],
        centers: &[((f64, f64, f64), RGBColor)],
        x_range: Range<f64>,
        y_range: Range<f64>,
        z_range: Range<f64>,
    ) -> Result<(), KMeansError> {
        let root = SVGBackend::new(path, (self.config.width, self.config.height)).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 30))
            .margin(20)
            .build_cartesian_3d(x_range, y_range, z_range)
            .map_err(plot_err)?;

        chart.configure_axes().draw().map_err(plot_err)?;

        chart
            .draw_series(points.iter().zip(point_colors.iter()).map(|(&p, color)| {
                Circle::new(p, 4, color.stroke_width(1))
            }))
            .map_err(plot_err)?;

        chart
            .draw_series(centers.iter().map(|&(p, color)| {
                EmptyElement::at(p) + Rectangle::new([(-5, -5), (5, 5)], color.filled())
            }))
            .map_err(plot_err)?;

        root.present().map_err(plot_err)?;
        Ok(())
    }

    fn line(
        &mut self,
        title: &str,
        x_desc: &str,
        y_desc: &str,
        values: &[(f64, f64)],
    ) -> Result<(), KMeansError> {
        if values.is_empty() {
            return Err(KMeansError::Plot(format!("nothing to draw for '{}'", title)));
        }

        let path = self.next_path(title);
        {
            let root = SVGBackend::new(&path, (self.config.width, self.config.height))
                .into_drawing_area();
            root.fill(&WHITE).map_err(plot_err)?;

            let x_range = axis_range(values.iter().map(|v| v.0));
            let y_range = axis_range(values.iter().map(|v| v.1));

            let mut chart = ChartBuilder::on(&root)
                .caption(title, ("sans-serif", 30))
                .margin(20)
                .x_label_area_size(40)
                .y_label_area_size(60)
                .build_cartesian_2d(x_range, y_range)
                .map_err(plot_err)?;

            chart
                .configure_mesh()
                .x_desc(x_desc)
                .y_desc(y_desc)
                .draw()
                .map_err(plot_err)?;

            let line_color = color_for_index(0);
            chart
                .draw_series(LineSeries::new(values.iter().copied(), &line_color))
                .map_err(plot_err)?;
            chart
                .draw_series(
                    values
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), 3, line_color.filled())),
                )
                .map_err(plot_err)?;

            root.present().map_err(plot_err)?;
        }

        debug!("Wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }
}

impl Visualizer for SvgPlotter {
    fn raw_points(&mut self, data: &ArrayView2<f64>) -> Result<(), KMeansError> {
        let colors = vec![color_for_index(0); data.nrows()];
        self.scatter("Random points", data, &colors, None)
    }

    fn assignments(
        &mut self,
        title: &str,
        data: &ArrayView2<f64>,
        centers: &ArrayView2<f64>,
        labels: &ArrayView1<usize>,
    ) -> Result<(), KMeansError> {
        let center_colors = colors_for_centers(centers);
        let point_colors: Vec<RGBColor> = labels
            .iter()
            .map(|&label| center_colors.get(label).copied().unwrap_or(BLACK))
            .collect();
        self.scatter(title, data, &point_colors, Some((centers, center_colors)))
    }

    fn wcss_trace(&mut self, trace: &[f64]) -> Result<(), KMeansError> {
        let values: Vec<(f64, f64)> = trace
            .iter()
            .enumerate()
            .map(|(i, &wcss)| (i as f64, wcss))
            .collect();
        self.line("Within Cluster Squared Error", "iteration", "wcss", &values)
    }

    fn elbow_curve(&mut self, errors: &[(usize, f64)]) -> Result<(), KMeansError> {
        let values: Vec<(f64, f64)> = errors.iter().map(|&(k, wcss)| (k as f64, wcss)).collect();
        self.line("Elbow method", "k", "wcss", &values)
    }
}
