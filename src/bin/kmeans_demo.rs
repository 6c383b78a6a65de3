//! Demo binary: cluster synthetic or CSV points and plot the result.
//!
//! Usage: `kmeans-demo [K] [data.csv] [options]`
//!
//! - `K` alone clusters synthetic points into K clusters
//! - `data.csv` alone runs the elbow method to choose K
//! - both cluster the CSV points into K clusters
//! - neither clusters synthetic points into 5 clusters

use anyhow::{bail, Context, Result};
use clap::Parser;
use lloydkmeans_rs::{
    check_plot_dimension, elbow_method, DataSource, ElbowConfig, GeneratorConfig, KMeans,
    KMeansConfig, KMeansResult, NoopVisualizer, PlotConfig, SvgPlotter, Visualizer,
};
use log::{info, warn};
use std::path::PathBuf;

const DEFAULT_K: usize = 5;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of clusters and/or a .csv data file, in any order
    inputs: Vec<String>,

    #[arg(long, default_value_t = 100)]
    max_iters: usize,

    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Largest k tried by the elbow method
    #[arg(long, default_value_t = 10)]
    k_max: usize,

    // Synthetic data
    #[arg(long, default_value_t = 50)]
    num_points: usize,

    #[arg(long, default_value_t = 2)]
    dimension: usize,

    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    low: i64,

    #[arg(long, default_value_t = 100, allow_hyphen_values = true)]
    high: i64,

    /// Directory for the SVG plots
    #[arg(long, default_value = "plots")]
    output_dir: PathBuf,

    #[arg(long, default_value_t = false)]
    no_plots: bool,
}

/// Split the positional inputs into an optional k and an optional CSV path
fn parse_inputs(inputs: &[String]) -> Result<(Option<usize>, Option<PathBuf>)> {
    let mut k = None;
    let mut csv = None;

    for input in inputs {
        if input.to_ascii_lowercase().ends_with(".csv") {
            if csv.is_some() {
                bail!("only one CSV file may be given");
            }
            csv = Some(PathBuf::from(input));
        } else if let Ok(value) = input.parse::<usize>() {
            if k.is_some() {
                bail!("only one number of clusters may be given");
            }
            if value == 0 {
                bail!("the number of clusters must be greater than 0");
            }
            k = Some(value);
        } else {
            bail!(
                "unrecognized argument '{}': expected a number of clusters or a .csv file",
                input
            );
        }
    }

    Ok((k, csv))
}

fn make_visualizer(args: &Args, dimension: usize) -> Box<dyn Visualizer> {
    if args.no_plots {
        return Box::new(NoopVisualizer);
    }
    if let Err(e) = check_plot_dimension(dimension) {
        warn!("Plots disabled: {}", e);
        return Box::new(NoopVisualizer);
    }
    match SvgPlotter::new(PlotConfig::new(&args.output_dir)) {
        Ok(plotter) => Box::new(plotter),
        Err(e) => {
            warn!(
                "Plots disabled: cannot use {}: {}",
                args.output_dir.display(),
                e
            );
            Box::new(NoopVisualizer)
        }
    }
}

fn print_result(result: &KMeansResult) {
    println!(
        "Finished after {} iterations ({:?})",
        result.n_iterations, result.termination
    );
    println!("WCSS: {:.4}", result.wcss);
    println!("Centers:");
    for (j, (center, members)) in result
        .centers
        .outer_iter()
        .zip(result.clusters())
        .enumerate()
    {
        let coords: Vec<String> = center.iter().map(|v| format!("{:.4}", v)).collect();
        println!("  {}: ({}) - {} points", j, coords.join(", "), members.len());
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let (k, csv) = parse_inputs(&args.inputs)?;

    let source = match &csv {
        Some(path) => DataSource::Csv(path.clone()),
        None => DataSource::Random(
            GeneratorConfig::new(args.num_points, args.dimension)
                .with_range(args.low, args.high)
                .with_seed(args.seed),
        ),
    };
    let dataset = source.load().context("failed to load data")?;
    println!(
        "Columns: {} ({} points)",
        dataset.headers.join(", "),
        dataset.points.nrows()
    );

    let data = dataset.points.view();
    let mut visualizer = make_visualizer(&args, data.ncols());

    let kmeans_config = KMeansConfig::new(k.unwrap_or(DEFAULT_K))
        .with_max_iters(args.max_iters)
        .with_seed(args.seed);

    match (k, csv) {
        (None, Some(_)) => {
            info!("No k given, running the elbow method up to k = {}", args.k_max);
            let config = ElbowConfig::new(args.k_max).with_kmeans(kmeans_config);
            let elbow = elbow_method(&data, &config, visualizer.as_mut())
                .context("elbow method failed")?;

            println!("k\tWCSS");
            for (k, wcss) in &elbow.errors {
                println!("{}\t{:.4}", k, wcss);
            }
            println!("Selected k = {}", elbow.best_k);

            let best = elbow.best();
            if let Err(e) = visualizer.assignments(
                &format!("Final clusters k={}", elbow.best_k),
                &data,
                &best.centers.view(),
                &best.labels.view(),
            ) {
                warn!("Skipping final cluster plot: {}", e);
            }
            print_result(best);
        }
        _ => {
            let mut kmeans = KMeans::with_config(kmeans_config);
            kmeans
                .train_with_visualizer(&data, visualizer.as_mut())
                .context("k-means failed")?;
            if let Some(result) = kmeans.result() {
                print_result(result);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_inputs_any_order() {
        let (k, csv) = parse_inputs(&strings(&["points.CSV", "3"])).unwrap();
        assert_eq!(k, Some(3));
        assert_eq!(csv, Some(PathBuf::from("points.CSV")));

        let (k, csv) = parse_inputs(&strings(&["4"])).unwrap();
        assert_eq!(k, Some(4));
        assert!(csv.is_none());

        let (k, csv) = parse_inputs(&[]).unwrap();
        assert!(k.is_none() && csv.is_none());
    }

    #[test]
    fn test_parse_inputs_rejects_unknown() {
        assert!(parse_inputs(&strings(&["points.txt"])).is_err());
        assert!(parse_inputs(&strings(&["2", "3"])).is_err());
        assert!(parse_inputs(&strings(&["a.csv", "b.csv"])).is_err());
        assert!(parse_inputs(&strings(&["0"])).is_err());
    }
}
