//! Data sources: a seeded synthetic generator and a CSV loader.

use crate::config::GeneratorConfig;
use crate::error::KMeansError;
use csv::{ReaderBuilder, Trim};
use log::{debug, info};
use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Points loaded from a CSV file
#[derive(Debug, Clone)]
pub struct CsvDataset {
    /// Column names from the header row. Informational only.
    pub headers: Vec<String>,
    /// One row per data line
    pub points: Array2<f64>,
    /// Lines read, header included
    pub lines_processed: usize,
}

/// Generate uniformly random integer-valued points.
///
/// Every coordinate is drawn from `low..=high`. The same config always
/// produces the same points.
///
/// # Example
///
/// ```
/// use lloydkmeans_rs::{generate_points, GeneratorConfig};
///
/// let points = generate_points(&GeneratorConfig::new(50, 2)).unwrap();
/// assert_eq!(points.dim(), (50, 2));
/// assert!(points.iter().all(|&v| (0.0..=100.0).contains(&v) && v.fract() == 0.0));
/// ```
pub fn generate_points(config: &GeneratorConfig) -> Result<Array2<f64>, KMeansError> {
    if config.dimension == 0 {
        return Err(KMeansError::InvalidConfig(
            "dimension must be at least 1".to_string(),
        ));
    }
    if config.low > config.high {
        return Err(KMeansError::InvalidConfig(format!(
            "empty coordinate range {}..={}",
            config.low, config.high
        )));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let coords = Array2::random_using(
        (config.num_points, config.dimension),
        Uniform::new_inclusive(config.low, config.high),
        &mut rng,
    );

    debug!(
        "Generated {} points in {} dimensions (range {}..={}, seed {})",
        config.num_points, config.dimension, config.low, config.high, config.seed
    );
    Ok(coords.mapv(|v| v as f64))
}

/// Load points from a CSV file with a header row.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<CsvDataset, KMeansError> {
    let file = File::open(path.as_ref())?;
    let dataset = read_csv(BufReader::new(file))?;
    info!(
        "Loaded {} points with {} features from {} ({} lines processed)",
        dataset.points.nrows(),
        dataset.points.ncols(),
        path.as_ref().display(),
        dataset.lines_processed
    );
    Ok(dataset)
}

/// Read comma-separated points: a header row, then one numeric row per
/// point with one column per dimension.
///
/// # Errors
///
/// - `MalformedRow` if a cell is not a finite number or a row's width differs from
///   the first data row
/// - `InsufficientData` if there are no data rows
pub fn read_csv<R: Read>(reader: R) -> Result<CsvDataset, KMeansError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let mut lines_processed = 1;
    let mut width: Option<usize> = None;
    let mut values: Vec<f64> = Vec::new();
    let mut n_rows = 0;

    for record in reader.records() {
        let record = record?;
        lines_processed += 1;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(lines_processed as u64);

        match width {
            None => width = Some(record.len()),
            Some(w) if w != record.len() => {
                return Err(KMeansError::MalformedRow(format!(
                    "line {}: expected {} columns, found {}",
                    line,
                    w,
                    record.len()
                )));
            }
            Some(_) => {}
        }

        for (column, cell) in record.iter().enumerate() {
            let value = cell
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    KMeansError::MalformedRow(format!(
                        "line {}, column {}: '{}' is not a finite number",
                        line,
                        column + 1,
                        cell
                    ))
                })?;
            values.push(value);
        }
        n_rows += 1;
    }

    let width = match width {
        Some(w) if n_rows > 0 => w,
        _ => {
            return Err(KMeansError::InsufficientData(
                "CSV input has no data rows".to_string(),
            ))
        }
    };
    if headers.len() != width {
        debug!(
            "Header names {} columns but rows have {}",
            headers.len(),
            width
        );
    }

    let points = Array2::from_shape_vec((n_rows, width), values)
        .map_err(|e| KMeansError::MalformedRow(e.to_string()))?;

    Ok(CsvDataset {
        headers,
        points,
        lines_processed,
    })
}

/// Default column names for generated data: x, y, z, then x4, x5, ...
pub fn default_column_names(dimension: usize) -> Vec<String> {
    (0..dimension)
        .map(|i| match i {
            0 => "x".to_string(),
            1 => "y".to_string(),
            2 => "z".to_string(),
            _ => format!("x{}", i + 1),
        })
        .collect()
}

/// Points plus their column names
#[derive(Debug, Clone)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub points: Array2<f64>,
}

/// Where the points of a run come from
#[derive(Debug, Clone)]
pub enum DataSource {
    /// Seeded synthetic points
    Random(GeneratorConfig),
    /// A CSV file with a header row
    Csv(PathBuf),
}

impl DataSource {
    pub fn load(&self) -> Result<Dataset, KMeansError> {
        match self {
            DataSource::Random(config) => Ok(Dataset {
                headers: default_column_names(config.dimension),
                points: generate_points(config)?,
            }),
            DataSource::Csv(path) => {
                let csv = load_csv(path)?;
                Ok(Dataset {
                    headers: csv.headers,
                    points: csv.points,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Write;
    use tempdir::TempDir;

    #[test]
    fn test_generate_points_deterministic() {
        let config = GeneratorConfig::new(30, 3).with_range(-5, 5).with_seed(7);

        let a = generate_points(&config).unwrap();
        let b = generate_points(&config).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.dim(), (30, 3));
        assert!(a.iter().all(|&v| (-5.0..=5.0).contains(&v) && v.fract() == 0.0));
    }

    #[test]
    fn test_generate_points_rejects_bad_config() {
        let zero_dim = GeneratorConfig::new(10, 0);
        let reversed = GeneratorConfig::new(10, 2).with_range(5, 1);

        assert!(matches!(
            generate_points(&zero_dim),
            Err(KMeansError::InvalidConfig(_))
        ));
        assert!(matches!(
            generate_points(&reversed),
            Err(KMeansError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_read_csv() {
        let input = "x,y\n1,1\n1,2\n9,9\n9,8\n";
        let dataset = read_csv(input.as_bytes()).unwrap();

        assert_eq!(dataset.headers, vec!["x", "y"]);
        assert_eq!(dataset.lines_processed, 5);
        assert_eq!(
            dataset.points,
            array![[1.0, 1.0], [1.0, 2.0], [9.0, 9.0], [9.0, 8.0]]
        );
    }

    #[test]
    fn test_read_csv_trims_and_parses_floats() {
        let input = "a, b, c\n 0.5, -1e2, 3\n";
        let dataset = read_csv(input.as_bytes()).unwrap();

        assert_eq!(dataset.points, array![[0.5, -100.0, 3.0]]);
    }

    #[test]
    fn test_read_csv_non_numeric_cell() {
        let input = "x,y\n1,1\n1,oops\n";
        let result = read_csv(input.as_bytes());

        match result {
            Err(KMeansError::MalformedRow(msg)) => {
                assert!(msg.contains("line 3"), "unexpected message: {}", msg);
                assert!(msg.contains("oops"));
            }
            other => panic!("expected MalformedRow, got {:?}", other),
        }
    }

    #[test]
    fn test_read_csv_rejects_non_finite_cells() {
        for cell in ["NaN", "inf", "-infinity"] {
            let input = format!("x,y\n{},1\n2,2\n", cell);
            let result = read_csv(input.as_bytes());

            match result {
                Err(KMeansError::MalformedRow(msg)) => {
                    assert!(msg.contains("line 2"), "unexpected message: {}", msg);
                    assert!(msg.contains(cell));
                }
                other => panic!("expected MalformedRow for {}, got {:?}", cell, other),
            }
        }
    }

    #[test]
    fn test_read_csv_inconsistent_width() {
        let input = "x,y\n1,1\n1,2,3\n";
        let result = read_csv(input.as_bytes());

        assert!(matches!(result, Err(KMeansError::MalformedRow(_))));
    }

    #[test]
    fn test_read_csv_header_only() {
        let result = read_csv("x,y\n".as_bytes());
        assert!(matches!(result, Err(KMeansError::InsufficientData(_))));
    }

    #[test]
    fn test_load_csv_from_file() {
        let dir = TempDir::new("kmeans_csv").unwrap();
        let path = dir.path().join("points.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "x,y,z").unwrap();
        writeln!(file, "1,2,3").unwrap();
        writeln!(file, "4,5,6").unwrap();
        drop(file);

        let dataset = DataSource::Csv(path).load().unwrap();
        assert_eq!(dataset.headers, vec!["x", "y", "z"]);
        assert_eq!(dataset.points.dim(), (2, 3));
    }

    #[test]
    fn test_load_csv_missing_file() {
        let result = load_csv("/definitely/not/here.csv");
        assert!(matches!(result, Err(KMeansError::Io(_))));
    }

    #[test]
    fn test_default_column_names() {
        assert_eq!(default_column_names(5), vec!["x", "y", "z", "x4", "x5"]);
    }
}
