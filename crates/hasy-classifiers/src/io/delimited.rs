//! CSV/TSV split reader.
//!
//! A data directory holds `train.csv` and `test.csv` (or `.tsv`). Each row is
//! one sample: an integer label column plus one column per feature value.
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use csv::StringRecord;
use serde::{Deserialize, Serialize};

use crate::data_handling::{Dataset, SampleArray};

/// Configuration for reading delimited dataset splits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Column name holding the integer class label.
    pub label_column: String,
    /// Columns to skip entirely (e.g. file names or ids).
    pub ignore_columns: Vec<String>,
    /// Per-sample shape of the feature columns (e.g. `[32, 32]`).
    /// When `None`, each sample is a flat vector.
    pub sample_shape: Option<Vec<usize>>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            label_column: "label".to_string(),
            ignore_columns: vec!["id".to_string(), "path".to_string()],
            sample_shape: None,
        }
    }
}

/// One split as read from disk.
#[derive(Debug)]
pub struct SplitData {
    pub samples: SampleArray,
    pub labels: Vec<i32>,
    pub feature_names: Vec<String>,
}

/// Load the `train` and `test` splits from `dir`.
pub fn load_dataset<P: AsRef<Path>>(dir: P, config: &LoaderConfig) -> Result<Dataset> {
    let dir = dir.as_ref();
    let train_path = locate_split(dir, "train")?;
    let test_path = locate_split(dir, "test")?;

    let train = read_split(&train_path, config)?;
    let test = read_split(&test_path, config)?;
    log::debug!(
        "Read {} training rows from {} and {} test rows from {}",
        train.labels.len(),
        train_path.display(),
        test.labels.len(),
        test_path.display()
    );

    if train.feature_names != test.feature_names {
        log::warn!("Train and test feature columns differ in name or order");
    }

    Dataset::new(train.samples, test.samples, train.labels, test.labels)
        .context("Train and test splits are inconsistent")
}

/// Find `<split>.csv` or `<split>.tsv` inside `dir`.
pub fn locate_split(dir: &Path, split: &str) -> Result<PathBuf> {
    for ext in ["csv", "tsv"] {
        let candidate = dir.join(format!("{}.{}", split, ext));
        if candidate.is_file() {
            return Ok(candidate);
        }
    }
    anyhow::bail!(
        "No {} split found in {} (expected {}.csv or {}.tsv)",
        split,
        dir.display(),
        split,
        split
    )
}

/// Read one delimited split. The delimiter follows the file extension.
pub fn read_split<P: AsRef<Path>>(path: P, config: &LoaderConfig) -> Result<SplitData> {
    let path = path.as_ref();
    let is_tsv = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("tsv"))
        .unwrap_or(false);
    let delimiter = if is_tsv { b'\t' } else { b',' };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open split file: {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header row of {}", path.display()))?
        .clone();

    let label_idx = find_column(&headers, &config.label_column)
        .ok_or_else(|| anyhow!("Missing label column '{}' in {}", config.label_column, path.display()))?;

    let feature_indices = resolve_feature_indices(&headers, config, label_idx);
    if feature_indices.is_empty() {
        return Err(anyhow!("No feature columns detected in {}", path.display()));
    }

    let mut features = Vec::new();
    let mut labels = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;

        let label = record
            .get(label_idx)
            .ok_or_else(|| anyhow!("Missing label value at row {}", row_idx + 1))?
            .trim()
            .parse::<i32>()
            .with_context(|| format!("Invalid label at row {}", row_idx + 1))?;
        labels.push(label);

        for &idx in &feature_indices {
            let value = record
                .get(idx)
                .ok_or_else(|| anyhow!("Missing feature value at row {}", row_idx + 1))?;
            let parsed = value.trim().parse::<f32>().with_context(|| {
                format!(
                    "Invalid feature '{}' at row {}",
                    headers.get(idx).unwrap_or(""),
                    row_idx + 1
                )
            })?;
            features.push(parsed);
        }
    }

    let n_features = feature_indices.len();
    let sample_shape = match &config.sample_shape {
        Some(shape) => {
            let len: usize = shape.iter().product();
            if len != n_features {
                anyhow::bail!(
                    "Sample shape {:?} holds {} values but {} has {} feature columns",
                    shape,
                    len,
                    path.display(),
                    n_features
                );
            }
            shape.clone()
        }
        None => vec![n_features],
    };

    let samples = SampleArray::new(labels.len(), sample_shape, features)
        .context("Failed to build sample array")?;

    let feature_names = feature_indices
        .iter()
        .map(|&idx| headers.get(idx).unwrap_or("").to_string())
        .collect();

    Ok(SplitData {
        samples,
        labels,
        feature_names,
    })
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
}

fn resolve_feature_indices(
    headers: &StringRecord,
    config: &LoaderConfig,
    label_idx: usize,
) -> Vec<usize> {
    let ignore: HashSet<String> = config
        .ignore_columns
        .iter()
        .map(|name| name.to_ascii_lowercase())
        .collect();

    headers
        .iter()
        .enumerate()
        .filter(|&(idx, header)| {
            idx != label_idx && !ignore.contains(&header.trim().to_ascii_lowercase())
        })
        .map(|(idx, _)| idx)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn reads_tsv_with_label_in_middle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.tsv");
        fs::write(&path, "f0\tlabel\tf1\n0.5\t3\t1.5\n2.0\t7\t-1.0\n").unwrap();

        let split = read_split(&path, &LoaderConfig::default()).unwrap();
        assert_eq!(split.labels, vec![3, 7]);
        assert_eq!(split.feature_names, vec!["f0", "f1"]);
        assert_eq!(split.samples.flatten().row_slice(1), &[2.0, -1.0]);
    }

    #[test]
    fn sample_shape_must_cover_features() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.csv");
        fs::write(&path, "label,a,b,c\n0,1,2,3\n").unwrap();

        let config = LoaderConfig {
            sample_shape: Some(vec![2, 2]),
            ..LoaderConfig::default()
        };
        assert!(read_split(&path, &config).is_err());
    }

    #[test]
    fn invalid_label_reports_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.csv");
        fs::write(&path, "label,a\n1,0.0\nx,1.0\n").unwrap();

        let err = read_split(&path, &LoaderConfig::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid label at row 2"));
    }
}
