use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use log::info;

use super::model::{FEATURE_COUNT, FEATURE_NAMES, IrisDataset, IrisSample};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an Iris dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json` – `[{ "sepal_length": 5.1, ..., "label": "Iris-setosa" }, ...]`
/// * anything else – delimited text, one sample per line, no header
pub fn load_file(path: &Path, separator: u8) -> Result<IrisDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "json" => load_json(path),
        _ => {
            let file = File::open(path)
                .with_context(|| format!("opening data file '{}'", path.display()))?;
            load_reader(file, separator)
                .with_context(|| format!("reading data file '{}'", path.display()))
        }
    }?;

    info!(
        "loaded {} samples with {} labels from {}",
        dataset.len(),
        dataset.labels.len(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Text layout: no header, fields in fixed order
///   `sepal length, sepal width, petal length, petal width, label`
/// Blank lines are skipped. The label may be missing on inference-only rows.
pub fn load_reader<R: Read>(reader: R, separator: u8) -> Result<IrisDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(separator)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut samples = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("record {}", idx + 1))?;
        // Blank lines are skipped, so report the file line.
        let line = record.position().map_or(idx as u64 + 1, |p| p.line());

        if record.len() < FEATURE_COUNT || record.len() > FEATURE_COUNT + 1 {
            bail!(
                "line {line}: expected {} fields but found {}",
                FEATURE_COUNT + 1,
                record.len()
            );
        }

        let mut values = [0.0f32; FEATURE_COUNT];
        for (col, value) in values.iter_mut().enumerate() {
            *value = parse_feature(record.get(col).unwrap_or(""), line, col)?;
        }
        let [sepal_length, sepal_width, petal_length, petal_width] = values;

        let label = record
            .get(FEATURE_COUNT)
            .filter(|l| !l.is_empty())
            .map(str::to_string);

        samples.push(IrisSample {
            sepal_length,
            sepal_width,
            petal_length,
            petal_width,
            label,
        });
    }

    Ok(IrisDataset::from_samples(samples))
}

fn parse_feature(s: &str, line: u64, col: usize) -> Result<f32> {
    s.parse::<f32>()
        .with_context(|| format!("line {line}, {}: '{s}' is not a number", FEATURE_NAMES[col]))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   {
///     "sepal_length": 5.1,
///     "sepal_width": 3.5,
///     "petal_length": 1.4,
///     "petal_width": 0.2,
///     "label": "Iris-setosa"
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<IrisDataset> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading JSON file '{}'", path.display()))?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<IrisDataset> {
    let samples: Vec<IrisSample> = serde_json::from_str(text).context("parsing JSON samples")?;
    Ok(IrisDataset::from_samples(samples))
}
