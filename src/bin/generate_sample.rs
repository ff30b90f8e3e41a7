use std::io::Write;

use anyhow::{Context, Result};
use iris_classifier::console::DEFAULT_DATA_FILE;
use iris_classifier::data::model::FEATURE_COUNT;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

const ROWS_PER_CLASS: usize = 50;

/// Per-class mean and standard deviation of each measurement, in centimetres.
struct ClassProfile {
    label: &'static str,
    means: [f64; FEATURE_COUNT],
    std_devs: [f64; FEATURE_COUNT],
}

const PROFILES: [ClassProfile; 3] = [
    ClassProfile {
        label: "Iris-setosa",
        means: [5.006, 3.428, 1.462, 0.246],
        std_devs: [0.352, 0.379, 0.174, 0.105],
    },
    ClassProfile {
        label: "Iris-versicolor",
        means: [5.936, 2.770, 4.260, 1.326],
        std_devs: [0.516, 0.314, 0.470, 0.198],
    },
    ClassProfile {
        label: "Iris-virginica",
        means: [6.588, 2.974, 5.552, 2.026],
        std_devs: [0.636, 0.322, 0.552, 0.275],
    },
];

/// Draw `per_class` rows for every class, classes in file order.
fn generate_rows<R: Rng>(per_class: usize, rng: &mut R) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::with_capacity(per_class * PROFILES.len());

    for profile in &PROFILES {
        let dists = profile
            .means
            .iter()
            .zip(&profile.std_devs)
            .map(|(&mean, &sd)| Normal::new(mean, sd))
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("bad distribution for {}", profile.label))?;

        for _ in 0..per_class {
            let mut row: Vec<String> = dists
                .iter()
                .map(|d| format!("{:.1}", d.sample(&mut *rng).max(0.1)))
                .collect();
            row.push(profile.label.to_string());
            rows.push(row);
        }
    }

    Ok(rows)
}

fn write_rows<W: Write>(out: W, rows: &[Vec<String>]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string());

    let mut rng = StdRng::seed_from_u64(42);
    let rows = generate_rows(ROWS_PER_CLASS, &mut rng)?;

    let file = std::fs::File::create(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    write_rows(file, &rows)?;

    info!("generator seed 42, {ROWS_PER_CLASS} rows per class");
    println!("Wrote {} samples to {output_path}", rows.len());
    Ok(())
}
