//! Linear multi-class classifier trained with stochastic dual coordinate ascent.
//!
//! The primal problem is an L2-regularised multi-class logistic loss over
//! score differences:
//!
//! ```text
//! P(W) = λ/2 · Σ_c ‖w_c‖² + 1/n · Σ_i Σ_{c≠y_i} log(1 + exp(-(w_{y_i} - w_c)·x_i))
//! ```
//!
//! Each (row, wrong class) pair owns one dual variable in `[0, 1]`. Visiting a
//! pair moves `w_{y_i}` and `w_c` in opposite directions along `x_i`, so the
//! dual stays feasible and `W` is always the image of the current duals.

use log::{debug, info};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::data::model::{FEATURE_COUNT, FeatureVector};
use crate::error::TrainError;

/// Width of the augmented input: the measurements plus a constant bias term.
const INPUT_WIDTH: usize = FEATURE_COUNT + 1;

const DUAL_EPS: f64 = 1e-12;
const NEWTON_TOLERANCE: f64 = 1e-10;
const NEWTON_MAX_STEPS: usize = 50;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Trainer settings. The defaults are what the console program uses.
#[derive(Debug, Clone, PartialEq)]
pub struct SdcaOptions {
    /// L2 regularisation strength λ. `None` picks `max(1e-6, 1/n)`.
    pub l2_regularization: Option<f64>,
    /// Stop once the duality gap relative to the primal objective is below this.
    pub convergence_tolerance: f64,
    pub max_epochs: usize,
    /// Visit rows in a fresh random order every epoch.
    pub shuffle: bool,
    pub seed: u64,
}

impl Default for SdcaOptions {
    fn default() -> Self {
        Self {
            l2_regularization: None,
            convergence_tolerance: 0.01,
            max_epochs: 1000,
            shuffle: true,
            seed: 42,
        }
    }
}

impl SdcaOptions {
    pub fn with_l2_regularization(mut self, lambda: f64) -> Self {
        self.l2_regularization = Some(lambda);
        self
    }

    pub fn with_max_epochs(mut self, max_epochs: usize) -> Self {
        self.max_epochs = max_epochs;
        self
    }

    pub fn with_convergence_tolerance(mut self, tolerance: f64) -> Self {
        self.convergence_tolerance = tolerance;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

// ---------------------------------------------------------------------------
// Trained classifier
// ---------------------------------------------------------------------------

/// One weight vector (measurements + bias) per category.
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    weights: Array2<f64>,
}

impl LinearClassifier {
    pub fn n_classes(&self) -> usize {
        self.weights.nrows()
    }

    /// Weight matrix, one row per category, bias in the last column.
    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    /// Raw linear score of every category.
    pub fn scores(&self, features: &FeatureVector) -> Array1<f64> {
        self.weights.dot(&augment(features))
    }

    /// Index of the highest scoring category. Ties go to the lower index.
    pub fn predict(&self, features: &FeatureVector) -> usize {
        argmax(self.scores(features).view())
    }
}

/// What happened during a training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSummary {
    pub epochs: usize,
    pub l2_regularization: f64,
    pub primal: f64,
    pub dual: f64,
    pub converged: bool,
}

impl TrainingSummary {
    pub fn duality_gap(&self) -> f64 {
        self.primal - self.dual
    }
}

// ---------------------------------------------------------------------------
// Trainer
// ---------------------------------------------------------------------------

pub struct SdcaTrainer {
    options: SdcaOptions,
}

impl SdcaTrainer {
    pub fn new(options: SdcaOptions) -> Self {
        Self { options }
    }

    /// Fit one weight vector per class.
    ///
    /// # Arguments
    /// * `features` - One feature vector per training row.
    /// * `targets` - Category index of each row, below `n_classes`.
    /// * `n_classes` - Number of categories, at least two.
    pub fn fit(
        &self,
        features: &[FeatureVector],
        targets: &[usize],
        n_classes: usize,
    ) -> Result<(LinearClassifier, TrainingSummary), TrainError> {
        let n = features.len();
        if n == 0 {
            return Err(TrainError::EmptyDataset);
        }
        if targets.len() != n {
            return Err(TrainError::SizeMismatch {
                rows: n,
                targets: targets.len(),
            });
        }
        if n_classes < 2 {
            return Err(TrainError::TooFewClasses { found: n_classes });
        }
        for (row, (x, &target)) in features.iter().zip(targets).enumerate() {
            if !x.is_finite() {
                return Err(TrainError::NonFiniteFeature { row: row + 1 });
            }
            if target >= n_classes {
                return Err(TrainError::TargetOutOfRange {
                    row: row + 1,
                    target,
                    classes: n_classes,
                });
            }
        }

        let lambda = self
            .options
            .l2_regularization
            .unwrap_or_else(|| (1.0 / n as f64).max(1e-6));
        let scale = 1.0 / (lambda * n as f64);

        let inputs = Array2::from_shape_fn((n, INPUT_WIDTH), |(i, j)| {
            features[i].0.get(j).map_or(1.0, |&v| f64::from(v))
        });
        let sq_norms = inputs.map_axis(Axis(1), |row| row.dot(&row));

        let mut weights = Array2::<f64>::zeros((n_classes, INPUT_WIDTH));
        let mut duals = Array2::<f64>::zeros((n, n_classes));

        let mut order: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(self.options.seed);

        let mut summary = TrainingSummary {
            epochs: 0,
            l2_regularization: lambda,
            primal: f64::INFINITY,
            dual: 0.0,
            converged: false,
        };

        for epoch in 1..=self.options.max_epochs {
            if self.options.shuffle {
                order.shuffle(&mut rng);
            }

            for &i in &order {
                let y = targets[i];
                let x = inputs.row(i);
                // ‖e_y ⊗ x − e_c ⊗ x‖² / (λn)
                let curvature = 2.0 * sq_norms[i] * scale;

                for c in (0..n_classes).filter(|&c| c != y) {
                    let margin = weights.row(y).dot(&x) - weights.row(c).dot(&x);
                    let alpha = duals[[i, c]];
                    let updated = solve_dual_step(alpha, margin, curvature);
                    let delta = updated - alpha;
                    if delta == 0.0 {
                        continue;
                    }
                    duals[[i, c]] = updated;
                    let step = delta * scale;
                    weights.row_mut(y).scaled_add(step, &x);
                    weights.row_mut(c).scaled_add(-step, &x);
                }
            }

            if weights.iter().any(|w| !w.is_finite()) {
                return Err(TrainError::Diverged { epoch });
            }

            let (primal, dual) = objectives(&weights, &duals, &inputs, targets, lambda);
            let relative_gap = (primal - dual) / primal.abs().max(f64::MIN_POSITIVE);
            debug!("epoch {epoch}: primal {primal:.6}, dual {dual:.6}, relative gap {relative_gap:.6}");

            summary.epochs = epoch;
            summary.primal = primal;
            summary.dual = dual;

            if relative_gap <= self.options.convergence_tolerance {
                summary.converged = true;
                break;
            }
        }

        info!(
            "sdca finished after {} epochs (λ = {:.3e}, gap = {:.3e}, converged = {})",
            summary.epochs,
            summary.l2_regularization,
            summary.duality_gap(),
            summary.converged
        );

        Ok((LinearClassifier { weights }, summary))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn augment(features: &FeatureVector) -> Array1<f64> {
    features
        .0
        .iter()
        .map(|&v| f64::from(v))
        .chain(std::iter::once(1.0))
        .collect()
}

fn argmax(scores: ArrayView1<f64>) -> usize {
    let mut best = 0;
    for (i, &s) in scores.iter().enumerate() {
        if s > scores[best] {
            best = i;
        }
    }
    best
}

/// `log(1 + exp(-margin))` without overflow.
fn log_loss(margin: f64) -> f64 {
    let z = -margin;
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}

/// Binary entropy, the negated conjugate of the log loss. `0 · ln 0 = 0`.
fn entropy(a: f64) -> f64 {
    let term = |p: f64| if p > 0.0 { p * p.ln() } else { 0.0 };
    -(term(a) + term(1.0 - a))
}

/// Maximise the dual along one coordinate.
///
/// Finds the root in `(0, 1)` of
/// `ln((1 − a)/a) − margin − curvature · (a − alpha)`,
/// which is strictly decreasing, with Newton steps kept inside a shrinking
/// bracket and bisection when a step leaves it.
fn solve_dual_step(alpha: f64, margin: f64, curvature: f64) -> f64 {
    let g = |a: f64| ((1.0 - a) / a).ln() - margin - curvature * (a - alpha);

    let mut lo = DUAL_EPS;
    let mut hi = 1.0 - DUAL_EPS;
    // Exact when curvature is zero.
    let mut a = (1.0 / (1.0 + margin.exp())).clamp(lo, hi);

    for _ in 0..NEWTON_MAX_STEPS {
        let value = g(a);
        if value.abs() < NEWTON_TOLERANCE {
            break;
        }
        if value > 0.0 {
            lo = a;
        } else {
            hi = a;
        }
        let slope = -1.0 / a - 1.0 / (1.0 - a) - curvature;
        let next = a - value / slope;
        a = if next > lo && next < hi {
            next
        } else {
            0.5 * (lo + hi)
        };
    }
    a
}

/// Primal and dual objective values at the current iterate.
fn objectives(
    weights: &Array2<f64>,
    duals: &Array2<f64>,
    inputs: &Array2<f64>,
    targets: &[usize],
    lambda: f64,
) -> (f64, f64) {
    let n = inputs.nrows() as f64;
    let regularizer = 0.5 * lambda * weights.iter().map(|w| w * w).sum::<f64>();

    let mut loss = 0.0;
    let mut dual_sum = 0.0;
    for (i, x) in inputs.outer_iter().enumerate() {
        let y = targets[i];
        let scores = weights.dot(&x);
        for c in (0..weights.nrows()).filter(|&c| c != y) {
            loss += log_loss(scores[y] - scores[c]);
            dual_sum += entropy(duals[[i, c]]);
        }
    }

    (regularizer + loss / n, dual_sum / n - regularizer)
}
