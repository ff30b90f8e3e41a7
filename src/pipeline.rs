use log::{debug, info};

use crate::data::model::{FeatureVector, IrisDataset};
use crate::encoding::LabelEncoder;
use crate::error::{PredictError, TrainError};
use crate::sdca::{LinearClassifier, SdcaOptions, SdcaTrainer, TrainingSummary};

// ---------------------------------------------------------------------------
// Training pipeline: encode labels → assemble features → fit
// ---------------------------------------------------------------------------

/// Fixed four-stage learning pipeline.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    options: SdcaOptions,
}

impl Pipeline {
    pub fn new(options: SdcaOptions) -> Self {
        Self { options }
    }

    /// Train a model on every sample of `dataset`. Each sample must carry a label.
    pub fn train(&self, dataset: &IrisDataset) -> Result<IrisModel, TrainError> {
        if dataset.is_empty() {
            return Err(TrainError::EmptyDataset);
        }

        let mut labels = Vec::with_capacity(dataset.len());
        for (idx, sample) in dataset.samples.iter().enumerate() {
            let label = sample
                .label
                .as_deref()
                .ok_or(TrainError::MissingLabel { row: idx + 1 })?;
            labels.push(label);
        }

        let encoder = LabelEncoder::fit(labels.iter().copied());
        let targets: Vec<usize> = labels
            .iter()
            .filter_map(|label| encoder.encode(label))
            .collect();
        let features: Vec<FeatureVector> =
            dataset.samples.iter().map(|s| s.features()).collect();

        info!(
            "training on {} samples, classes: {}",
            features.len(),
            encoder.labels().join(", ")
        );

        let (classifier, summary) =
            SdcaTrainer::new(self.options.clone()).fit(&features, &targets, encoder.len())?;

        Ok(IrisModel {
            encoder,
            classifier,
            summary,
        })
    }
}

// ---------------------------------------------------------------------------
// Trained model: classifier + label inverter
// ---------------------------------------------------------------------------

/// A trained classifier together with the table that turns its output back
/// into text labels.
#[derive(Debug, Clone)]
pub struct IrisModel {
    encoder: LabelEncoder,
    classifier: LinearClassifier,
    summary: TrainingSummary,
}

impl IrisModel {
    /// Predicted text label for one feature vector.
    pub fn predict(&self, features: &FeatureVector) -> Result<&str, PredictError> {
        if !features.is_finite() {
            return Err(PredictError::NonFiniteFeature);
        }
        debug!(
            "scores for {features}: {}",
            self.classifier.scores(features)
        );
        let index = self.classifier.predict(features);
        self.encoder
            .decode(index)
            .ok_or(PredictError::UnknownCategory {
                index,
                known: self.encoder.len(),
            })
    }

    /// Fraction of labeled samples in `dataset` the model gets right.
    pub fn accuracy(&self, dataset: &IrisDataset) -> f64 {
        let labeled: Vec<_> = dataset
            .samples
            .iter()
            .filter_map(|s| s.label.as_deref().map(|l| (s.features(), l)))
            .collect();
        if labeled.is_empty() {
            return 0.0;
        }
        let correct = labeled
            .iter()
            .filter(|(x, label)| self.predict(x).is_ok_and(|p| p == *label))
            .count();
        correct as f64 / labeled.len() as f64
    }

    /// Labels ordered by category index.
    pub fn labels(&self) -> &[String] {
        self.encoder.labels()
    }

    pub fn summary(&self) -> &TrainingSummary {
        &self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_reader;

    /// Balanced three-class set in the style of the Iris data, ten rows each.
    const BALANCED: &str = "\
5.1,3.5,1.4,0.2,Iris-setosa
4.9,3.0,1.4,0.2,Iris-setosa
4.7,3.2,1.3,0.2,Iris-setosa
4.6,3.1,1.5,0.2,Iris-setosa
5.0,3.6,1.4,0.2,Iris-setosa
5.4,3.9,1.7,0.4,Iris-setosa
4.6,3.4,1.4,0.3,Iris-setosa
5.0,3.4,1.5,0.2,Iris-setosa
4.4,2.9,1.4,0.2,Iris-setosa
4.9,3.1,1.5,0.1,Iris-setosa
7.0,3.2,4.7,1.4,Iris-versicolor
6.4,3.2,4.5,1.5,Iris-versicolor
6.9,3.1,4.9,1.5,Iris-versicolor
5.5,2.3,4.0,1.3,Iris-versicolor
6.5,2.8,4.6,1.5,Iris-versicolor
5.7,2.8,4.5,1.3,Iris-versicolor
6.3,3.3,4.7,1.6,Iris-versicolor
4.9,2.4,3.3,1.0,Iris-versicolor
6.6,2.9,4.6,1.3,Iris-versicolor
5.2,2.7,3.9,1.4,Iris-versicolor
6.3,3.3,6.0,2.5,Iris-virginica
5.8,2.7,5.1,1.9,Iris-virginica
7.1,3.0,5.9,2.1,Iris-virginica
6.3,2.9,5.6,1.8,Iris-virginica
6.5,3.0,5.8,2.2,Iris-virginica
7.6,3.0,6.6,2.1,Iris-virginica
4.9,2.5,4.5,1.7,Iris-virginica
7.3,2.9,6.3,1.8,Iris-virginica
6.7,2.5,5.8,1.8,Iris-virginica
7.2,3.6,6.1,2.5,Iris-virginica
";

    fn centroid(dataset: &IrisDataset, label: &str) -> FeatureVector {
        let rows: Vec<FeatureVector> = dataset
            .samples
            .iter()
            .filter(|s| s.label.as_deref() == Some(label))
            .map(|s| s.features())
            .collect();
        let mut sum = [0.0f32; 4];
        for x in &rows {
            for (acc, v) in sum.iter_mut().zip(x.0) {
                *acc += v;
            }
        }
        FeatureVector(sum.map(|v| v / rows.len() as f32))
    }

    #[test]
    fn predicts_class_at_its_centroid() {
        let dataset = load_reader(BALANCED.as_bytes(), b',').unwrap();
        let model = Pipeline::default().train(&dataset).unwrap();

        assert_eq!(model.labels(), ["Iris-setosa", "Iris-versicolor", "Iris-virginica"]);
        for label in ["Iris-setosa", "Iris-versicolor", "Iris-virginica"] {
            let x = centroid(&dataset, label);
            assert_eq!(model.predict(&x).unwrap(), label, "centroid {x}");
        }
    }

    #[test]
    fn setosa_is_always_recognised() {
        let dataset = load_reader(BALANCED.as_bytes(), b',').unwrap();
        let model = Pipeline::default().train(&dataset).unwrap();

        assert_eq!(
            model.predict(&FeatureVector([5.1, 3.5, 1.4, 0.2])).unwrap(),
            "Iris-setosa"
        );
        assert!(model.accuracy(&dataset) >= 0.8);
        assert!(model.summary().epochs >= 1);
    }

    #[test]
    fn unlabeled_row_fails_training() {
        let text = "5.1,3.5,1.4,0.2,a\n6.3,3.3,6.0,2.5\n";
        let dataset = load_reader(text.as_bytes(), b',').unwrap();
        let err = Pipeline::default().train(&dataset).unwrap_err();
        assert!(matches!(err, TrainError::MissingLabel { row: 2 }));
    }

    #[test]
    fn single_class_fails_training() {
        let text = "5.1,3.5,1.4,0.2,a\n4.9,3.0,1.4,0.2,a\n";
        let dataset = load_reader(text.as_bytes(), b',').unwrap();
        let err = Pipeline::default().train(&dataset).unwrap_err();
        assert!(matches!(err, TrainError::TooFewClasses { found: 1 }));
    }

    #[test]
    fn empty_dataset_fails_training() {
        let err = Pipeline::default().train(&IrisDataset::default()).unwrap_err();
        assert!(matches!(err, TrainError::EmptyDataset));
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let dataset = load_reader(BALANCED.as_bytes(), b',').unwrap();
        let model = Pipeline::default().train(&dataset).unwrap();
        let err = model.predict(&FeatureVector([f32::NAN, 3.0, 4.0, 1.0])).unwrap_err();
        assert!(matches!(err, PredictError::NonFiniteFeature));
    }
}
