use std::fmt;

use serde::Deserialize;

use crate::encoding::LabelEncoder;

/// Number of measurements per sample.
pub const FEATURE_COUNT: usize = 4;

/// Column names in the order they appear in the data file.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] =
    ["Sepal Length", "Sepal Width", "Petal Length", "Petal Width"];

// ---------------------------------------------------------------------------
// FeatureVector – classifier input
// ---------------------------------------------------------------------------

/// The four measurements of a sample, always in
/// `[sepal length, sepal width, petal length, petal width]` order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f32; FEATURE_COUNT]);

impl FeatureVector {
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "[{a}, {b}, {c}, {d}]")
    }
}

// ---------------------------------------------------------------------------
// IrisSample – one row of the data file
// ---------------------------------------------------------------------------

/// A single flower measurement. `label` is only set for training rows.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IrisSample {
    pub sepal_length: f32,
    pub sepal_width: f32,
    pub petal_length: f32,
    pub petal_width: f32,
    #[serde(default)]
    pub label: Option<String>,
}

impl IrisSample {
    /// An unlabeled sample, as read at the prediction prompts.
    pub fn unlabeled(features: FeatureVector) -> Self {
        let [sepal_length, sepal_width, petal_length, petal_width] = features.0;
        IrisSample {
            sepal_length,
            sepal_width,
            petal_length,
            petal_width,
            label: None,
        }
    }

    /// Concatenate the measurements into the classifier's feature vector.
    /// The label never takes part.
    pub fn features(&self) -> FeatureVector {
        FeatureVector([
            self.sepal_length,
            self.sepal_width,
            self.petal_length,
            self.petal_width,
        ])
    }
}

// ---------------------------------------------------------------------------
// IrisDataset – the complete loaded file
// ---------------------------------------------------------------------------

/// All loaded samples with the distinct labels in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct IrisDataset {
    pub samples: Vec<IrisSample>,
    pub labels: Vec<String>,
}

impl IrisDataset {
    /// Collect the label column from the loaded samples, in the order the
    /// label encoder assigns category indices.
    pub fn from_samples(samples: Vec<IrisSample>) -> Self {
        let labels = LabelEncoder::fit(samples.iter().filter_map(|s| s.label.as_deref()))
            .labels()
            .to_vec();
        IrisDataset { samples, labels }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(values: [f32; 4], label: &str) -> IrisSample {
        IrisSample {
            label: Some(label.to_string()),
            ..IrisSample::unlabeled(FeatureVector(values))
        }
    }

    #[test]
    fn features_keep_column_order() {
        let s = sample([5.1, 3.5, 1.4, 0.2], "setosa");
        assert_eq!(s.features(), FeatureVector([5.1, 3.5, 1.4, 0.2]));
    }

    #[test]
    fn features_ignore_label() {
        let a = sample([6.3, 2.5, 5.0, 1.9], "virginica");
        let mut b = a.clone();
        b.label = None;
        assert_eq!(a.features(), b.features());
    }

    #[test]
    fn labels_are_collected_in_first_seen_order() {
        let ds = IrisDataset::from_samples(vec![
            sample([1.0; 4], "b"),
            sample([1.0; 4], "a"),
            sample([1.0; 4], "b"),
            sample([1.0; 4], "c"),
        ]);
        assert_eq!(ds.labels, vec!["b", "a", "c"]);
        assert_eq!(ds.len(), 4);
    }

    #[test]
    fn dataset_labels_match_encoder_indices() {
        let ds = IrisDataset::from_samples(vec![
            sample([1.0; 4], "virginica"),
            IrisSample::unlabeled(FeatureVector([2.0; 4])),
            sample([1.0; 4], "setosa"),
            sample([1.0; 4], "virginica"),
        ]);
        let enc = LabelEncoder::fit(ds.samples.iter().filter_map(|s| s.label.as_deref()));
        for (idx, label) in ds.labels.iter().enumerate() {
            assert_eq!(enc.encode(label), Some(idx));
        }
        assert_eq!(ds.labels, enc.labels());
    }

    #[test]
    fn non_finite_features_are_detected() {
        assert!(FeatureVector([1.0, 2.0, 3.0, 4.0]).is_finite());
        assert!(!FeatureVector([1.0, f32::NAN, 3.0, 4.0]).is_finite());
    }
}
