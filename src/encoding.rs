use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Label encoding: text label ↔ category index
// ---------------------------------------------------------------------------

/// Maps each distinct text label to a category index, in order of first
/// appearance. Built once from the training labels and never changed.
#[derive(Debug, Clone, Default)]
pub struct LabelEncoder {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelEncoder {
    /// Scan `labels` and assign indices `0..n` in first-seen order.
    pub fn fit<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut encoder = LabelEncoder::default();
        for label in labels {
            if !encoder.index.contains_key(label) {
                encoder.index.insert(label.to_string(), encoder.labels.len());
                encoder.labels.push(label.to_string());
            }
        }
        encoder
    }

    pub fn encode(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn decode(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels ordered by category index.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}
