use thiserror::Error;

/// Failures while turning a dataset into a trained model.
#[derive(Debug, Error)]
pub enum TrainError {
    #[error("the training set is empty")]
    EmptyDataset,
    #[error("training needs at least two distinct labels, found {found}")]
    TooFewClasses { found: usize },
    #[error("row {row} has no label")]
    MissingLabel { row: usize },
    #[error("row {row} has a non-finite feature value")]
    NonFiniteFeature { row: usize },
    #[error("there's a size mismatch between features and targets, got {targets} targets for {rows} rows")]
    SizeMismatch { rows: usize, targets: usize },
    #[error("row {row} has target {target}, expected less than {classes}")]
    TargetOutOfRange {
        row: usize,
        target: usize,
        classes: usize,
    },
    #[error("training diverged at epoch {epoch}")]
    Diverged { epoch: usize },
}

/// Failures while mapping a trained model's output back to a label.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("input has a non-finite feature value")]
    NonFiniteFeature,
    #[error("predicted category {index} has no label, the model knows {known}")]
    UnknownCategory { index: usize, known: usize },
}
