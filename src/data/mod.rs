/// Data layer: sample types and loading.
///
/// Architecture:
/// ```text
///  iris-data.txt / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse rows → IrisDataset
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ IrisDataset  │  Vec<IrisSample>, labels in first-seen order
///   └─────────────┘
///        │
///        ▼
///   IrisSample::features() → FeatureVector
/// ```

pub mod loader;
pub mod model;
