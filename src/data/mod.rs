/// Data layer: file discovery, naming, loading, and the skip policy.
///
/// Architecture:
/// ```text
///  <dir>/<experiment>_<node>.csv
///        │
///        ▼
///   ┌──────────┐
///   │ discover  │  glob *.csv → sorted absolute paths
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ ExperimentId  │  file stem → (experiment, node)
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  UploadSchema + CSV rows → UploadDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  fewer than MIN_RECORDS → skip
///   └──────────┘
/// ```

pub mod discover;
pub mod filter;
pub mod loader;
pub mod model;
pub mod schema;
