use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::NameError;

// ---------------------------------------------------------------------------
// UploadRecord – one row of an upload-times CSV
// ---------------------------------------------------------------------------

/// A single upload event: when the item was created and when it arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadRecord {
    pub created: DateTime<Utc>,
    pub received: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// UploadDataset – all records of one file, in file order
// ---------------------------------------------------------------------------

/// The records loaded from one CSV file. Row order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadDataset {
    pub records: Vec<UploadRecord>,
}

impl UploadDataset {
    pub fn from_records(records: Vec<UploadRecord>) -> Self {
        UploadDataset { records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest creation timestamps, `None` when empty.
    pub fn created_bounds(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        bounds(self.records.iter().map(|r| r.created))
    }

    /// Earliest and latest received timestamps, `None` when empty.
    pub fn received_bounds(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        bounds(self.records.iter().map(|r| r.received))
    }
}

fn bounds<I>(mut values: I) -> Option<(DateTime<Utc>, DateTime<Utc>)>
where
    I: Iterator<Item = DateTime<Utc>>,
{
    let first = values.next()?;
    Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

// ---------------------------------------------------------------------------
// ExperimentId – labels decoded from `<experiment>_<node>.csv`
// ---------------------------------------------------------------------------

/// Which experiment and which node produced a CSV file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExperimentId {
    pub experiment: String,
    pub node: String,
}

impl ExperimentId {
    /// Decode the labels from a path such as `/data/expA_node1.csv`.
    ///
    /// The stem must contain exactly one underscore. Either side may be empty.
    pub fn from_path(path: &Path) -> Result<Self, NameError> {
        let stem = path
            .file_stem()
            .ok_or_else(|| NameError::MissingStem(path.to_path_buf()))?
            .to_str()
            .ok_or_else(|| NameError::NotUtf8(path.to_path_buf()))?;
        Self::from_stem(stem)
    }

    /// Decode the labels from a bare stem such as `expA_node1`.
    pub fn from_stem(stem: &str) -> Result<Self, NameError> {
        let mut parts = stem.split('_');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(experiment), Some(node), None) => Ok(ExperimentId {
                experiment: experiment.to_string(),
                node: node.to_string(),
            }),
            _ => Err(NameError::BadStem {
                stem: stem.to_string(),
                underscores: stem.matches('_').count(),
            }),
        }
    }

    /// `experiment_node`, i.e. the original CSV stem.
    pub fn file_stem(&self) -> String {
        format!("{}_{}", self.experiment, self.node)
    }

    /// Name of the PNG written for this file.
    pub fn png_file_name(&self) -> String {
        format!("{}.png", self.file_stem())
    }

    /// Plot title, `"<experiment> on <node>"`.
    pub fn title(&self) -> String {
        format!("{} on {}", self.experiment, self.node)
    }
}

impl fmt::Display for ExperimentId {
    /// Console form: node first, then experiment.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.node, self.experiment)
    }
}
