use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// A file name that does not follow `<experiment>_<node>.csv`.
#[derive(Debug, Error)]
pub enum NameError {
    #[error("{} has no file stem", .0.display())]
    MissingStem(PathBuf),

    #[error("{} is not valid UTF-8", .0.display())]
    NotUtf8(PathBuf),

    #[error("file stem '{stem}' must contain exactly one '_' (found {underscores})")]
    BadStem { stem: String, underscores: usize },
}

#[derive(Debug, Error)]
pub enum DiscoverError {
    #[error("cannot resolve {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input directory {} is not valid UTF-8", .0.display())]
    NotUtf8(PathBuf),

    #[error("bad glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("cannot read directory entry: {0}")]
    Entry(#[from] glob::GlobError),
}

/// A single CSV field that could not be converted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("'{0}' is not an integer")]
    NotInteger(String),

    #[error("{0} seconds is outside the supported timestamp range")]
    OutOfRange(i64),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} line {line}: expected {expected} columns, found {found}", .path.display())]
    ColumnCount {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("{} line {line}, column '{column}': {source}", .path.display())]
    Field {
        path: PathBuf,
        line: u64,
        column: &'static str,
        #[source]
        source: FieldError,
    },
}

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("font registration failed: {0}")]
    Font(String),

    #[error("cannot create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("rendering {} failed: {message}", .path.display())]
    Render { path: PathBuf, message: String },

    #[error("nothing to plot for {0}")]
    Empty(String),

    #[error("{stem}: timestamp {value} is outside the plottable years 0000-9999")]
    OutOfRange { stem: String, value: DateTime<Utc> },
}

/// Everything that can go wrong while processing one CSV file.
#[derive(Debug, Error)]
pub enum FileError {
    #[error(transparent)]
    Name(#[from] NameError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Plot(#[from] PlotError),
}
