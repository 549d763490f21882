use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;

use crate::config::Config;
use crate::data::discover::discover_csv_files;
use crate::data::filter::should_plot;
use crate::data::loader::load_uploads;
use crate::data::model::ExperimentId;
use crate::data::schema::UploadSchema;
use crate::error::{FileError, PlotError};
use crate::plot::render_scatter;

// ---------------------------------------------------------------------------
// Per-file outcome
// ---------------------------------------------------------------------------

/// How a single CSV file ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Plotted { output: PathBuf, records: usize },
    Skipped { records: usize },
}

impl FileOutcome {
    pub fn status(&self) -> Status {
        match self {
            FileOutcome::Plotted { .. } => Status::Plotted,
            FileOutcome::Skipped { .. } => Status::Skipped,
        }
    }
}

/// The word printed after `<node> <experiment>` on the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Plotted,
    Skipped,
    Failed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Plotted => "plotted",
            Status::Skipped => "skipped",
            Status::Failed => "failed",
        })
    }
}

// ---------------------------------------------------------------------------
// Run summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFile {
    pub file: String,
    pub error: String,
}

/// File stems grouped by outcome, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub plotted: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<FailedFile>,
}

impl BatchSummary {
    fn record(&mut self, id: &ExperimentId, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Plotted { .. } => self.plotted.push(id.file_stem()),
            FileOutcome::Skipped { .. } => self.skipped.push(id.file_stem()),
        }
    }

    pub fn total(&self) -> usize {
        self.plotted.len() + self.skipped.len() + self.failed.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Write the summary as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("serializing run summary")?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))
    }
}

// ---------------------------------------------------------------------------
// Console status lines
// ---------------------------------------------------------------------------

/// Writes `<node> <experiment>` as soon as a file starts, then the status
/// word once it is known, on the same line.
pub struct Console<W: Write> {
    out: W,
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Console { out }
    }

    /// Print the label and flush, so it shows before a slow load or render.
    pub fn begin(&mut self, label: impl fmt::Display) -> io::Result<()> {
        write!(self.out, "{label}")?;
        self.out.flush()
    }

    pub fn finish(&mut self, status: Status) -> io::Result<()> {
        writeln!(self.out, " {status}")?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

// ---------------------------------------------------------------------------
// Batch driver
// ---------------------------------------------------------------------------

/// Plot every CSV in `config.input_dir`, reporting progress on `out`.
///
/// Without `keep_going` the first bad file aborts the run with its error.
/// With it, the file is reported as failed and the batch moves on.
pub fn run_batch<W: Write>(config: &Config, out: W) -> Result<BatchSummary> {
    let files = discover_csv_files(&config.input_dir)
        .with_context(|| format!("listing CSV files in {}", config.input_dir.display()))?;
    info!(
        "{} CSV files in {}, plots go to {}",
        files.len(),
        config.input_dir.display(),
        config.output_dir.display()
    );

    let schema = UploadSchema::default();
    let mut console = Console::new(out);
    let mut summary = BatchSummary::default();

    for path in &files {
        let id = match ExperimentId::from_path(path) {
            Ok(id) => id,
            Err(e) => {
                let label = path.file_name().map(|n| n.to_string_lossy().into_owned());
                console.begin(label.as_deref().unwrap_or("?"))?;
                console.finish(Status::Failed)?;
                fail(config, &mut summary, path, e.into())?;
                continue;
            }
        };

        console.begin(&id)?;
        match plot_file(path, &id, config, &schema) {
            Ok(outcome) => {
                console.finish(outcome.status())?;
                info!("{}: {} ({:?})", id.file_stem(), outcome.status(), outcome);
                summary.record(&id, &outcome);
            }
            Err(e) => {
                console.finish(Status::Failed)?;
                fail(config, &mut summary, path, e)?;
            }
        }
    }

    info!(
        "done: {} plotted, {} skipped, {} failed",
        summary.plotted.len(),
        summary.skipped.len(),
        summary.failed.len()
    );
    if let Some(path) = &config.summary_json {
        summary.write_json(path)?;
    }
    Ok(summary)
}

/// Load, filter and (maybe) render one file.
pub fn plot_file(
    path: &Path,
    id: &ExperimentId,
    config: &Config,
    schema: &UploadSchema,
) -> Result<FileOutcome, FileError> {
    let dataset = load_uploads(path, schema)?;
    let records = dataset.len();
    if !should_plot(&dataset) {
        return Ok(FileOutcome::Skipped { records });
    }

    fs::create_dir_all(&config.output_dir).map_err(|source| PlotError::OutputDir {
        path: config.output_dir.clone(),
        source,
    })?;
    let output = config.output_dir.join(id.png_file_name());
    render_scatter(&dataset, id, &output, &config.style)?;
    Ok(FileOutcome::Plotted { output, records })
}

fn fail(config: &Config, summary: &mut BatchSummary, path: &Path, err: FileError) -> Result<()> {
    if !config.keep_going {
        return Err(anyhow::Error::new(err).context(format!("processing {}", path.display())));
    }
    warn!("{}: {err}", path.display());
    summary.failed.push(FailedFile {
        file: path.display().to_string(),
        error: err.to_string(),
    });
    Ok(())
}
