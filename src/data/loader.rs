use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use log::debug;

use super::model::{UploadDataset, UploadRecord};
use super::schema::{ColumnSpec, UploadSchema};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an upload-times CSV.
///
/// Layout, one upload per line, no header:
///
/// ```text
/// 1000000000,1000000005
/// 1000000001,1000000006
/// ```
///
/// Columns are bound to record fields through `schema`. Blank lines and
/// lines starting with `#` are ignored and fields are trimmed; any other
/// irregularity is an error.
pub fn load_uploads(path: &Path, schema: &UploadSchema) -> Result<UploadDataset, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = read_uploads(file, path, schema)?;
    debug!("{}: {} records", path.display(), dataset.len());
    Ok(dataset)
}

/// Same as [`load_uploads`] but over any reader. `path` is only used in errors.
pub fn read_uploads<R: Read>(
    reader: R,
    path: &Path,
    schema: &UploadSchema,
) -> Result<UploadDataset, LoadError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let expected = schema.width();
    let mut records = Vec::new();

    for result in reader.records() {
        let row = result.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);

        if row.len() != expected {
            return Err(LoadError::ColumnCount {
                path: path.to_path_buf(),
                line,
                expected,
                found: row.len(),
            });
        }

        let field = |spec: &ColumnSpec| {
            // Width check above guarantees the index is present.
            let raw = row.get(spec.index).unwrap_or_default();
            spec.parse(raw).map_err(|source| LoadError::Field {
                path: path.to_path_buf(),
                line,
                column: spec.name,
                source,
            })
        };

        records.push(UploadRecord {
            created: field(&schema.created)?,
            received: field(&schema.received)?,
        });
    }

    Ok(UploadDataset::from_records(records))
}
