use chrono::{DateTime, TimeZone, Utc};

use crate::error::FieldError;

/// Converts one raw CSV field into a timestamp.
pub type FieldParser = fn(&str) -> Result<DateTime<Utc>, FieldError>;

// ---------------------------------------------------------------------------
// ColumnSpec – positional column → field binding
// ---------------------------------------------------------------------------

/// Binds a positional CSV column to a named record field.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    /// Zero-based column position.
    pub index: usize,
    /// Field name used in error messages.
    pub name: &'static str,
    pub parser: FieldParser,
}

impl ColumnSpec {
    pub fn parse(&self, raw: &str) -> Result<DateTime<Utc>, FieldError> {
        (self.parser)(raw)
    }
}

// ---------------------------------------------------------------------------
// UploadSchema – the headerless two-column layout
// ---------------------------------------------------------------------------

/// Layout of an upload-times CSV. Files have no header row, so columns are
/// bound by position only.
#[derive(Debug, Clone, Copy)]
pub struct UploadSchema {
    pub created: ColumnSpec,
    pub received: ColumnSpec,
}

impl UploadSchema {
    /// Number of columns every row must have.
    pub fn width(&self) -> usize {
        self.created.index.max(self.received.index) + 1
    }

    pub fn columns(&self) -> [&ColumnSpec; 2] {
        [&self.created, &self.received]
    }
}

impl Default for UploadSchema {
    /// `created,received` as epoch seconds, UTC.
    fn default() -> Self {
        UploadSchema {
            created: ColumnSpec {
                index: 0,
                name: "created",
                parser: parse_epoch_seconds,
            },
            received: ColumnSpec {
                index: 1,
                name: "received",
                parser: parse_epoch_seconds,
            },
        }
    }
}

/// Parse an integer count of seconds since the Unix epoch into UTC.
pub fn parse_epoch_seconds(raw: &str) -> Result<DateTime<Utc>, FieldError> {
    let secs: i64 = raw
        .trim()
        .parse()
        .map_err(|_| FieldError::NotInteger(raw.to_string()))?;
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or(FieldError::OutOfRange(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_the_epoch() {
        let ts = parse_epoch_seconds("0").unwrap();
        assert_eq!(ts.to_rfc3339(), "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn parses_a_real_upload_time() {
        let ts = parse_epoch_seconds(" 1000000000 ").unwrap();
        assert_eq!(ts.to_rfc3339(), "2001-09-09T01:46:40+00:00");
    }

    #[test]
    fn rejects_fractional_seconds() {
        assert_eq!(
            parse_epoch_seconds("12.5"),
            Err(FieldError::NotInteger("12.5".to_string()))
        );
    }

    #[test]
    fn rejects_values_past_chrono_range() {
        assert_eq!(
            parse_epoch_seconds(&i64::MAX.to_string()),
            Err(FieldError::OutOfRange(i64::MAX))
        );
    }

    #[test]
    fn default_schema_is_two_columns() {
        let schema = UploadSchema::default();
        assert_eq!(schema.width(), 2);
        let names: Vec<_> = schema.columns().iter().map(|c| c.name).collect();
        assert_eq!(names, ["created", "received"]);
    }
}
