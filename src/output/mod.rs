//! Record serialization.
//!
//! [`RecordWriter`] writes records one at a time so rows reach the file as
//! soon as they are extracted; a traversal that fails midway leaves every
//! earlier row in place.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::models::{Record, RECORD_FIELDS};

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated values with a header row
    #[default]
    Tsv,
    /// One JSON object per line
    Jsonl,
}

impl OutputFormat {
    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Tsv => "tsv",
            OutputFormat::Jsonl => "jsonl",
        }
    }
}

/// Errors that can occur while writing records
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TSV error: {0}")]
    Tsv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Incremental writer for a sequence of records
pub enum RecordWriter<W: Write> {
    Tsv(csv::Writer<W>),
    Jsonl(W),
}

impl RecordWriter<BufWriter<File>> {
    /// Create (or truncate) `path` and write the header if the format has one
    pub fn create(path: &Path, format: OutputFormat) -> Result<Self, OutputError> {
        let file = BufWriter::new(File::create(path)?);
        Self::new(file, format)
    }
}

impl<W: Write> RecordWriter<W> {
    pub fn new(writer: W, format: OutputFormat) -> Result<Self, OutputError> {
        match format {
            OutputFormat::Tsv => {
                let mut tsv = csv::WriterBuilder::new()
                    .delimiter(b'\t')
                    .from_writer(writer);
                tsv.write_record(RECORD_FIELDS)?;
                Ok(RecordWriter::Tsv(tsv))
            }
            OutputFormat::Jsonl => Ok(RecordWriter::Jsonl(writer)),
        }
    }

    /// Append one record and flush it through
    pub fn write(&mut self, record: &Record) -> Result<(), OutputError> {
        match self {
            RecordWriter::Tsv(tsv) => {
                tsv.write_record(record.to_row())?;
                tsv.flush()?;
            }
            RecordWriter::Jsonl(out) => {
                serde_json::to_writer(&mut *out, record)?;
                out.write_all(b"\n")?;
                out.flush()?;
            }
        }
        Ok(())
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(self) -> Result<W, OutputError> {
        match self {
            RecordWriter::Tsv(tsv) => tsv
                .into_inner()
                .map_err(|e| OutputError::Io(e.into_error())),
            RecordWriter::Jsonl(mut out) => {
                out.flush()?;
                Ok(out)
            }
        }
    }
}
