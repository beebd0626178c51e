use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use runagg_core::errors::{AggError, ErrorInfo};
use runagg_core::{ReplicateSummary, Schema, TimeSeriesEntry};

const DELIMITER: char = ',';
const CONTAINER_MARKER: char = '[';

/// Quotes a value when it opens a container literal or would otherwise break
/// the row apart.
pub fn encode_field(value: &str) -> Cow<'_, str> {
    let needs_quotes = value.starts_with(CONTAINER_MARKER)
        || value.contains(DELIMITER)
        || value.contains('"')
        || value.contains('\n')
        || value.contains('\r');
    if needs_quotes {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Time-series table appended to once per replicate.
///
/// The file is reopened for every batch and closed before `append` returns,
/// so rows already written survive a later fatal error.
#[derive(Debug)]
pub struct TimeSeriesSink {
    path: PathBuf,
    header_written: bool,
    rows_written: usize,
}

impl TimeSeriesSink {
    /// Creates (or truncates) the table at `path`.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, AggError> {
        let path = path.into();
        File::create(&path).map_err(|err| io_error("writer.ts_create", &path, err))?;
        Ok(Self {
            path,
            header_written: false,
            rows_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Appends one replicate's entries, writing `header` first if the table
    /// is still empty.
    pub fn append(&mut self, header: &Schema, entries: &[TimeSeriesEntry]) -> Result<(), AggError> {
        if entries.is_empty() {
            return Ok(());
        }
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|err| io_error("writer.ts_open", &self.path, err))?;
        let mut out = BufWriter::new(file);
        if !self.header_written {
            write_row(&mut out, header.columns().iter().map(String::as_str))
                .map_err(|err| io_error("writer.ts_header", &self.path, err))?;
            self.header_written = true;
        }
        for entry in entries {
            let values = header
                .columns()
                .iter()
                .map(|column| entry.fields.get(column).map_or("", String::as_str));
            write_row(&mut out, values).map_err(|err| io_error("writer.ts_row", &self.path, err))?;
        }
        out.flush()
            .map_err(|err| io_error("writer.ts_flush", &self.path, err))?;
        self.rows_written += entries.len();
        Ok(())
    }
}

/// Writes the summary table in one pass. With no header nothing contributed
/// and an empty file is written.
pub fn write_summary(
    path: &Path,
    header: Option<&Schema>,
    rows: &[ReplicateSummary],
) -> Result<(), AggError> {
    let file = File::create(path).map_err(|err| io_error("writer.summary_create", path, err))?;
    let mut out = BufWriter::new(file);
    if let Some(header) = header {
        write_row(&mut out, header.columns().iter().map(String::as_str))
            .map_err(|err| io_error("writer.summary_header", path, err))?;
        for row in rows {
            let values = header
                .columns()
                .iter()
                .map(|column| row.fields.get(column).map_or("", String::as_str));
            write_row(&mut out, values).map_err(|err| io_error("writer.summary_row", path, err))?;
        }
    }
    out.flush()
        .map_err(|err| io_error("writer.summary_flush", path, err))
}

/// Writes incomplete replicate identifiers one per line in sorted order.
pub fn write_incomplete(path: &Path, replicates: &BTreeSet<String>) -> Result<(), AggError> {
    let mut text = String::new();
    for replicate in replicates {
        text.push_str(replicate);
        text.push('\n');
    }
    fs::write(path, text).map_err(|err| io_error("writer.incomplete", path, err))
}

fn write_row<'a, W, I>(out: &mut W, values: I) -> std::io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a str>,
{
    for (idx, value) in values.into_iter().enumerate() {
        if idx > 0 {
            write!(out, "{DELIMITER}")?;
        }
        write!(out, "{}", encode_field(value))?;
    }
    writeln!(out)
}

pub(crate) fn io_error(code: &str, path: &Path, err: std::io::Error) -> AggError {
    AggError::Io(
        ErrorInfo::new(code, "failed to write aggregate output")
            .with_context("path", path.display().to_string())
            .with_hint(err.to_string()),
    )
}
