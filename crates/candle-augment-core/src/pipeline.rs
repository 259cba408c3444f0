use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::config::AugmentConfig;
use crate::errors::{AugmentError, Result};
use crate::model::{DerivedColumn, HeaderIndex, Row};
use crate::schema::{OutputColumn, OutputSchema, CLOSE_COLUMN, TIMESTAMP_COLUMN};
use crate::transform::RowTransformer;

/// State carried from one row to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarriedState {
    pub previous_close: Option<String>,
    pub row_index: u64,
}

impl CarriedState {
    /// Moves past a row. An empty close keeps the last known one.
    pub fn advance(&mut self, close: &str) {
        self.row_index += 1;
        if !close.is_empty() {
            self.previous_close = Some(close.to_string());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugmentSummary {
    pub rows: u64,
    pub columns: Vec<String>,
}

/// Stream `input` through the row transformer into `output`.
///
/// The header is read and validated before anything is written. Rows are
/// processed one at a time through a single reused record buffer.
pub fn augment_stream<R: Read, W: Write>(
    input: R,
    output: W,
    config: &AugmentConfig,
    source: &Path,
) -> Result<AugmentSummary> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let header = HeaderIndex::new(reader.headers()?);
    if header.is_empty() {
        return Err(AugmentError::MissingHeader {
            path: source.to_path_buf(),
        });
    }

    let schema = OutputSchema::build(&header, config);
    let has_timestamp = header.contains(TIMESTAMP_COLUMN);
    let has_time_utc = header.contains(DerivedColumn::TimeUtc.canonical_name());
    log_run_plan(config, has_timestamp, source);
    debug!(columns = ?schema.names(), "output schema");

    let mut writer = WriterBuilder::new().has_headers(false).from_writer(output);
    writer.write_record(schema.names())?;

    let transformer = RowTransformer::new(config, has_timestamp, has_time_utc);
    let mut state = CarriedState::default();
    let mut record = StringRecord::new();

    while reader.read_record(&mut record)? {
        let row = Row::new(&header, &record);
        let derived =
            transformer.derive(&row, state.previous_close.as_deref(), state.row_index);

        writer.write_record(schema.columns().iter().map(|column| match column {
            OutputColumn::Passthrough(name) => row.get(name),
            OutputColumn::Derived(derived_column) => derived.get(*derived_column),
        }))?;

        state.advance(row.get(CLOSE_COLUMN));
    }

    writer.flush()?;

    Ok(AugmentSummary {
        rows: state.row_index,
        columns: schema.names().into_iter().map(str::to_string).collect(),
    })
}

fn log_run_plan(config: &AugmentConfig, has_timestamp: bool, source: &Path) {
    if config.replace_timestamp && !config.add_time_utc {
        warn!(
            source = %source.display(),
            "replace-timestamp without add-time-utc drops the timestamp column with no replacement"
        );
    }
    if !config.add_time_utc {
        return;
    }
    if has_timestamp {
        if config.start_time_utc.is_some() {
            debug!(
                source = %source.display(),
                "input has a timestamp column; start time is ignored"
            );
        }
    } else if config.start_time_utc.is_none() {
        warn!(
            source = %source.display(),
            "no timestamp column and no start time; time_utc will be empty"
        );
    }
}

/// Augment a CSV file.
///
/// With `output` set the result is written there and the input is left
/// untouched; otherwise the input is replaced. Either way the destination only
/// changes through a rename of a fully written temporary file in the same
/// directory, so a failed run leaves no partial file behind.
pub fn augment_file(
    input: &Path,
    output: Option<&Path>,
    config: &AugmentConfig,
) -> Result<AugmentSummary> {
    let destination = output.unwrap_or(input);
    let input_file = File::open(input).map_err(|source| AugmentError::OpenInput {
        path: input.to_path_buf(),
        source,
    })?;

    let mut staged = NamedTempFile::new_in(parent_dir(destination)).map_err(|source| {
        AugmentError::CreateOutput {
            path: destination.to_path_buf(),
            source,
        }
    })?;

    let summary = augment_stream(input_file, &mut staged, config, input)?;
    staged.as_file().sync_all()?;

    // Temp files are created owner-only; give the result the permissions of
    // the file it replaces, or of the input for a fresh destination.
    let template = if destination.exists() { destination } else { input };
    fs::set_permissions(staged.path(), fs::metadata(template)?.permissions())?;

    staged
        .persist(destination)
        .map_err(|err| AugmentError::Persist {
            path: destination.to_path_buf(),
            source: err.error,
        })?;

    info!(
        input = %input.display(),
        destination = %destination.display(),
        in_place = output.is_none(),
        rows = summary.rows,
        columns = summary.columns.len(),
        "augmented candle file"
    );

    Ok(summary)
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
