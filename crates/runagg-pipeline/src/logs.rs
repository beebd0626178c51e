use std::path::Path;

use csv::ReaderBuilder;
use runagg_core::errors::{AggError, ErrorInfo};
use runagg_core::RawRecord;

/// Reads a wide log (header row plus one row per generation) into records.
pub fn read_log(path: &Path) -> Result<Vec<RawRecord>, AggError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_path(path)
        .map_err(|err| wrap_csv("log.open", path, err))?;
    let headers = reader
        .headers()
        .map_err(|err| wrap_csv("log.header", path, err))?
        .clone();
    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(|err| wrap_csv("log.record", path, err))?;
        records.push(RawRecord::from_pairs(headers.iter().zip(row.iter())));
    }
    Ok(records)
}

/// Reads the `(parameter, value)` rows of a config log in file order.
pub fn read_config_log(path: &Path) -> Result<Vec<(String, String)>, AggError> {
    let records = read_log(path)?;
    let mut rows = Vec::with_capacity(records.len());
    for record in &records {
        let (Some(param), Some(value)) = (record.get("parameter"), record.get("value")) else {
            return Err(AggError::Input(
                ErrorInfo::new("log.config_columns", "config log lacks parameter/value columns")
                    .with_context("path", path.display().to_string()),
            ));
        };
        rows.push((param.to_string(), value.to_string()));
    }
    Ok(rows)
}

/// Largest value of a counter field across the log.
pub fn max_counter(records: &[RawRecord], field: &str) -> Result<u64, AggError> {
    let mut max = None;
    for record in records {
        let value = record.counter(field)?;
        max = Some(max.map_or(value, |current: u64| current.max(value)));
    }
    max.ok_or_else(|| {
        AggError::Input(
            ErrorInfo::new("log.empty", "log contains no records").with_context("field", field),
        )
    })
}

/// The unique record sitting at the log's maximum generation.
pub fn final_record<'a>(
    records: &'a [RawRecord],
    generation_field: &str,
) -> Result<&'a RawRecord, AggError> {
    let max_gen = max_counter(records, generation_field)?;
    let mut finals = Vec::new();
    for record in records {
        if record.counter(generation_field)? == max_gen {
            finals.push(record);
        }
    }
    match finals.as_slice() {
        [single] => Ok(single),
        _ => Err(AggError::Input(
            ErrorInfo::new("log.ambiguous_final", "final generation is not unique")
                .with_context("generation", max_gen.to_string())
                .with_context("rows", finals.len().to_string()),
        )),
    }
}

fn wrap_csv(code: &str, path: &Path, err: csv::Error) -> AggError {
    AggError::Input(
        ErrorInfo::new(code, "failed to read replicate log")
            .with_context("path", path.display().to_string())
            .with_hint(err.to_string()),
    )
}
