use std::borrow::Cow;
use std::collections::BTreeMap;

use log::debug;
use runagg_core::errors::{AggError, ErrorInfo};
use runagg_core::{ConfigContext, RawRecord, TimeSeriesEntry};

use crate::filter::{filter_anchored, filter_ordered, SamplingPolicy};
use crate::layout::AggregateLayout;

/// Builds one entry per retained primary-log generation.
///
/// `secondary` is `Some` only for completed replicates. It is filtered on
/// the primary log's interval grid; its retained generations are merged into
/// the matching primary entries and generations without a primary entry are
/// dropped. Secondary columns are present on every entry and stay empty where
/// nothing was merged.
pub fn build_time_series(
    context: &ConfigContext,
    primary: &[RawRecord],
    secondary: Option<&[RawRecord]>,
    policy: &SamplingPolicy,
    layout: &AggregateLayout,
) -> Result<Vec<TimeSeriesEntry>, AggError> {
    let generation_field = layout.counters.generation.as_str();
    let primary = ordered(primary, generation_field)?;
    let retained = filter_ordered(&primary, generation_field, policy)?;
    let origin = match retained.first() {
        Some(first) => first.counter(generation_field)?,
        None => 0,
    };

    let mut rows: BTreeMap<u64, BTreeMap<String, String>> = BTreeMap::new();
    for record in &retained {
        let row = rows.entry(record.counter(generation_field)?).or_default();
        for field in &layout.time_series_secondary_fields {
            row.insert(field.clone(), String::new());
        }
        copy_fields(record, &layout.time_series_primary_fields, row)?;
    }

    if let Some(secondary) = secondary {
        let secondary = ordered(secondary, generation_field)?;
        for record in filter_anchored(&secondary, generation_field, policy, origin)? {
            let generation = record.counter(generation_field)?;
            match rows.get_mut(&generation) {
                Some(row) => copy_fields(record, &layout.time_series_secondary_fields, row)?,
                None => debug!(
                    "  - dropping secondary generation {generation}: not retained in primary log"
                ),
            }
        }
    }

    let broadcast: Vec<(&str, &str)> = match layout.time_series_config() {
        Some(names) => names
            .iter()
            .filter_map(|name| context.get(name).map(|value| (name.as_str(), value)))
            .collect(),
        None => context.iter().collect(),
    };

    debug!("  - retained {} generations", rows.len());
    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(step, (generation, mut fields))| {
            fields.insert(layout.step_column.clone(), step.to_string());
            for (name, value) in &broadcast {
                fields.insert(name.to_string(), value.to_string());
            }
            TimeSeriesEntry {
                generation,
                step,
                fields,
            }
        })
        .collect())
}

fn copy_fields(
    record: &RawRecord,
    names: &[String],
    row: &mut BTreeMap<String, String>,
) -> Result<(), AggError> {
    for name in names {
        let value = record.get(name).ok_or_else(|| {
            AggError::Input(
                ErrorInfo::new("timeseries.missing_field", "allow-listed field missing from log")
                    .with_context("field", name.clone()),
            )
        })?;
        row.insert(name.clone(), value.to_string());
    }
    Ok(())
}

fn ordered<'a>(
    records: &'a [RawRecord],
    generation_field: &str,
) -> Result<Cow<'a, [RawRecord]>, AggError> {
    let mut keyed = Vec::with_capacity(records.len());
    for record in records {
        keyed.push(record.counter(generation_field)?);
    }
    if keyed.windows(2).all(|pair| pair[0] <= pair[1]) {
        return Ok(Cow::Borrowed(records));
    }
    let mut pairs: Vec<(u64, &RawRecord)> = keyed.into_iter().zip(records).collect();
    pairs.sort_by_key(|(generation, _)| *generation);
    Ok(Cow::Owned(
        pairs.into_iter().map(|(_, record)| record.clone()).collect(),
    ))
}
