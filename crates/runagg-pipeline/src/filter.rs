use std::fmt;
use std::str::FromStr;

use runagg_core::errors::{AggError, ErrorInfo};
use runagg_core::RawRecord;
use serde::{Deserialize, Serialize};

/// How the resolution of a [`SamplingPolicy`] is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingMode {
    /// Keep every Nth generation, measured from the first logged generation.
    Interval,
    /// Keep about N records spread evenly from the first to the last record.
    Total,
}

impl FromStr for SamplingMode {
    type Err = AggError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "interval" => Ok(SamplingMode::Interval),
            "total" => Ok(SamplingMode::Total),
            other => Err(AggError::Usage(
                ErrorInfo::new("filter.mode", "unknown sampling mode")
                    .with_context("mode", other)
                    .with_hint("expected `interval` or `total`"),
            )),
        }
    }
}

impl fmt::Display for SamplingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplingMode::Interval => write!(f, "interval"),
            SamplingMode::Total => write!(f, "total"),
        }
    }
}

/// Validated downsampling policy applied to every replicate log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingPolicy {
    mode: SamplingMode,
    resolution: u64,
}

impl SamplingPolicy {
    /// Builds a policy, rejecting resolutions below one.
    pub fn new(mode: SamplingMode, resolution: i64) -> Result<Self, AggError> {
        if resolution < 1 {
            return Err(AggError::Usage(
                ErrorInfo::new("filter.resolution", "time series resolution must be >= 1")
                    .with_context("resolution", resolution.to_string()),
            ));
        }
        Ok(Self {
            mode,
            resolution: resolution as u64,
        })
    }

    pub fn mode(&self) -> SamplingMode {
        self.mode
    }

    pub fn resolution(&self) -> u64 {
        self.resolution
    }
}

/// Selects the records retained for the time-series table.
///
/// `records` must be ordered by ascending generation; the returned records
/// keep that order. Interval spacing is measured from the first record.
pub fn filter_ordered<'a>(
    records: &'a [RawRecord],
    generation_field: &str,
    policy: &SamplingPolicy,
) -> Result<Vec<&'a RawRecord>, AggError> {
    let origin = match records.first() {
        Some(first) => first.counter(generation_field)?,
        None => return Ok(Vec::new()),
    };
    filter_anchored(records, generation_field, policy, origin)
}

/// Like [`filter_ordered`], but interval spacing is measured from `origin`
/// so that two logs of the same replicate land on the same generations.
/// Records before `origin` are never on the interval grid.
pub fn filter_anchored<'a>(
    records: &'a [RawRecord],
    generation_field: &str,
    policy: &SamplingPolicy,
    origin: u64,
) -> Result<Vec<&'a RawRecord>, AggError> {
    match policy.mode {
        SamplingMode::Interval => by_interval(records, generation_field, policy.resolution, origin),
        SamplingMode::Total => Ok(by_total(records, policy.resolution)),
    }
}

fn by_interval<'a>(
    records: &'a [RawRecord],
    generation_field: &str,
    every: u64,
    origin: u64,
) -> Result<Vec<&'a RawRecord>, AggError> {
    let mut kept = Vec::new();
    for record in records {
        let generation = record.counter(generation_field)?;
        if generation >= origin && (generation - origin) % every == 0 {
            kept.push(record);
        }
    }
    Ok(kept)
}

fn by_total(records: &[RawRecord], points: u64) -> Vec<&RawRecord> {
    let len = records.len() as u64;
    if len <= points {
        return records.iter().collect();
    }
    if points == 1 {
        return records.iter().take(1).collect();
    }
    // len > points >= 2, so the spacing is at least one and rounding never
    // maps two points onto the same index.
    let span = len - 1;
    let gaps = points - 1;
    (0..points)
        .map(|i| ((i * span + gaps / 2) / gaps) as usize)
        .map(|idx| &records[idx])
        .collect()
}
