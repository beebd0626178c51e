use std::collections::BTreeMap;

use log::{info, warn};
use runagg_core::errors::{AggError, ErrorInfo};
use serde::{Deserialize, Serialize};

use crate::layout::StopParams;

/// Stop test selected by a replicate's config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopCriterion {
    Generations(u64),
    Evaluations(u64),
    Unrecognized(String),
}

/// Counters observed in the primary log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunProgress {
    pub max_generation: u64,
    pub max_evaluations: u64,
    /// Solution flag of the final primary record.
    pub solution_found: bool,
}

/// Classification of a replicate against its own stop criterion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub criterion: StopCriterion,
    pub limit_reached: bool,
    pub solution_found: bool,
}

impl Completion {
    pub fn completed(&self) -> bool {
        self.limit_reached || self.solution_found
    }
}

/// Reads the stop criterion and its limit from the raw parameter map.
pub fn stop_criterion(
    params: &BTreeMap<String, String>,
    names: &StopParams,
) -> Result<StopCriterion, AggError> {
    let selector = params.get(&names.mode).map(String::as_str).unwrap_or("");
    match selector {
        "generations" => Ok(StopCriterion::Generations(limit(
            params,
            &names.max_generations,
        )?)),
        "evaluations" => Ok(StopCriterion::Evaluations(limit(
            params,
            &names.max_evaluations,
        )?)),
        other => Ok(StopCriterion::Unrecognized(other.to_string())),
    }
}

/// Decides whether the replicate ran to completion. A found solution
/// overrides the stop test.
pub fn classify(criterion: StopCriterion, progress: &RunProgress) -> Completion {
    let limit_reached = match &criterion {
        StopCriterion::Generations(max) => *max <= progress.max_generation,
        StopCriterion::Evaluations(max) => *max <= progress.max_evaluations,
        StopCriterion::Unrecognized(selector) => {
            warn!("  - Unrecognized stop mode `{selector}`");
            false
        }
    };
    if progress.solution_found {
        info!("  - Run found solution");
    }
    Completion {
        criterion,
        limit_reached,
        solution_found: progress.solution_found,
    }
}

/// Interprets a solution flag value; `1` and `true` mean found.
pub fn parse_solution_flag(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        Some("1") => true,
        Some(text) => text.eq_ignore_ascii_case("true"),
        None => false,
    }
}

fn limit(params: &BTreeMap<String, String>, name: &str) -> Result<u64, AggError> {
    let raw = params.get(name).ok_or_else(|| {
        AggError::Input(
            ErrorInfo::new("completion.missing_limit", "stop limit missing from config log")
                .with_context("param", name),
        )
    })?;
    raw.trim().parse::<u64>().map_err(|err| {
        AggError::Input(
            ErrorInfo::new("completion.bad_limit", "stop limit is not an integer")
                .with_context("param", name)
                .with_context("value", raw.clone())
                .with_hint(err.to_string()),
        )
    })
}
