use std::fs;
use std::path::{Path, PathBuf};

use runagg_core::errors::{AggError, ErrorInfo};
use serde::{Deserialize, Serialize};

/// Relative locations of the raw logs inside a replicate directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicateFiles {
    #[serde(default = "ReplicateFiles::default_primary")]
    pub primary_log: PathBuf,
    #[serde(default = "ReplicateFiles::default_secondary")]
    pub secondary_log: PathBuf,
    #[serde(default = "ReplicateFiles::default_config")]
    pub config_log: PathBuf,
}

impl ReplicateFiles {
    fn default_primary() -> PathBuf {
        Path::new("output").join("summary.csv")
    }

    fn default_secondary() -> PathBuf {
        Path::new("output").join("elite.csv")
    }

    fn default_config() -> PathBuf {
        Path::new("output").join("run_config.csv")
    }

    /// Files that must all exist for a replicate to be extracted.
    pub fn required(&self) -> Vec<PathBuf> {
        vec![
            self.primary_log.clone(),
            self.secondary_log.clone(),
            self.config_log.clone(),
        ]
    }
}

impl Default for ReplicateFiles {
    fn default() -> Self {
        Self {
            primary_log: Self::default_primary(),
            secondary_log: Self::default_secondary(),
            config_log: Self::default_config(),
        }
    }
}

/// Field names with special meaning in the logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterFields {
    #[serde(default = "CounterFields::default_generation")]
    pub generation: String,
    #[serde(default = "CounterFields::default_evaluations")]
    pub evaluations: String,
    #[serde(default = "CounterFields::default_solution")]
    pub solution_found: String,
}

impl CounterFields {
    fn default_generation() -> String {
        "update".into()
    }

    fn default_evaluations() -> String {
        "evaluations".into()
    }

    fn default_solution() -> String {
        "found_solution".into()
    }
}

impl Default for CounterFields {
    fn default() -> Self {
        Self {
            generation: Self::default_generation(),
            evaluations: Self::default_evaluations(),
            solution_found: Self::default_solution(),
        }
    }
}

/// Config-log parameters that select and bound the replicate's stop test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopParams {
    #[serde(default = "StopParams::default_mode")]
    pub mode: String,
    #[serde(default = "StopParams::default_max_generations")]
    pub max_generations: String,
    #[serde(default = "StopParams::default_max_evaluations")]
    pub max_evaluations: String,
}

impl StopParams {
    fn default_mode() -> String {
        "STOP_MODE".into()
    }

    fn default_max_generations() -> String {
        "MAX_GENS".into()
    }

    fn default_max_evaluations() -> String {
        "MAX_EVALS".into()
    }
}

impl Default for StopParams {
    fn default() -> Self {
        Self {
            mode: Self::default_mode(),
            max_generations: Self::default_max_generations(),
            max_evaluations: Self::default_max_evaluations(),
        }
    }
}

/// Names of the artifacts written to the dump directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFiles {
    #[serde(default = "OutputFiles::default_time_series")]
    pub time_series: String,
    #[serde(default = "OutputFiles::default_summary")]
    pub summary: String,
    #[serde(default = "OutputFiles::default_incomplete")]
    pub incomplete: String,
    #[serde(default = "OutputFiles::default_report")]
    pub report: String,
}

impl OutputFiles {
    fn default_time_series() -> String {
        "time_series.csv".into()
    }

    fn default_summary() -> String {
        "aggregate.csv".into()
    }

    fn default_incomplete() -> String {
        "incomplete_runs_agg.log".into()
    }

    fn default_report() -> String {
        "aggregate_report.json".into()
    }
}

impl Default for OutputFiles {
    fn default() -> Self {
        Self {
            time_series: Self::default_time_series(),
            summary: Self::default_summary(),
            incomplete: Self::default_incomplete(),
            report: Self::default_report(),
        }
    }
}

/// Static description of the replicate logs and of which fields flow into
/// the summary and time-series tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateLayout {
    #[serde(default = "AggregateLayout::default_marker")]
    pub replicate_marker: String,
    #[serde(default)]
    pub files: ReplicateFiles,
    #[serde(default)]
    pub counters: CounterFields,
    #[serde(default)]
    pub stop: StopParams,
    /// Config parameters copied into every summary row.
    #[serde(default = "AggregateLayout::default_config_fields")]
    pub config_fields: Vec<String>,
    /// Primary/secondary final-record fields never copied into the summary.
    #[serde(default)]
    pub summary_exclude_fields: Vec<String>,
    #[serde(default = "AggregateLayout::default_secondary_prefix")]
    pub secondary_prefix: String,
    #[serde(default = "AggregateLayout::default_ts_primary_fields")]
    pub time_series_primary_fields: Vec<String>,
    #[serde(default = "AggregateLayout::default_ts_secondary_fields")]
    pub time_series_secondary_fields: Vec<String>,
    /// Config parameters broadcast into every time-series entry; `None`
    /// broadcasts the whole config context.
    #[serde(default = "AggregateLayout::default_ts_config_fields")]
    pub time_series_config_fields: Option<Vec<String>>,
    #[serde(default = "AggregateLayout::default_step_column")]
    pub step_column: String,
    #[serde(default)]
    pub outputs: OutputFiles,
}

impl AggregateLayout {
    fn default_marker() -> String {
        "RUN_".into()
    }

    fn default_secondary_prefix() -> String {
        "elite_".into()
    }

    fn default_step_column() -> String {
        "ts_step".into()
    }

    fn default_config_fields() -> Vec<String> {
        to_owned(&[
            "SEED",
            "POP_SIZE",
            "STOP_MODE",
            "MAX_GENS",
            "MAX_EVALS",
            "POP_INIT_MODE",
            "SELECTION",
            "TOURNAMENT_SIZE",
            "PROBLEM",
            "TESTING_SET_PATH",
            "TRAINING_SET_PATH",
            "ANCESTOR_FILE_PATH",
            "EVAL_MODE",
            "EVAL_CPU_CYCLES_PER_TEST",
            "NUM_COHORTS",
            "TEST_DOWNSAMPLE_RATE",
            "MAX_ACTIVE_THREAD_CNT",
            "MAX_THREAD_CAPACITY",
            "PRG_MIN_FUNC_CNT",
            "PRG_MAX_FUNC_CNT",
            "PRG_MIN_FUNC_INST_CNT",
            "PRG_MAX_FUNC_INST_CNT",
            "PRG_INST_MIN_ARG_VAL",
            "PRG_INST_MAX_ARG_VAL",
            "MUT_RATE_INST_ARG_SUB",
            "MUT_RATE_INST_SUB",
            "MUT_RATE_INST_INS",
            "MUT_RATE_INST_DEL",
            "MUT_RATE_SEQ_SLIP",
            "MUT_RATE_FUNC_DUP",
            "MUT_RATE_FUNC_DEL",
            "MUT_RATE_INST_TAG_BF",
            "MUT_RATE_FUNC_TAG_BF",
            "MUT_RATE_INST_TAG_SINGLE_BF",
            "MUT_RATE_FUNC_TAG_SINGLE_BF",
            "MUT_RATE_INST_TAG_SEQ_RAND",
            "MUT_RATE_FUNC_TAG_SEQ_RAND",
            "AGE_LEX_AGE_ORDER_LIMIT",
            "RECOMB_PER_FUNC_SEQ_RECOMB_RATE",
            "ORG_INJECTION_COUNT",
            "ORG_INJECTION_MODE",
            "ORG_INJECTION_INTERVAL",
        ])
    }

    fn default_ts_primary_fields() -> Vec<String> {
        to_owned(&[
            "update",
            "evaluations",
            "found_solution",
            "pop_training_coverage",
            "max_approx_agg_score",
            "num_unique_selected",
            "entropy_selected_ids",
            "parents_training_coverage",
            "training_coverage_loss",
            "mean_age_selected",
        ])
    }

    fn default_ts_secondary_fields() -> Vec<String> {
        to_owned(&["eval_agg_score", "eval_training_coverage", "elite_age"])
    }

    fn default_ts_config_fields() -> Option<Vec<String>> {
        Some(to_owned(&[
            "SEED",
            "SELECTION",
            "PROBLEM",
            "TESTING_SET_PATH",
            "TRAINING_SET_PATH",
            "EVAL_MODE",
            "TEST_DOWNSAMPLE_RATE",
            "NUM_COHORTS",
            "AGE_LEX_AGE_ORDER_LIMIT",
            "ORG_INJECTION_COUNT",
            "ORG_INJECTION_MODE",
            "ORG_INJECTION_INTERVAL",
        ]))
    }

    /// Loads a layout from YAML; absent keys fall back to the defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, AggError> {
        let layout: Self = serde_yaml::from_str(text).map_err(|err| {
            AggError::Config(
                ErrorInfo::new("layout.parse", "failed to parse layout").with_hint(err.to_string()),
            )
        })?;
        layout.validate()?;
        Ok(layout)
    }

    /// Reads and parses a YAML layout file.
    pub fn from_yaml_path(path: &Path) -> Result<Self, AggError> {
        let text = fs::read_to_string(path).map_err(|err| {
            AggError::Config(
                ErrorInfo::new("layout.read", "failed to read layout file")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        Self::from_yaml_str(&text)
    }

    /// Rejects layouts whose allow-lists contradict each other.
    pub fn validate(&self) -> Result<(), AggError> {
        if self.replicate_marker.is_empty() {
            return Err(AggError::Config(ErrorInfo::new(
                "layout.marker",
                "replicate marker must not be empty",
            )));
        }
        if self.secondary_prefix.is_empty() {
            return Err(AggError::Config(
                ErrorInfo::new("layout.prefix", "secondary prefix must not be empty")
                    .with_hint("secondary fields would collide with primary fields"),
            ));
        }
        if self
            .time_series_primary_fields
            .iter()
            .chain(&self.time_series_secondary_fields)
            .any(|field| field == &self.step_column)
        {
            return Err(AggError::Config(
                ErrorInfo::new("layout.step_column", "step column shadows a log field")
                    .with_context("column", self.step_column.clone()),
            ));
        }
        if let Some(field) = self
            .time_series_secondary_fields
            .iter()
            .find(|field| self.time_series_primary_fields.contains(field))
        {
            return Err(AggError::Config(
                ErrorInfo::new(
                    "layout.ts_overlap",
                    "field is allow-listed for both primary and secondary time series",
                )
                .with_context("field", field.clone()),
            ));
        }
        if let Some(field) = self
            .time_series_config()
            .and_then(|names| names.iter().find(|name| !self.config_fields.contains(name)))
        {
            return Err(AggError::Config(
                ErrorInfo::new(
                    "layout.ts_config",
                    "time series config field is not extracted from the config log",
                )
                .with_context("field", field.clone())
                .with_hint("add it to config_fields"),
            ));
        }
        Ok(())
    }

    /// Config parameters broadcast into the time-series table.
    pub fn time_series_config(&self) -> Option<&[String]> {
        self.time_series_config_fields.as_deref()
    }
}

impl Default for AggregateLayout {
    fn default() -> Self {
        Self {
            replicate_marker: Self::default_marker(),
            files: ReplicateFiles::default(),
            counters: CounterFields::default(),
            stop: StopParams::default(),
            config_fields: Self::default_config_fields(),
            summary_exclude_fields: Vec::new(),
            secondary_prefix: Self::default_secondary_prefix(),
            time_series_primary_fields: Self::default_ts_primary_fields(),
            time_series_secondary_fields: Self::default_ts_secondary_fields(),
            time_series_config_fields: Self::default_ts_config_fields(),
            step_column: Self::default_step_column(),
            outputs: OutputFiles::default(),
        }
    }
}

fn to_owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}
