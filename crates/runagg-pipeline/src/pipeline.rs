use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use runagg_core::errors::{AggError, ErrorInfo};
use runagg_core::{ReplicateSummary, Schema, TimeSeriesEntry};

use crate::completion::{classify, parse_solution_flag, stop_criterion, RunProgress};
use crate::config::extract_config;
use crate::discover::{discover_replicates, ensure_roots};
use crate::filter::SamplingPolicy;
use crate::layout::AggregateLayout;
use crate::logs::{final_record, max_counter, read_config_log, read_log};
use crate::report::AggregateReport;
use crate::schema::SchemaGuard;
use crate::summary::build_summary;
use crate::timeseries::build_time_series;
use crate::validate::validate_replicate;
use crate::writer::{write_incomplete, write_summary, TimeSeriesSink};

/// What happened to a single replicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplicateOutcome {
    /// Rows were added to both tables.
    Contributed { completed: bool },
    /// A required log was absent.
    MissingInputs,
    /// A log was present but unusable.
    Rejected,
}

/// Records extracted from one replicate, ready for schema checks.
#[derive(Debug, Clone)]
pub struct ReplicateRecords {
    pub summary: ReplicateSummary,
    pub entries: Vec<TimeSeriesEntry>,
    pub completed: bool,
}

/// State of one aggregation run: the remembered headers, the output sinks
/// and the accumulated summary rows and incomplete list.
#[derive(Debug)]
pub struct Aggregator {
    layout: AggregateLayout,
    policy: SamplingPolicy,
    dump_dir: PathBuf,
    summary_guard: SchemaGuard,
    time_series_guard: SchemaGuard,
    time_series: TimeSeriesSink,
    summaries: Vec<ReplicateSummary>,
    incomplete: BTreeSet<String>,
    discovered: usize,
}

impl Aggregator {
    /// Checks the layout, prepares the dump directory and truncates the
    /// time-series table.
    pub fn new(
        layout: AggregateLayout,
        policy: SamplingPolicy,
        dump_dir: impl Into<PathBuf>,
    ) -> Result<Self, AggError> {
        layout.validate()?;
        let dump_dir = dump_dir.into();
        fs::create_dir_all(&dump_dir).map_err(|err| {
            AggError::Io(
                ErrorInfo::new("pipeline.dump_dir", "failed to create dump directory")
                    .with_context("path", dump_dir.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        let time_series = TimeSeriesSink::create(dump_dir.join(&layout.outputs.time_series))?;
        Ok(Self {
            layout,
            policy,
            dump_dir,
            summary_guard: SchemaGuard::new("summary"),
            time_series_guard: SchemaGuard::new("time series"),
            time_series,
            summaries: Vec::new(),
            incomplete: BTreeSet::new(),
            discovered: 0,
        })
    }

    /// Processes every replicate in order and writes the final artifacts.
    pub fn run(mut self, replicates: &[PathBuf]) -> Result<AggregateReport, AggError> {
        self.discovered = replicates.len();
        for (idx, replicate) in replicates.iter().enumerate() {
            info!(
                "Processing ({}/{}): {}",
                idx + 1,
                replicates.len(),
                replicate.display()
            );
            self.process(replicate)?;
        }
        self.finish()
    }

    /// Runs validation, extraction, schema checks and the time-series append
    /// for one replicate. Only fatal errors are returned.
    pub fn process(&mut self, replicate: &Path) -> Result<ReplicateOutcome, AggError> {
        let id = replicate.display().to_string();
        let check = validate_replicate(replicate, &self.layout.files);
        if !check.is_complete() {
            warn!("  - Failed to find all required files: {:?}", check.missing);
            self.incomplete.insert(id);
            return Ok(ReplicateOutcome::MissingInputs);
        }

        let records = match self.extract(&id, replicate) {
            Ok(records) => records,
            Err(err) if err.is_recoverable() => {
                warn!("  - Skipping replicate: {err}");
                self.incomplete.insert(id);
                return Ok(ReplicateOutcome::Rejected);
            }
            Err(err) => return Err(err),
        };

        if !records.completed {
            warn!("  - Run failed to finish.");
            self.incomplete.insert(id.clone());
        }

        self.summary_guard.check(&id, &records.summary.schema())?;
        let entry_schemas: Vec<Schema> =
            records.entries.iter().map(TimeSeriesEntry::schema).collect();
        self.time_series_guard.check_all(&id, &entry_schemas)?;

        if let Some(header) = self.time_series_guard.header() {
            self.time_series.append(header, &records.entries)?;
        }
        self.summaries.push(records.summary);
        Ok(ReplicateOutcome::Contributed {
            completed: records.completed,
        })
    }

    fn extract(&self, id: &str, replicate: &Path) -> Result<ReplicateRecords, AggError> {
        let layout = &self.layout;
        let counters = &layout.counters;

        let config_rows = read_config_log(&replicate.join(&layout.files.config_log))?;
        let config = extract_config(&config_rows, &layout.config_fields);
        info!("Run configuration: {:?}", config.context);

        let primary = read_log(&replicate.join(&layout.files.primary_log))?;
        let primary_final = final_record(&primary, &counters.generation)?;
        let progress = RunProgress {
            max_generation: max_counter(&primary, &counters.generation)?,
            max_evaluations: max_counter(&primary, &counters.evaluations)?,
            solution_found: parse_solution_flag(primary_final.get(&counters.solution_found)),
        };
        let completion = classify(stop_criterion(&config.params, &layout.stop)?, &progress);
        let completed = completion.completed();

        let secondary = read_log(&replicate.join(&layout.files.secondary_log))?;
        let secondary_final = final_record(&secondary, &counters.generation)?;

        let summary = build_summary(id, &config.context, primary_final, secondary_final, layout);
        let entries = build_time_series(
            &config.context,
            &primary,
            completed.then_some(secondary.as_slice()),
            &self.policy,
            layout,
        )?;

        Ok(ReplicateRecords {
            summary,
            entries,
            completed,
        })
    }

    /// Writes the summary table, the incomplete list and the run report.
    pub fn finish(self) -> Result<AggregateReport, AggError> {
        let outputs = &self.layout.outputs;
        let summary_path = self.dump_dir.join(&outputs.summary);
        write_summary(&summary_path, self.summary_guard.header(), &self.summaries)?;
        let incomplete_path = self.dump_dir.join(&outputs.incomplete);
        write_incomplete(&incomplete_path, &self.incomplete)?;

        let report = AggregateReport {
            sampling: self.policy,
            discovered: self.discovered,
            contributing: self.summaries.len(),
            summary_rows: self.summaries.len(),
            time_series_rows: self.time_series.rows_written(),
            incomplete: self.incomplete.iter().cloned().collect(),
            summary_header: header_columns(self.summary_guard.header()),
            time_series_header: header_columns(self.time_series_guard.header()),
        };
        report.write_json(&self.dump_dir.join(&outputs.report))?;
        info!(
            "Wrote {} summary rows to {} and {} time series rows to {}",
            report.summary_rows,
            summary_path.display(),
            report.time_series_rows,
            self.time_series.path().display()
        );
        info!(
            "{} incomplete replicates listed in {}",
            report.incomplete.len(),
            incomplete_path.display()
        );
        Ok(report)
    }
}

/// Validates the roots, discovers replicates and aggregates them into
/// `dump_dir`. Usage errors are raised before any output is touched.
pub fn aggregate(
    roots: &[PathBuf],
    dump_dir: &Path,
    layout: AggregateLayout,
    policy: SamplingPolicy,
) -> Result<AggregateReport, AggError> {
    ensure_roots(roots)?;
    let replicates = discover_replicates(roots, &layout.replicate_marker)?;
    info!("Found {} run directories.", replicates.len());
    Aggregator::new(layout, policy, dump_dir)?.run(&replicates)
}

fn header_columns(schema: Option<&Schema>) -> Vec<String> {
    schema.map(|schema| schema.columns().to_vec()).unwrap_or_default()
}
