//! Aggregation of per-replicate experiment logs into cross-replicate summary
//! and time-series tables.

mod completion;
mod config;
mod discover;
mod filter;
mod layout;
mod logs;
mod pipeline;
mod report;
mod schema;
mod summary;
mod timeseries;
mod validate;
mod writer;

pub use completion::{
    classify, parse_solution_flag, stop_criterion, Completion, RunProgress, StopCriterion,
};
pub use config::{extract_config, ExtractedConfig};
pub use discover::{discover_replicates, ensure_roots};
pub use filter::{filter_anchored, filter_ordered, SamplingMode, SamplingPolicy};
pub use layout::{AggregateLayout, CounterFields, OutputFiles, ReplicateFiles, StopParams};
pub use logs::{final_record, max_counter, read_config_log, read_log};
pub use pipeline::{aggregate, Aggregator, ReplicateOutcome, ReplicateRecords};
pub use report::AggregateReport;
pub use schema::SchemaGuard;
pub use summary::build_summary;
pub use timeseries::build_time_series;
pub use validate::{validate_replicate, InputCheck};
pub use writer::{encode_field, write_incomplete, write_summary, TimeSeriesSink};
