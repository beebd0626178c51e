#![deny(missing_docs)]
#![doc = "Error surface and record types for cross-replicate experiment aggregation."]

pub mod errors;
mod record;

pub use errors::{AggError, ErrorInfo};
pub use record::{ConfigContext, RawRecord, ReplicateSummary, Schema, TimeSeriesEntry};
