//! Errors raised while aggregating replicate logs.
//!
//! Every variant carries an [`ErrorInfo`]; the variant decides whether the
//! run skips one replicate or aborts.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What went wrong, and where: the replicate, log path or field involved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Dotted code naming the failing stage, e.g. `log.ambiguous_final`.
    pub code: String,
    /// One-line explanation printed after `error:` on abort.
    pub message: String,
    /// Replicate paths, field names and offending values.
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Underlying io/csv/yaml message or a suggested layout change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Starts a payload with no context and no hint.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Records one context entry; a repeated key keeps the last value.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Attaches the hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the aggregation pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum AggError {
    /// Invalid command line input, raised before any replicate is touched.
    #[error("usage error: {0}")]
    Usage(ErrorInfo),
    /// Layout configuration could not be loaded or is inconsistent.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// A single replicate has unusable inputs; the run may continue.
    #[error("input error: {0}")]
    Input(ErrorInfo),
    /// Record field sets diverged between replicates.
    #[error("schema error: {0}")]
    Schema(ErrorInfo),
    /// Filesystem failures on the dump directory or output tables.
    #[error("io error: {0}")]
    Io(ErrorInfo),
}

impl Display for ErrorInfo {
    /// Renders `message [code] key=value ...; hint`, on one line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.message, self.code)?;
        for (key, value) in &self.context {
            write!(f, " {key}={value}")?;
        }
        match &self.hint {
            Some(hint) => write!(f, "; {hint}"),
            None => Ok(()),
        }
    }
}

impl AggError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            AggError::Usage(info)
            | AggError::Config(info)
            | AggError::Input(info)
            | AggError::Schema(info)
            | AggError::Io(info) => info,
        }
    }

    /// True when the failure is confined to one replicate and the run can
    /// move on to the next one.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AggError::Input(_))
    }
}
