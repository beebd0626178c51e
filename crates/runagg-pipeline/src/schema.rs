use runagg_core::errors::{AggError, ErrorInfo};
use runagg_core::Schema;

/// Remembers the header of one output table and rejects any replicate whose
/// field set differs from it.
#[derive(Debug, Clone)]
pub struct SchemaGuard {
    table: String,
    expected: Option<Schema>,
}

impl SchemaGuard {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            expected: None,
        }
    }

    /// Header fixed by the first replicate, if any has been checked.
    pub fn header(&self) -> Option<&Schema> {
        self.expected.as_ref()
    }

    /// Compares `observed` to the remembered header, adopting it when none is
    /// remembered yet. Returns `true` when the header was adopted.
    pub fn check(&mut self, replicate: &str, observed: &Schema) -> Result<bool, AggError> {
        let Some(expected) = &self.expected else {
            self.expected = Some(observed.clone());
            return Ok(true);
        };
        if expected == observed {
            return Ok(false);
        }
        let (added, removed) = expected.difference(observed);
        Err(AggError::Schema(
            ErrorInfo::new("schema.mismatch", format!("{} header mismatch", self.table))
                .with_context("replicate", replicate)
                .with_context("added", added.join(";"))
                .with_context("removed", removed.join(";"))
                .with_hint("every replicate must produce the same field set"),
        ))
    }

    /// Checks a batch of schemas from one replicate; each must match.
    pub fn check_all<'a, I>(&mut self, replicate: &str, schemas: I) -> Result<bool, AggError>
    where
        I: IntoIterator<Item = &'a Schema>,
    {
        let mut adopted = false;
        for schema in schemas {
            adopted |= self.check(replicate, schema)?;
        }
        Ok(adopted)
    }
}
