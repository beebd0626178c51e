use std::collections::BTreeMap;

use runagg_core::{ConfigContext, RawRecord, ReplicateSummary};

use crate::layout::AggregateLayout;

/// Merges config, the final primary record and the final secondary record
/// into one summary row.
///
/// Earlier sources win: config fields shadow primary fields, and a secondary
/// field is dropped when its bare name is already present.
pub fn build_summary(
    replicate: &str,
    context: &ConfigContext,
    primary_final: &RawRecord,
    secondary_final: &RawRecord,
    layout: &AggregateLayout,
) -> ReplicateSummary {
    let mut fields: BTreeMap<String, String> = context
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

    for (name, value) in primary_final.iter() {
        if excluded(layout, name) || fields.contains_key(name) {
            continue;
        }
        fields.insert(name.to_string(), value.to_string());
    }

    for (name, value) in secondary_final.iter() {
        let prefixed = format!("{}{name}", layout.secondary_prefix);
        if excluded(layout, name) || fields.contains_key(name) || fields.contains_key(&prefixed) {
            continue;
        }
        fields.insert(prefixed, value.to_string());
    }

    ReplicateSummary {
        replicate: replicate.to_string(),
        fields,
    }
}

fn excluded(layout: &AggregateLayout, name: &str) -> bool {
    layout.summary_exclude_fields.iter().any(|field| field == name)
}
