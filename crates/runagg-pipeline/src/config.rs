use std::collections::BTreeMap;

use runagg_core::ConfigContext;

/// Config log split into the allow-listed context and the full parameter map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedConfig {
    pub context: ConfigContext,
    pub params: BTreeMap<String, String>,
}

/// Restricts the config rows to `allow` for the context while keeping every
/// parameter in the raw map. Later rows override earlier rows of the same
/// parameter.
pub fn extract_config(rows: &[(String, String)], allow: &[String]) -> ExtractedConfig {
    let params: BTreeMap<String, String> = rows.iter().cloned().collect();
    let selected = params
        .iter()
        .filter(|(name, _)| allow.contains(name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();
    ExtractedConfig {
        context: ConfigContext::new(selected),
        params,
    }
}
