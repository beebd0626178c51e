use std::path::{Path, PathBuf};

use crate::layout::ReplicateFiles;

/// Outcome of checking a replicate directory for its raw logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputCheck {
    pub missing: Vec<PathBuf>,
}

impl InputCheck {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Confirms every required log exists under `replicate`.
pub fn validate_replicate(replicate: &Path, files: &ReplicateFiles) -> InputCheck {
    let missing = files
        .required()
        .into_iter()
        .filter(|relative| !replicate.join(relative).is_file())
        .collect();
    InputCheck { missing }
}
