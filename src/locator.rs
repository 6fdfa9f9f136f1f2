use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::PipelineError;
use crate::models::Project;

/// Find the installed directory for `project` under `exercises_root`.
///
/// Matches immediate subdirectories whose name starts with the project's slug.
/// When several match, the lexicographically smallest name wins.
pub fn locate(exercises_root: &Path, project: &Project) -> Result<PathBuf, PipelineError> {
    let slug = project.slug();
    let entries = std::fs::read_dir(exercises_root)
        .map_err(|_| PipelineError::not_found("exercises directory", exercises_root))?;

    let mut matches: Vec<PathBuf> = entries
        .flatten()
        .filter(|entry| entry.path().is_dir())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(&slug))
        .map(|entry| entry.path())
        .collect();
    matches.sort();

    if matches.len() > 1 {
        debug!(
            slug = %slug,
            candidates = ?matches,
            "several exercise directories share the slug prefix"
        );
    }

    matches
        .into_iter()
        .next()
        .ok_or_else(|| PipelineError::not_found("project directory", exercises_root.join(&slug)))
}
