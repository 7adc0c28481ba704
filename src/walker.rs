//! Batch expansion of file arguments and per-file dispatch.
//!
//! Each argument is either a literal path or a glob pattern. Files are
//! visited one at a time in argument order; matches of a single pattern come
//! back in the sorted order `glob` yields them.

use std::future::Future;
use std::path::PathBuf;

use tracing::{error, warn};

use crate::error::CodemakerError;

/// What a single file's failure does to the rest of the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPolicy {
    /// Stop at the first failure and return it.
    Strict,
    /// Log the failure and carry on with the next file.
    Lenient,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
}

/// True when the argument contains glob metacharacters.
pub fn contains_glob(s: &str) -> bool {
    s.contains('*') || s.contains('?') || s.contains('[')
}

/// Expand one argument into concrete file paths.
///
/// Literal paths are returned untouched even if they do not exist, so the
/// read error later names the file. Directories matched by a pattern are
/// skipped.
pub fn expand(input: &str) -> Result<Vec<PathBuf>, CodemakerError> {
    if !contains_glob(input) {
        return Ok(vec![PathBuf::from(input)]);
    }

    let mut paths = Vec::new();
    for entry in glob::glob(input)? {
        match entry {
            Ok(path) if path.is_dir() => {}
            Ok(path) => paths.push(path),
            Err(err) => warn!(pattern = input, error = %err, "skipping unreadable path"),
        }
    }
    if paths.is_empty() {
        warn!(pattern = input, "pattern matched no files");
    }
    Ok(paths)
}

/// Run `op` for every file named by `inputs`, honouring `policy`.
///
/// Under [`BatchPolicy::Lenient`] failures are logged and counted in the
/// summary; only an interrupt ends the batch early.
pub async fn for_each<F, Fut>(
    inputs: &[String],
    policy: BatchPolicy,
    mut op: F,
) -> Result<BatchSummary, CodemakerError>
where
    F: FnMut(PathBuf) -> Fut,
    Fut: Future<Output = Result<(), CodemakerError>>,
{
    let mut summary = BatchSummary::default();

    for input in inputs {
        let paths = match expand(input) {
            Ok(paths) => paths,
            Err(err) => {
                summary.failed += 1;
                error!(pattern = %input, error = %err, "could not expand input");
                match policy {
                    BatchPolicy::Strict => return Err(err),
                    BatchPolicy::Lenient => continue,
                }
            }
        };

        for path in paths {
            let shown = path.display().to_string();
            match op(path).await {
                Ok(()) => summary.processed += 1,
                Err(err) => {
                    summary.failed += 1;
                    error!(file = %shown, error = %err, "failed to process file");
                    if policy == BatchPolicy::Strict || err.is_interrupt() {
                        return Err(err);
                    }
                }
            }
        }
    }

    Ok(summary)
}
