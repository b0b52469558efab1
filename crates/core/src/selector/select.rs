//! Resolution of the path argument into a source directory and file names.

use std::path::{Path, PathBuf};
use tracing::debug;

use super::error::SelectorError;
use super::wildcard::{has_wildcard, WildcardPattern};

/// Input files selected for conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSelection {
    /// Directory holding the inputs. Outputs and archives go here too.
    pub source_dir: PathBuf,
    /// File names relative to `source_dir`, in the order they will run.
    pub files: Vec<String>,
}

impl JobSelection {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }
}

/// Splits an argument into its directory part (if any) and file name part.
///
/// Both `/` and `\` are accepted as separators.
pub fn split_argument(argument: &str) -> (Option<&str>, &str) {
    match argument.rfind(['/', '\\']) {
        Some(idx) => (Some(&argument[..=idx]), &argument[idx + 1..]),
        None => (None, argument),
    }
}

/// Resolves `argument` into a [`JobSelection`].
///
/// Without a directory part the source directory is `cwd`; relative
/// directories are resolved against `cwd`. A wildcard file name is expanded
/// against the regular files of the source directory in the order the
/// filesystem lists them, which is not guaranteed to be stable or sorted. A
/// literal file name always yields exactly one entry, whether or not it
/// exists.
pub fn select_jobs(argument: &str, cwd: &Path) -> Result<JobSelection, SelectorError> {
    let (dir, name) = split_argument(argument);

    if name.is_empty() {
        return Err(SelectorError::EmptyFileName {
            argument: argument.to_string(),
        });
    }

    let source_dir = match dir {
        Some(dir) if has_wildcard(dir) => {
            return Err(SelectorError::WildcardInDirectory {
                argument: argument.to_string(),
            })
        }
        Some(dir) => cwd.join(dir),
        None => cwd.to_path_buf(),
    };

    if !has_wildcard(name) {
        return Ok(JobSelection {
            source_dir,
            files: vec![name.to_string()],
        });
    }

    let pattern = WildcardPattern::new(name)?;
    let files = expand(&source_dir, &pattern)?;
    debug!(
        "Pattern {} matched {} file(s) in {}",
        pattern.as_str(),
        files.len(),
        source_dir.display()
    );

    Ok(JobSelection { source_dir, files })
}

fn expand(dir: &Path, pattern: &WildcardPattern) -> Result<Vec<String>, SelectorError> {
    let read_err = |e| SelectorError::ReadDir {
        path: dir.to_path_buf(),
        source: e,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        if !entry.file_type().map_err(read_err)?.is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            debug!("Skipping non UTF-8 file name {:?}", entry.file_name());
            continue;
        };
        if pattern.matches(&name) {
            files.push(name);
        }
    }
    Ok(files)
}
