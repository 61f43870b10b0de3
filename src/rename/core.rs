use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};
use walkdir::WalkDir;

use crate::affix::AffixRules;
use crate::common::{Error, IoResultExt, Result, io_error_msg};

/// Configuration for rename-files.
#[derive(Clone, Debug, Default)]
pub struct RenameConfig {
    pub rules: AffixRules,
    /// Perform the renames; otherwise only report them.
    pub in_place: bool,
    /// Never replace an existing destination.
    pub no_clobber: bool,
}

/// What happened to one path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed { from: PathBuf, to: PathBuf },
    WouldRename { from: PathBuf, to: PathBuf },
    /// The rules leave the name as it is.
    Unchanged(PathBuf),
    /// Destination exists and `no_clobber` is set.
    Skipped { from: PathBuf, to: PathBuf },
    /// The operand does not exist.
    Missing(PathBuf),
    Failed {
        from: PathBuf,
        to: PathBuf,
        error: String,
    },
}

impl RenameOutcome {
    /// True for outcomes that make the run exit non-zero.
    pub fn is_failure(&self) -> bool {
        matches!(self, RenameOutcome::Missing(_) | RenameOutcome::Failed { .. })
    }
}

impl fmt::Display for RenameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenameOutcome::Renamed { from, to } => {
                write!(f, "renamed: {} -> {}", from.display(), to.display())
            }
            RenameOutcome::WouldRename { from, to } => {
                write!(f, "would rename: {} -> {}", from.display(), to.display())
            }
            RenameOutcome::Unchanged(path) => write!(f, "unchanged: {}", path.display()),
            RenameOutcome::Skipped { from, to } => write!(
                f,
                "not renaming {}: '{}' already exists",
                from.display(),
                to.display()
            ),
            RenameOutcome::Missing(path) => {
                write!(f, "cannot rename '{}': No such file or directory", path.display())
            }
            RenameOutcome::Failed { from, to, error } => write!(
                f,
                "cannot rename '{}' to '{}': {}",
                from.display(),
                to.display(),
                error
            ),
        }
    }
}

/// Destination for `path` under `rules`: same directory, edited file name.
/// `None` when the name does not change.
pub fn target_path(path: &Path, rules: &AffixRules) -> Option<PathBuf> {
    let name = path.file_name()?;
    let new_name = rules.apply_os(name);
    if new_name.is_empty() || new_name.as_os_str() == name {
        return None;
    }
    Some(path.with_file_name(new_name))
}

/// Rename (or report renaming) a single existing path.
pub fn rename_path(path: &Path, config: &RenameConfig) -> RenameOutcome {
    let Some(to) = target_path(path, &config.rules) else {
        debug!("name of '{}' unchanged by the rules", path.display());
        return RenameOutcome::Unchanged(path.to_path_buf());
    };
    let from = path.to_path_buf();

    if config.no_clobber && fs::symlink_metadata(&to).is_ok() {
        let outcome = RenameOutcome::Skipped { from, to };
        warn!("{}", outcome);
        return outcome;
    }

    if !config.in_place {
        return RenameOutcome::WouldRename { from, to };
    }

    match fs::rename(&from, &to) {
        Ok(()) => RenameOutcome::Renamed { from, to },
        Err(e) => {
            let outcome = RenameOutcome::Failed {
                from,
                to,
                error: io_error_msg(&e),
            };
            error!("{}", outcome);
            outcome
        }
    }
}

/// Process explicit file operands. Missing operands are reported and
/// skipped; the rest are still processed.
pub fn rename_files(paths: &[PathBuf], config: &RenameConfig) -> Vec<RenameOutcome> {
    paths
        .iter()
        .map(|path| match fs::symlink_metadata(path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let outcome = RenameOutcome::Missing(path.clone());
                error!("{}", outcome);
                outcome
            }
            _ => rename_path(path, config),
        })
        .collect()
}

/// Every non-directory entry below `dir`, recursively, in walk order.
/// Unreadable entries are logged and skipped.
pub fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let meta = fs::metadata(dir).with_path(dir)?;
    if !meta.is_dir() {
        return Err(Error::io(dir, io::Error::from(io::ErrorKind::NotADirectory)));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).follow_links(false) {
        match entry {
            Ok(entry) if entry.file_type().is_dir() => {}
            Ok(entry) => files.push(entry.into_path()),
            Err(e) => {
                let path = e.path().unwrap_or(dir).display().to_string();
                warn!("error accessing '{}', skipping: {}", path, e);
            }
        }
    }
    Ok(files)
}

/// Process every file below `dir`. The file list is collected before
/// anything is renamed, so a renamed file is never visited twice.
pub fn rename_dir(dir: &Path, config: &RenameConfig) -> Result<Vec<RenameOutcome>> {
    let files = collect_files(dir)?;
    debug!("{} files found under '{}'", files.len(), dir.display());
    Ok(files.iter().map(|path| rename_path(path, config)).collect())
}
