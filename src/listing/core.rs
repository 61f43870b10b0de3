use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::common::{Error, IoResultExt, Result};

/// Configuration for list-files.
#[derive(Clone, Debug, Default)]
pub struct ListConfig {
    /// Required file-name prefix (empty matches everything).
    pub prefix: String,
    /// Required file-name suffix (empty matches everything).
    pub suffix: String,
    pub recursive: bool,
}

impl ListConfig {
    #[inline]
    pub fn matches(&self, name: &[u8]) -> bool {
        name.starts_with(self.prefix.as_bytes()) && name.ends_with(self.suffix.as_bytes())
    }
}

#[cfg(unix)]
fn name_bytes(name: &std::ffi::OsStr) -> std::borrow::Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    std::borrow::Cow::Borrowed(name.as_bytes())
}

#[cfg(not(unix))]
fn name_bytes(name: &std::ffi::OsStr) -> std::borrow::Cow<'_, [u8]> {
    std::borrow::Cow::Owned(name.to_string_lossy().into_owned().into_bytes())
}

/// Strip trailing slashes, keeping a lone `/`. Rebuilt from components so
/// non UTF-8 names pass through unchanged.
fn strip_trailing_slashes(dir: &Path) -> PathBuf {
    dir.components().collect()
}

/// Files (not directories) under `dir` whose names match, sorted.
pub fn list_files(dir: &Path, config: &ListConfig) -> Result<Vec<PathBuf>> {
    let meta = fs::metadata(dir).with_path(dir)?;
    if !meta.is_dir() {
        return Err(Error::io(dir, io::Error::from(io::ErrorKind::NotADirectory)));
    }
    let root = strip_trailing_slashes(dir);

    let mut matched = Vec::new();
    if config.recursive {
        for entry in WalkDir::new(&root).min_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_dir() && config.matches(&name_bytes(entry.file_name())) {
                matched.push(entry.into_path());
            }
        }
    } else {
        for entry in fs::read_dir(&root).with_path(&root)? {
            let entry = entry.with_path(&root)?;
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if !is_dir && config.matches(&name_bytes(&entry.file_name())) {
                matched.push(root.join(entry.file_name()));
            }
        }
    }

    matched.sort();
    Ok(matched)
}
