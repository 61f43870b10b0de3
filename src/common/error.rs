use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::io_error_msg;

/// Errors returned by the library layer. Binaries turn these into a
/// `tool: message` line on stderr and exit status 1.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad arguments detected before any file is touched.
    #[error("{0}")]
    Usage(String),

    #[error("invalid regular expression '{pattern}': {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("{}: {}", path.display(), io_error_msg(source))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn usage(msg: impl Into<String>) -> Self {
        Error::Usage(msg.into())
    }

    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Attach the offending path to an `io::Result`.
pub trait IoResultExt<T> {
    fn with_path(self, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path(self, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|e| Error::io(path, e))
    }
}
