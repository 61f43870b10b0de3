use std::fs;
use std::io::Write;
use std::path::Path;

use regex::bytes::Regex;
use tracing::info;

use crate::common::io::{FileData, read_file, read_file_vec};
use crate::common::lines::split_lines;
use crate::common::{Error, IoResultExt, Result};

/// Configuration for pop-lines.
#[derive(Clone, Debug, Default)]
pub struct PopConfig {
    pub pattern: String,
    /// Rewrite the file without the matching lines.
    pub remove: bool,
}

/// Outcome of a pop-lines run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PopReport {
    pub matched: usize,
    pub kept: usize,
    /// Whether the file was rewritten.
    pub rewritten: bool,
}

/// Lines of a file split by whether they match the pattern.
#[derive(Debug, Default)]
pub struct FilterResult<'a> {
    pub matched: Vec<&'a [u8]>,
    pub kept: Vec<&'a [u8]>,
    /// The input ended with `\n`.
    pub trailing_newline: bool,
}

impl FilterResult<'_> {
    /// Content of the file with the matching lines removed.
    ///
    /// Ends with `\n` iff the input did and something is kept.
    pub fn kept_content(&self) -> Vec<u8> {
        let len: usize = self.kept.iter().map(|l| l.len() + 1).sum();
        let mut out = Vec::with_capacity(len);
        for (i, line) in self.kept.iter().enumerate() {
            if i > 0 {
                out.push(b'\n');
            }
            out.extend_from_slice(line);
        }
        if self.trailing_newline && !self.kept.is_empty() {
            out.push(b'\n');
        }
        out
    }
}

/// Compile a user-supplied pattern.
pub fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| Error::Regex {
        pattern: pattern.to_string(),
        source,
    })
}

/// Partition `data` into matching and non-matching lines.
///
/// A final `\n` terminates the last line; it does not start an extra
/// empty one.
pub fn partition<'a>(data: &'a [u8], re: &Regex) -> FilterResult<'a> {
    let mut result = FilterResult {
        trailing_newline: data.last() == Some(&b'\n'),
        ..FilterResult::default()
    };
    for line in split_lines(data) {
        if re.is_match(line) {
            result.matched.push(line);
        } else {
            result.kept.push(line);
        }
    }
    result
}

/// Print the lines of `path` matching the pattern to `out`; with `remove`,
/// rewrite the file without them.
///
/// The pattern is compiled before the file is opened. A file with no
/// matching line is never rewritten.
pub fn pop_file(path: &Path, config: &PopConfig, out: &mut dyn Write) -> Result<PopReport> {
    let re = compile(&config.pattern)?;

    let data = if config.remove {
        FileData::Owned(read_file_vec(path).with_path(path)?)
    } else {
        read_file(path).with_path(path)?
    };

    let result = partition(&data, &re);
    for line in &result.matched {
        out.write_all(line)
            .and_then(|_| out.write_all(b"\n"))
            .with_path("standard output")?;
    }

    let mut report = PopReport {
        matched: result.matched.len(),
        kept: result.kept.len(),
        rewritten: false,
    };

    if report.matched == 0 {
        info!("no lines matched the regular expression");
        if config.remove {
            info!("nothing to remove; '{}' left unchanged", path.display());
        }
        return Ok(report);
    }

    if config.remove {
        let content = result.kept_content();
        fs::write(path, content).with_path(path)?;
        report.rewritten = true;
        info!(
            "removed {} matching line(s) from '{}'",
            report.matched,
            path.display()
        );
    }

    Ok(report)
}
