use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use tracing::debug;

use crate::affix::Trim;
use crate::common::lines::next_line;
use crate::common::{IoResultExt, Result};

/// Configuration for diff-list.
#[derive(Clone, Debug, Default)]
pub struct DiffConfig {
    /// Print only the three summary counts instead of the missing lines.
    pub count_only: bool,
    /// Normalization applied to every line of FILE1.
    pub trim1: Trim,
    /// Normalization applied to every line of FILE2.
    pub trim2: Trim,
}

/// Line counts gathered while diffing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub lines1: u64,
    pub lines2: u64,
    pub missing: u64,
}

/// Drop the `\r` of a CRLF line ending so CRLF and LF lists compare equal.
#[inline]
fn strip_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Read every line of `reader`, trimmed, into a set. Returns the set and the
/// number of lines read (duplicates included).
pub fn load_line_set(reader: &mut dyn BufRead, trim: &Trim) -> io::Result<(HashSet<Vec<u8>>, u64)> {
    let mut set = HashSet::new();
    let mut count: u64 = 0;
    let mut line = Vec::new();
    while next_line(reader, &mut line)?.is_some() {
        set.insert(trim.apply(strip_cr(&line)).to_vec());
        count += 1;
    }
    Ok((set, count))
}

/// Report the lines of the first input that are absent from the second.
///
/// The second input is loaded into a set; the first is streamed. Missing
/// lines are written to `out` in their trimmed form, one per line, in input
/// order (duplicates included), unless `count_only` is set. `label1` and
/// `label2` name the inputs in error messages.
pub fn diff_readers(
    reader1: &mut dyn BufRead,
    label1: &Path,
    reader2: &mut dyn BufRead,
    label2: &Path,
    config: &DiffConfig,
    out: &mut dyn Write,
) -> Result<DiffSummary> {
    let (set, lines2) = load_line_set(reader2, &config.trim2).with_path(label2)?;
    debug!("{} distinct lines in '{}'", set.len(), label2.display());

    let mut summary = DiffSummary {
        lines2,
        ..DiffSummary::default()
    };
    let mut line = Vec::new();
    while next_line(reader1, &mut line).with_path(label1)?.is_some() {
        summary.lines1 += 1;
        let key = config.trim1.apply(strip_cr(&line));
        if set.contains(key) {
            continue;
        }
        summary.missing += 1;
        if !config.count_only {
            out.write_all(key)
                .and_then(|_| out.write_all(b"\n"))
                .with_path("standard output")?;
        }
    }
    Ok(summary)
}

/// Open both files and run [`diff_readers`].
pub fn diff_files(
    file1: &Path,
    file2: &Path,
    config: &DiffConfig,
    out: &mut dyn Write,
) -> Result<DiffSummary> {
    let mut reader2 = BufReader::with_capacity(256 * 1024, File::open(file2).with_path(file2)?);
    let mut reader1 = BufReader::with_capacity(256 * 1024, File::open(file1).with_path(file1)?);
    diff_readers(&mut reader1, file1, &mut reader2, file2, config, out)
}

/// Write the `--count` report.
pub fn write_summary(
    out: &mut dyn Write,
    name1: &str,
    name2: &str,
    summary: &DiffSummary,
) -> io::Result<()> {
    writeln!(out, "lines in {}: {}", name1, summary.lines1)?;
    writeln!(out, "lines in {}: {}", name2, summary.lines2)?;
    writeln!(
        out,
        "lines in {} missing in {}: {}",
        name1, name2, summary.missing
    )
}
