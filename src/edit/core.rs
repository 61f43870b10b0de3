use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use tracing::info;

use crate::affix::AffixRules;
use crate::common::io::read_file_vec;
use crate::common::lines::{count_lines, next_line};
use crate::common::{Error, IoResultExt, Result};

/// Configuration for edit-lines.
#[derive(Clone, Debug, Default)]
pub struct EditConfig {
    pub rules: AffixRules,
    /// Overwrite the source file instead of writing to stdout.
    pub in_place: bool,
}

/// Apply `rules` to every line read from `reader`, writing to `out`.
///
/// Every output line ends with `\n` except when the last input line had
/// none, so the output ends with a newline iff the input did.
/// Returns the number of lines processed.
pub fn edit_lines(
    reader: &mut dyn BufRead,
    input_label: &Path,
    rules: &AffixRules,
    out: &mut dyn Write,
    output_label: &Path,
) -> Result<u64> {
    let mut line = Vec::new();
    let mut edited = Vec::new();
    let mut processed: u64 = 0;

    while let Some(terminated) = next_line(reader, &mut line).with_path(input_label)? {
        edited.clear();
        rules.apply_into(&line, &mut edited);
        if terminated {
            edited.push(b'\n');
        }
        out.write_all(&edited).with_path(output_label)?;
        processed += 1;
    }
    Ok(processed)
}

/// Edit `data` in memory. Returns the new content and the line count.
pub fn edit_bytes(data: &[u8], rules: &AffixRules) -> (Vec<u8>, u64) {
    let mut out = Vec::with_capacity(data.len());
    let mut processed = 0;
    let mut start = 0;
    for pos in memchr::memchr_iter(b'\n', data) {
        rules.apply_into(&data[start..pos], &mut out);
        out.push(b'\n');
        start = pos + 1;
        processed += 1;
    }
    if start < data.len() {
        rules.apply_into(&data[start..], &mut out);
        processed += 1;
    }
    (out, processed)
}

/// Run edit-lines on one file: stream to `out`, or rewrite the file in place.
pub fn edit_file(path: &Path, config: &EditConfig, out: &mut dyn Write) -> Result<u64> {
    if config.in_place {
        let data = read_file_vec(path).with_path(path)?;
        if config.rules.is_noop() {
            let lines = count_lines(&mut &data[..]).with_path(path)?;
            info!("no edit rules given; '{}' left unchanged", path.display());
            return Ok(lines);
        }
        info!("modifying file '{}' in place", path.display());
        let (content, processed) = edit_bytes(&data, &config.rules);
        // Writing through the existing inode keeps the file's permissions
        fs::write(path, content).with_path(path)?;
        info!(
            "file '{}' modified ({} lines processed)",
            path.display(),
            processed
        );
        return Ok(processed);
    }

    let file = File::open(path).with_path(path)?;
    if file.metadata().with_path(path)?.is_dir() {
        return Err(Error::io(path, io::Error::from(io::ErrorKind::IsADirectory)));
    }
    let mut reader = BufReader::with_capacity(256 * 1024, file);
    edit_lines(
        &mut reader,
        path,
        &config.rules,
        out,
        Path::new("standard output"),
    )
}
