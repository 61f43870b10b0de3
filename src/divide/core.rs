use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::common::lines::count_lines;
use crate::common::{Error, IoResultExt, Result};

/// Upper bound on the number of parts one run may create.
pub const MAX_PARTS: u64 = 1_000_000;

/// Configuration for divide-list.
#[derive(Clone, Debug)]
pub struct DivideConfig {
    /// Number of output files to produce, from 1 to [`MAX_PARTS`].
    pub parts: u64,
    /// Directory receiving the part files; created if missing.
    pub output_dir: PathBuf,
    /// Log every part file as it is created.
    pub verbose: bool,
}

impl Default for DivideConfig {
    fn default() -> Self {
        Self {
            parts: 1,
            output_dir: PathBuf::from("."),
            verbose: false,
        }
    }
}

/// What a completed divide run produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DivideReport {
    pub total_lines: u64,
    pub lines_per_part: u64,
    pub parts: Vec<PathBuf>,
}

/// Per-part capacity: `ceil(total / parts)`, zero for an empty input.
pub fn lines_per_part(total_lines: u64, parts: u64) -> u64 {
    if parts == 0 {
        return 0;
    }
    total_lines.div_ceil(parts)
}

/// Name of part `index` (0-based) out of `parts`:
/// `<stem>_part_<NN>.txt`, index 1-based and zero-padded to the width of `parts`.
pub fn part_file_name(stem: &str, index: u64, parts: u64) -> String {
    let width = parts.to_string().len();
    format!("{}_part_{:0>width$}.txt", stem, index + 1, width = width)
}

/// File stem shared by every part name; `big_list.txt` gives `big_list`.
fn part_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Buffered writer for one part file.
struct PartWriter {
    writer: BufWriter<File>,
}

impl PartWriter {
    fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::with_capacity(256 * 1024, file),
        })
    }

    fn finish(mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl Write for PartWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Copy up to `limit` lines from `reader` to `writer`.
///
/// Scans whole buffers with memchr and writes contiguous multi-line slices.
/// Never consumes input past the last copied line. An unterminated final
/// input line is written with a newline appended. Returns the number of
/// lines copied.
pub fn copy_lines(reader: &mut dyn BufRead, writer: &mut dyn Write, limit: u64) -> io::Result<u64> {
    let mut copied: u64 = 0;
    let mut open_line = false;

    while copied < limit {
        let available = match reader.fill_buf() {
            Ok([]) => break,
            Ok(b) => b,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        let needed = limit - copied;
        let mut found: u64 = 0;
        let mut end = available.len();
        for offset in memchr::memchr_iter(b'\n', available) {
            found += 1;
            if found == needed {
                end = offset + 1;
                break;
            }
        }

        writer.write_all(&available[..end])?;
        open_line = available[end - 1] != b'\n';
        copied += found;
        reader.consume(end);
    }

    // Only reachable at end of input: a full part always ends on a newline
    if open_line {
        writer.write_all(b"\n")?;
        copied += 1;
    }
    Ok(copied)
}

fn open_input(input: &Path) -> Result<BufReader<File>> {
    let file = File::open(input).with_path(input)?;
    #[cfg(target_os = "linux")]
    {
        use std::os::unix::io::AsRawFd;
        unsafe {
            libc::posix_fadvise(file.as_raw_fd(), 0, 0, libc::POSIX_FADV_SEQUENTIAL);
        }
    }
    Ok(BufReader::with_capacity(1024 * 1024, file))
}

/// Split `input` into exactly `config.parts` files of contiguous lines.
///
/// Two streaming passes: the first counts lines, the second fills part
/// after part with `ceil(total / parts)` lines each. Parts past the end of
/// the input are still created, empty. Nothing is created when the input
/// cannot be read.
pub fn divide(input: &Path, config: &DivideConfig) -> Result<DivideReport> {
    if !(1..=MAX_PARTS).contains(&config.parts) {
        return Err(Error::usage(format!(
            "number of parts must be between 1 and {} (got {})",
            MAX_PARTS, config.parts
        )));
    }

    let meta = fs::metadata(input).with_path(input)?;
    if meta.is_dir() {
        return Err(Error::io(input, io::Error::from(io::ErrorKind::IsADirectory)));
    }

    let total_lines = {
        let mut reader = open_input(input)?;
        count_lines(&mut reader).with_path(input)?
    };

    if total_lines == 0 {
        warn!(
            "input file '{}' is empty; creating {} empty parts",
            input.display(),
            config.parts
        );
    }

    let per_part = lines_per_part(total_lines, config.parts);
    info!(
        "input file '{}' ({} lines): dividing into {} parts of up to {} lines in '{}'",
        input.display(),
        total_lines,
        config.parts,
        per_part,
        config.output_dir.display()
    );

    if config.output_dir.exists() && !config.output_dir.is_dir() {
        return Err(Error::io(
            &config.output_dir,
            io::Error::from(io::ErrorKind::NotADirectory),
        ));
    }
    fs::create_dir_all(&config.output_dir).with_path(&config.output_dir)?;

    let stem = part_stem(input);
    let mut paths = Vec::new();
    let mut reader = open_input(input)?;
    for index in 0..config.parts {
        let path = config
            .output_dir
            .join(part_file_name(&stem, index, config.parts));
        if config.verbose {
            info!("creating file '{}'", path.display());
        }
        let mut writer = PartWriter::create(&path).with_path(&path)?;
        let written = copy_lines(&mut reader, &mut writer, per_part).with_path(&path)?;
        writer.finish().with_path(&path)?;
        debug!("wrote {} lines to '{}'", written, path.display());
        paths.push(path);
    }

    info!(
        "done: {} files created in '{}'",
        paths.len(),
        config.output_dir.display()
    );

    Ok(DivideReport {
        total_lines,
        lines_per_part: per_part,
        parts: paths,
    })
}
