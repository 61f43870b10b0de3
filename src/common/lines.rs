use std::io::{self, BufRead};

/// Split data into lines on `\n`, using SIMD-accelerated scanning.
/// Does NOT include a trailing empty line if data ends with the delimiter.
pub fn split_lines(data: &[u8]) -> Vec<&[u8]> {
    if data.is_empty() {
        return Vec::new();
    }
    let count = memchr::memchr_iter(b'\n', data).count();
    let has_trailing = data.last() == Some(&b'\n');
    let cap = if has_trailing { count } else { count + 1 };
    let mut lines = Vec::with_capacity(cap);
    let mut start = 0;
    for pos in memchr::memchr_iter(b'\n', data) {
        lines.push(&data[start..pos]);
        start = pos + 1;
    }
    if start < data.len() {
        lines.push(&data[start..]);
    }
    lines
}

/// Count lines in a stream without holding more than one buffer in memory.
/// A final line without a terminating newline still counts.
pub fn count_lines(reader: &mut dyn BufRead) -> io::Result<u64> {
    let mut count: u64 = 0;
    let mut last: Option<u8> = None;
    loop {
        let available = match reader.fill_buf() {
            Ok([]) => break,
            Ok(b) => b,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        count += memchr::memchr_iter(b'\n', available).count() as u64;
        last = available.last().copied();
        let len = available.len();
        reader.consume(len);
    }
    if matches!(last, Some(b) if b != b'\n') {
        count += 1;
    }
    Ok(count)
}

/// Read the next line into `buf` (cleared first), without its newline.
/// Returns `Ok(None)` at end of input, otherwise whether the line was
/// terminated by `\n`.
pub fn next_line(reader: &mut dyn BufRead, buf: &mut Vec<u8>) -> io::Result<Option<bool>> {
    buf.clear();
    let n = reader.read_until(b'\n', buf)?;
    if n == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        Ok(Some(true))
    } else {
        Ok(Some(false))
    }
}
