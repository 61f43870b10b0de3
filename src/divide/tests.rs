use super::*;
use crate::common::Error;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use proptest::prelude::*;

// ---- Helper functions ----

/// Create a test file with the given content in the given directory and return its path.
fn create_test_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn config(parts: u64, output_dir: &Path) -> DivideConfig {
    DivideConfig {
        parts,
        output_dir: output_dir.to_path_buf(),
        verbose: false,
    }
}

/// Read every part file in part order.
fn read_parts(report: &DivideReport) -> Vec<Vec<u8>> {
    report.parts.iter().map(|p| fs::read(p).unwrap()).collect()
}

fn count(data: &[u8]) -> usize {
    memchr::memchr_iter(b'\n', data).count()
}

fn numbered_lines(n: usize) -> String {
    (1..=n).map(|i| format!("line {}\n", i)).collect()
}

// ---- Capacity and naming ----

#[test]
fn test_lines_per_part() {
    assert_eq!(lines_per_part(10, 3), 4);
    assert_eq!(lines_per_part(9, 3), 3);
    assert_eq!(lines_per_part(2, 5), 1);
    assert_eq!(lines_per_part(0, 4), 0);
    assert_eq!(lines_per_part(7, 1), 7);
}

#[test]
fn test_part_file_name_padding() {
    assert_eq!(part_file_name("list", 0, 3), "list_part_1.txt");
    assert_eq!(part_file_name("list", 0, 12), "list_part_01.txt");
    assert_eq!(part_file_name("list", 11, 12), "list_part_12.txt");
    assert_eq!(part_file_name("list", 4, 100), "list_part_005.txt");
}

#[test]
fn test_part_names_use_input_stem() {
    let dir = tempfile::tempdir().unwrap();
    let input = create_test_file(dir.path(), "big_list.txt", b"a\nb\n");
    let out = dir.path().join("out");
    let report = divide(&input, &config(2, &out)).unwrap();
    assert_eq!(
        report.parts,
        vec![out.join("big_list_part_1.txt"), out.join("big_list_part_2.txt")]
    );
}

// ---- copy_lines ----

#[test]
fn test_copy_lines_stops_at_limit() {
    let mut reader = Cursor::new(&b"a\nb\nc\n"[..]);
    let mut out = Vec::new();
    assert_eq!(copy_lines(&mut reader, &mut out, 2).unwrap(), 2);
    assert_eq!(out, b"a\nb\n");
    // The third line is still there for the next part
    let mut rest = Vec::new();
    assert_eq!(copy_lines(&mut reader, &mut rest, 2).unwrap(), 1);
    assert_eq!(rest, b"c\n");
}

#[test]
fn test_copy_lines_terminates_last_line() {
    let mut reader = Cursor::new(&b"a\nb"[..]);
    let mut out = Vec::new();
    assert_eq!(copy_lines(&mut reader, &mut out, 5).unwrap(), 2);
    assert_eq!(out, b"a\nb\n");
}

#[test]
fn test_copy_lines_zero_limit() {
    let mut reader = Cursor::new(&b"a\n"[..]);
    let mut out = Vec::new();
    assert_eq!(copy_lines(&mut reader, &mut out, 0).unwrap(), 0);
    assert!(out.is_empty());
}

#[test]
fn test_copy_lines_across_small_buffers() {
    let data = b"alpha\nbeta\ngamma\ndelta\n";
    let mut reader = std::io::BufReader::with_capacity(4, &data[..]);
    let mut first = Vec::new();
    let mut second = Vec::new();
    assert_eq!(copy_lines(&mut reader, &mut first, 3).unwrap(), 3);
    assert_eq!(copy_lines(&mut reader, &mut second, 3).unwrap(), 1);
    assert_eq!(first, b"alpha\nbeta\ngamma\n");
    assert_eq!(second, b"delta\n");
}

// ---- divide ----

#[test]
fn test_ten_lines_three_parts() {
    let dir = tempfile::tempdir().unwrap();
    let input = create_test_file(dir.path(), "list.txt", numbered_lines(10).as_bytes());
    let out = dir.path().join("parts");
    let report = divide(&input, &config(3, &out)).unwrap();

    assert_eq!(report.total_lines, 10);
    assert_eq!(report.lines_per_part, 4);
    let parts = read_parts(&report);
    let sizes: Vec<usize> = parts.iter().map(|p| count(p)).collect();
    assert_eq!(sizes, vec![4, 4, 2]);
    assert_eq!(parts.concat(), numbered_lines(10).as_bytes());
}

#[test]
fn test_creates_output_directory() {
    let dir = tempfile::tempdir().unwrap();
    let input = create_test_file(dir.path(), "in.txt", b"a\nb\n");
    let out = dir.path().join("nested").join("deeper");
    divide(&input, &config(2, &out)).unwrap();
    assert!(out.is_dir());
    assert_eq!(fs::read(out.join("in_part_1.txt")).unwrap(), b"a\n");
    assert_eq!(fs::read(out.join("in_part_2.txt")).unwrap(), b"b\n");
}

#[test]
fn test_more_parts_than_lines_creates_all_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = create_test_file(dir.path(), "in.txt", b"x\ny\n");
    let out = dir.path().join("out");
    let report = divide(&input, &config(5, &out)).unwrap();

    assert_eq!(report.parts.len(), 5);
    let parts = read_parts(&report);
    assert_eq!(parts[0], b"x\n");
    assert_eq!(parts[1], b"y\n");
    for p in &parts[2..] {
        assert!(p.is_empty());
    }
    assert_eq!(fs::read_dir(&out).unwrap().count(), 5);
}

#[test]
fn test_empty_input_creates_empty_parts() {
    let dir = tempfile::tempdir().unwrap();
    let input = create_test_file(dir.path(), "empty.txt", b"");
    let out = dir.path().join("out");
    let report = divide(&input, &config(3, &out)).unwrap();

    assert_eq!(report.total_lines, 0);
    assert_eq!(report.lines_per_part, 0);
    assert_eq!(report.parts.len(), 3);
    for p in read_parts(&report) {
        assert!(p.is_empty());
    }
}

#[test]
fn test_unterminated_last_line_gets_newline() {
    let dir = tempfile::tempdir().unwrap();
    let input = create_test_file(dir.path(), "in.txt", b"1\n2\n3");
    let out = dir.path().join("out");
    let report = divide(&input, &config(2, &out)).unwrap();
    let parts = read_parts(&report);
    assert_eq!(parts[0], b"1\n2\n");
    assert_eq!(parts[1], b"3\n");
}

#[test]
fn test_empty_lines_preserved() {
    let dir = tempfile::tempdir().unwrap();
    let input = create_test_file(dir.path(), "in.txt", b"\n\na\n\n");
    let out = dir.path().join("out");
    let report = divide(&input, &config(2, &out)).unwrap();
    let parts = read_parts(&report);
    assert_eq!(parts[0], b"\n\n");
    assert_eq!(parts[1], b"a\n\n");
}

#[test]
fn test_single_part_copies_everything() {
    let dir = tempfile::tempdir().unwrap();
    let input = create_test_file(dir.path(), "in.txt", b"a\nb\nc\n");
    let out = dir.path().join("out");
    let report = divide(&input, &config(1, &out)).unwrap();
    assert_eq!(read_parts(&report), vec![b"a\nb\nc\n".to_vec()]);
}

#[test]
fn test_zero_parts_is_usage_error_without_side_effects() {
    let dir = tempfile::tempdir().unwrap();
    let input = create_test_file(dir.path(), "in.txt", b"a\n");
    let out = dir.path().join("out");
    let err = divide(&input, &config(0, &out)).unwrap_err();
    assert!(matches!(err, Error::Usage(_)));
    assert!(!out.exists());
}

#[test]
fn test_too_many_parts_is_usage_error_without_side_effects() {
    let dir = tempfile::tempdir().unwrap();
    let input = create_test_file(dir.path(), "in.txt", b"a\n");
    let out = dir.path().join("out");
    for parts in [MAX_PARTS + 1, u64::MAX] {
        let err = divide(&input, &config(parts, &out)).unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
        assert!(err.to_string().contains(&parts.to_string()));
    }
    assert!(!out.exists());
}

#[test]
fn test_missing_input_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let err = divide(&dir.path().join("nope.txt"), &config(2, &out)).unwrap_err();
    assert!(err.to_string().contains("nope.txt"));
    assert!(!out.exists());
}

#[test]
fn test_directory_input_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    assert!(divide(dir.path(), &config(2, &out)).is_err());
    assert!(!out.exists());
}

#[test]
fn test_output_dir_is_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = create_test_file(dir.path(), "in.txt", b"a\n");
    let blocker = create_test_file(dir.path(), "blocker", b"");
    assert!(divide(&input, &config(2, &blocker)).is_err());
    assert_eq!(fs::read(&blocker).unwrap(), b"");
}

#[test]
fn test_input_not_modified() {
    let dir = tempfile::tempdir().unwrap();
    let input = create_test_file(dir.path(), "in.txt", b"keep\nme\n");
    divide(&input, &config(2, &dir.path().join("out"))).unwrap();
    assert_eq!(fs::read(&input).unwrap(), b"keep\nme\n");
}

#[test]
fn test_rerun_overwrites_previous_parts() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let input = create_test_file(dir.path(), "in.txt", b"a\nb\nc\nd\n");
    divide(&input, &config(2, &out)).unwrap();
    fs::write(&input, b"z\n").unwrap();
    let report = divide(&input, &config(2, &out)).unwrap();
    assert_eq!(read_parts(&report), vec![b"z\n".to_vec(), Vec::new()]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_parts_concatenate_to_input(
        lines in proptest::collection::vec("[a-z ]{0,12}", 1..60),
        parts in 1u64..12,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let content: String = lines.iter().map(|l| format!("{}\n", l)).collect();
        let input = create_test_file(dir.path(), "in.txt", content.as_bytes());
        let out = dir.path().join("out");
        let report = divide(&input, &config(parts, &out)).unwrap();

        prop_assert_eq!(report.parts.len() as u64, parts);
        let chunks = read_parts(&report);
        let total = lines.len();
        let cap = lines_per_part(total as u64, parts) as usize;
        // Parts fill greedily: each takes `cap` lines until the input runs out
        for (i, chunk) in chunks.iter().enumerate() {
            let expected = cap.min(total.saturating_sub(i * cap));
            prop_assert_eq!(count(chunk), expected);
        }
        prop_assert_eq!(chunks.concat(), content.into_bytes());
    }
}
