use super::*;
use crate::affix::AffixRules;
use std::fs;
use std::io::Cursor;
use std::path::Path;

fn rules(rmpre: &str, rmpos: &str, addpre: &str, addpos: &str) -> AffixRules {
    AffixRules {
        remove_prefix: rmpre.to_string(),
        remove_suffix: rmpos.to_string(),
        add_prefix: addpre.to_string(),
        add_suffix: addpos.to_string(),
    }
}

fn edit_str(input: &str, rules: &AffixRules) -> (String, u64) {
    let mut out = Vec::new();
    let n = edit_lines(
        &mut Cursor::new(input.as_bytes()),
        Path::new("input"),
        rules,
        &mut out,
        Path::new("output"),
    )
    .unwrap();
    (String::from_utf8(out).unwrap(), n)
}

#[test]
fn test_remove_prefix_add_suffix() {
    let (out, n) = edit_str("old_report.txt\n", &rules("old_", "", "", ".bak"));
    assert_eq!(out, "report.txt.bak\n");
    assert_eq!(n, 1);
}

#[test]
fn test_add_comment_prefix() {
    let (out, _) = edit_str("a = 1\nb = 2\n", &rules("", "", "// ", ""));
    assert_eq!(out, "// a = 1\n// b = 2\n");
}

#[test]
fn test_remove_suffix_only_where_present() {
    let (out, _) = edit_str("a.tmp\nb.txt\nc.tmp\n", &rules("", ".tmp", "", ""));
    assert_eq!(out, "a\nb.txt\nc\n");
}

#[test]
fn test_no_trailing_newline_preserved() {
    let (out, n) = edit_str("a\nb", &rules("", "", "<", ">"));
    assert_eq!(out, "<a>\n<b>");
    assert_eq!(n, 2);
}

#[test]
fn test_empty_input() {
    let (out, n) = edit_str("", &rules("", "", "x", "y"));
    assert_eq!(out, "");
    assert_eq!(n, 0);
}

#[test]
fn test_empty_lines_get_affixes() {
    let (out, _) = edit_str("\n\n", &rules("", "", "-", ""));
    assert_eq!(out, "-\n-\n");
}

#[test]
fn test_edit_bytes_matches_streaming() {
    let r = rules("x", "z", "[", "]");
    for input in ["", "xaz\n", "xaz\nb", "\n\nxz\n", "no newline"] {
        let (streamed, n1) = edit_str(input, &r);
        let (buffered, n2) = edit_bytes(input.as_bytes(), &r);
        assert_eq!(streamed.as_bytes(), &buffered[..], "input {:?}", input);
        assert_eq!(n1, n2);
    }
}

#[test]
fn test_edit_file_to_stdout_leaves_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("names.txt");
    fs::write(&path, "a.tmp\nb.tmp\n").unwrap();
    let config = EditConfig {
        rules: rules("", ".tmp", "", ""),
        in_place: false,
    };
    let mut out = Vec::new();
    assert_eq!(edit_file(&path, &config, &mut out).unwrap(), 2);
    assert_eq!(out, b"a\nb\n");
    assert_eq!(fs::read(&path).unwrap(), b"a.tmp\nb.tmp\n");
}

#[test]
fn test_edit_file_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("list.dat");
    fs::write(&path, "old_a\nold_b\nc\n").unwrap();
    let config = EditConfig {
        rules: rules("old_", "", "", ".new"),
        in_place: true,
    };
    let mut out = Vec::new();
    assert_eq!(edit_file(&path, &config, &mut out).unwrap(), 3);
    assert!(out.is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap(), "a.new\nb.new\nc.new\n");
}

#[cfg(unix)]
#[test]
fn test_edit_file_in_place_keeps_permissions() {
    use std::os::unix::fs::PermissionsExt;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("script.sh");
    fs::write(&path, "echo hi\n").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o750)).unwrap();
    let config = EditConfig {
        rules: rules("", "", "# ", ""),
        in_place: true,
    };
    edit_file(&path, &config, &mut Vec::new()).unwrap();
    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o750);
    assert_eq!(fs::read_to_string(&path).unwrap(), "# echo hi\n");
}

#[test]
fn test_edit_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let config = EditConfig::default();
    let err = edit_file(&dir.path().join("absent"), &config, &mut Vec::new()).unwrap_err();
    assert!(err.to_string().contains("absent"));
}

#[test]
fn test_edit_file_directory_rejected() {
    let dir = tempfile::tempdir().unwrap();
    for in_place in [false, true] {
        let config = EditConfig {
            rules: AffixRules::default(),
            in_place,
        };
        assert!(edit_file(dir.path(), &config, &mut Vec::new()).is_err());
    }
}

#[test]
fn test_edit_file_in_place_without_rules_skips_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("list.dat");
    fs::write(&path, "a\nb").unwrap();
    let before = fs::metadata(&path).unwrap().modified().unwrap();
    let config = EditConfig {
        rules: AffixRules::default(),
        in_place: true,
    };
    assert_eq!(edit_file(&path, &config, &mut Vec::new()).unwrap(), 2);
    assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb");
    assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), before);
}
