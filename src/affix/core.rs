use std::ffi::{OsStr, OsString};

/// Prefix/suffix removal applied before comparing lines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Trim {
    pub prefix: String,
    pub suffix: String,
}

impl Trim {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// Strip the prefix, then the suffix. Each is removed at most once and
    /// only if present.
    #[inline]
    pub fn apply<'a>(&self, line: &'a [u8]) -> &'a [u8] {
        let line = line
            .strip_prefix(self.prefix.as_bytes())
            .unwrap_or(line);
        line.strip_suffix(self.suffix.as_bytes()).unwrap_or(line)
    }
}

/// Edit rules shared by edit-lines and rename-files.
///
/// Always applied in the order: remove prefix, remove suffix, add prefix,
/// add suffix. Empty strings are no-ops.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AffixRules {
    pub remove_prefix: String,
    pub remove_suffix: String,
    pub add_prefix: String,
    pub add_suffix: String,
}

impl AffixRules {
    /// True when applying the rules can never change anything.
    pub fn is_noop(&self) -> bool {
        self.remove_prefix.is_empty()
            && self.remove_suffix.is_empty()
            && self.add_prefix.is_empty()
            && self.add_suffix.is_empty()
    }

    /// Apply the rules to `line`, appending the result to `out`.
    #[inline]
    pub fn apply_into(&self, line: &[u8], out: &mut Vec<u8>) {
        let line = line
            .strip_prefix(self.remove_prefix.as_bytes())
            .unwrap_or(line);
        let line = line
            .strip_suffix(self.remove_suffix.as_bytes())
            .unwrap_or(line);
        out.reserve(self.add_prefix.len() + line.len() + self.add_suffix.len());
        out.extend_from_slice(self.add_prefix.as_bytes());
        out.extend_from_slice(line);
        out.extend_from_slice(self.add_suffix.as_bytes());
    }

    pub fn apply(&self, line: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        self.apply_into(line, &mut out);
        out
    }

    /// Apply the rules to a file name.
    #[cfg(unix)]
    pub fn apply_os(&self, name: &OsStr) -> OsString {
        use std::os::unix::ffi::{OsStrExt, OsStringExt};
        OsString::from_vec(self.apply(name.as_bytes()))
    }

    /// Apply the rules to a file name.
    #[cfg(not(unix))]
    pub fn apply_os(&self, name: &OsStr) -> OsString {
        let name = name.to_string_lossy();
        let out = self.apply(name.as_bytes());
        OsString::from(String::from_utf8_lossy(&out).into_owned())
    }
}
