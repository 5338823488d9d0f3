//! Working tree status snapshots
//!
//! Parsed from `git status --porcelain -z`: one NUL-terminated `XY path`
//! entry per changed file. Paths are raw, never C-quoted.

use serde::Serialize;

use crate::{Error, Result};

/// Point-in-time classification of changed paths
///
/// Each path lands in exactly one list. When a path has both staged and
/// unstaged modifications (`MM`, `AM`) it is filed under
/// `unstaged_modified`, since it still needs staging before it can be
/// committed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkingTreeStatus {
    pub staged_modified: Vec<String>,
    pub staged_added: Vec<String>,
    pub unstaged_modified: Vec<String>,
    pub untracked: Vec<String>,
}

impl WorkingTreeStatus {
    /// Parse NUL-separated porcelain status output
    pub fn parse(output: &str) -> Result<Self> {
        let mut status = Self::default();
        for entry in output.split('\0').filter(|entry| !entry.is_empty()) {
            status.parse_line(entry)?;
        }
        Ok(status)
    }

    fn parse_line(&mut self, line: &str) -> Result<()> {
        let malformed = || Error::MalformedStatusLine {
            line: line.to_string(),
        };

        let bytes = line.as_bytes();
        if bytes.len() < 4 || bytes[2] != b' ' {
            return Err(malformed());
        }
        let path = line[3..].to_string();

        let list = match (bytes[0], bytes[1]) {
            (b'?', b'?') => &mut self.untracked,
            (b' ' | b'M' | b'A', b'M') => &mut self.unstaged_modified,
            (b'M', b' ') => &mut self.staged_modified,
            (b'A', b' ') => &mut self.staged_added,
            _ => return Err(malformed()),
        };
        list.push(path);

        Ok(())
    }

    /// Unstaged modifications or untracked files exist
    pub fn needs_staging(&self) -> bool {
        !self.unstaged_modified.is_empty() || !self.untracked.is_empty()
    }

    /// Anything at all would end up in a commit
    pub fn needs_commit(&self) -> bool {
        self.needs_staging() || !self.staged_modified.is_empty() || !self.staged_added.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        !self.needs_commit()
    }

    /// Every changed path, list by list
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.staged_modified
            .iter()
            .chain(&self.staged_added)
            .chain(&self.unstaged_modified)
            .chain(&self.untracked)
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_parse_each_code() {
        let output = "M  staged.txt\0A  added.txt\0 M dirty.txt\0?? new.txt\0";
        let status = WorkingTreeStatus::parse(output).unwrap();

        assert_eq!(status.staged_modified, vec!["staged.txt"]);
        assert_eq!(status.staged_added, vec!["added.txt"]);
        assert_eq!(status.unstaged_modified, vec!["dirty.txt"]);
        assert_eq!(status.untracked, vec!["new.txt"]);
    }

    #[test]
    fn test_empty_output_is_clean() {
        let status = WorkingTreeStatus::parse("").unwrap();
        assert!(status.is_clean());
        assert!(!status.needs_staging());
        assert!(!status.needs_commit());
    }

    #[test]
    fn test_staged_only_needs_commit_not_staging() {
        let status = WorkingTreeStatus::parse("M  a.txt\0A  b.txt\0").unwrap();
        assert!(!status.needs_staging());
        assert!(status.needs_commit());
    }

    #[test]
    fn test_untracked_needs_staging() {
        let status = WorkingTreeStatus::parse("?? notes/todo.md\0").unwrap();
        assert!(status.needs_staging());
        assert!(status.needs_commit());
    }

    #[test]
    fn test_each_path_in_exactly_one_list() {
        let output = "MM both.txt\0AM added-then-edited.txt\0M  a.txt\0 M b.txt\0A  c.txt\0?? d.txt\0";
        let status = WorkingTreeStatus::parse(output).unwrap();

        let paths: Vec<&str> = status.paths().collect();
        let unique: HashSet<&str> = paths.iter().copied().collect();
        assert_eq!(paths.len(), 6);
        assert_eq!(unique.len(), 6);
        assert!(status.unstaged_modified.contains(&"both.txt".to_string()));
        assert!(status.unstaged_modified.contains(&"added-then-edited.txt".to_string()));
    }

    #[test]
    fn test_entries_split_on_nul_not_newline() {
        let status = WorkingTreeStatus::parse(" M odd\nname.txt\0?? café.txt\0").unwrap();
        assert_eq!(status.unstaged_modified, vec!["odd\nname.txt"]);
        assert_eq!(status.untracked, vec!["café.txt"]);
    }

    #[test]
    fn test_unknown_codes_rejected() {
        for line in [" D gone.txt", "D  gone.txt", "R  a -> b", "UU conflict.txt", "   blank.txt"] {
            let err = WorkingTreeStatus::parse(line).unwrap_err();
            assert!(
                matches!(err, Error::MalformedStatusLine { .. }),
                "expected parse error for {:?}",
                line
            );
        }
    }

    #[test]
    fn test_truncated_line_rejected() {
        assert!(WorkingTreeStatus::parse("??").is_err());
        assert!(WorkingTreeStatus::parse("M").is_err());
        assert!(WorkingTreeStatus::parse("MMfile").is_err());
    }
}
