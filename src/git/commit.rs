//! Commit history snapshots

use serde::Serialize;

use crate::{Error, Result};

/// `git log` format: full hash and subject separated by `|`
pub(crate) const LOG_FORMAT: &str = "--pretty=format:%H|%s";

/// Abbreviate a hash to its first seven characters
pub(crate) fn short_hash(hash: &str) -> &str {
    hash.get(..7).unwrap_or(hash)
}

/// A commit as reported by `git log`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Commit {
    pub hash: String,
    pub message: String,
}

impl Commit {
    pub fn new(hash: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            message: message.into(),
        }
    }

    /// First seven characters of the hash
    pub fn short_hash(&self) -> &str {
        short_hash(&self.hash)
    }

    /// Parse output produced with [`LOG_FORMAT`], newest first
    pub fn parse_log(output: &str) -> Result<Vec<Self>> {
        output
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(Self::parse_line)
            .collect()
    }

    fn parse_line(line: &str) -> Result<Self> {
        // Subjects may contain '|', hashes never do.
        match line.split_once('|') {
            Some((hash, message)) if is_hex_hash(hash) => Ok(Self::new(hash, message)),
            _ => Err(Error::MalformedCommitLine {
                line: line.to_string(),
            }),
        }
    }
}

fn is_hex_hash(hash: &str) -> bool {
    !hash.is_empty() && hash.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    const H1: &str = "1111111111111111111111111111111111111111";
    const H2: &str = "2222222222222222222222222222222222222222";

    #[test]
    fn test_parse_log_keeps_order() {
        let output = format!("{}|second\n{}|first", H2, H1);
        let commits = Commit::parse_log(&output).unwrap();

        assert_eq!(commits, vec![Commit::new(H2, "second"), Commit::new(H1, "first")]);
    }

    #[test]
    fn test_subject_may_contain_separator() {
        let output = format!("{}|fix a | b parsing", H1);
        let commits = Commit::parse_log(&output).unwrap();
        assert_eq!(commits[0].message, "fix a | b parsing");
    }

    #[test]
    fn test_empty_subject() {
        let commits = Commit::parse_log(&format!("{}|", H1)).unwrap();
        assert_eq!(commits[0].message, "");
    }

    #[test]
    fn test_malformed_lines() {
        assert!(matches!(
            Commit::parse_log("no separator here"),
            Err(Error::MalformedCommitLine { .. })
        ));
        assert!(matches!(
            Commit::parse_log("not-a-hash|message"),
            Err(Error::MalformedCommitLine { .. })
        ));
    }

    #[test]
    fn test_short_hash() {
        assert_eq!(Commit::new(H1, "m").short_hash(), "1111111");
        assert_eq!(Commit::new("abc", "m").short_hash(), "abc");
    }
}
