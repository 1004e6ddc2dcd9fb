//! Passphrase candidate sources for the recovery search.
//!
//! Candidates come as a bounded, caller-ordered list - typically a curated
//! common-password file, not exhaustive enumeration. The search naturally
//! stops when the list is exhausted, so capping duration is just capping the
//! list.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// An in-memory, ordered passphrase candidate list.
#[derive(Debug, Clone)]
pub struct PassphraseList {
    entries: Vec<String>,
}

impl PassphraseList {
    /// Load candidates from a file, one per line, trimmed, empties dropped.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("cannot open wordlist {}", path.display()))?;
        Ok(Self::from_reader(BufReader::new(file)))
    }

    /// Read candidates from stdin until EOF.
    pub fn from_stdin() -> Self {
        Self::from_reader(BufReader::new(std::io::stdin()))
    }

    fn from_reader<R: Read>(reader: BufReader<R>) -> Self {
        let entries: Vec<String> = reader
            .lines()
            .filter_map(std::result::Result::ok)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Self { entries }
    }

    /// Build from an already-collected list (tests, library callers).
    pub fn from_vec(entries: Vec<String>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

impl<'a> IntoIterator for &'a PassphraseList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_file_trims_and_drops_empty_lines() {
        let dir = std::env::temp_dir();
        let path = dir.join("bitxtract_wordlist_test.txt");
        {
            let mut f = File::create(&path).unwrap();
            writeln!(f, "  hunter2  ").unwrap();
            writeln!(f).unwrap();
            writeln!(f, "correct horse battery staple").unwrap();
            writeln!(f, "   ").unwrap();
        }

        let list = PassphraseList::from_file(&path).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.entries()[0], "hunter2");
        assert_eq!(list.entries()[1], "correct horse battery staple");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = PassphraseList::from_file(Path::new("/nonexistent/wordlist")).unwrap_err();
        assert!(err.to_string().contains("wordlist"));
    }

    #[test]
    fn test_iteration_order_is_preserved() {
        let list = PassphraseList::from_vec(vec!["a".into(), "b".into(), "c".into()]);
        let collected: Vec<&String> = (&list).into_iter().collect();
        assert_eq!(collected, [&"a".to_string(), &"b".to_string(), &"c".to_string()]);
    }
}
