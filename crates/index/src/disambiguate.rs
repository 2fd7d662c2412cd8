//! Choosing one group ID among several that share an artifact ID.
//!
//! Different projects sometimes publish under the same artifact ID and
//! version, e.g. `javax.servlet:jstl:1.2` and `jstl:jstl:1.2`. The index can
//! only be asked "which group publishes `jstl` 1.2", so the answer has to be
//! picked from the candidates.
//!
//! The group that contributes the most indexed files for the artifact and
//! version wins. This is a **heuristic**: it assumes the canonical owner
//! publishes more variants (classifiers, rebuilt archives) than a squatter,
//! and it will misattribute ownership when the candidates are evenly split.
//! Equal counts are broken by taking the lexicographically smallest group ID,
//! so the result is at least reproducible.

use crate::models::IndexEntry;
use std::collections::BTreeMap;

/// Occurrence count per group ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally<'a> {
    counts: BTreeMap<&'a str, usize>,
}

impl<'a> Tally<'a> {
    pub fn new(group_ids: impl IntoIterator<Item = &'a str>) -> Self {
        let mut counts = BTreeMap::new();
        for group_id in group_ids {
            *counts.entry(group_id).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn from_entries(entries: &'a [IndexEntry]) -> Self {
        Self::new(entries.iter().map(|entry| entry.group_id.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn count(&self, group_id: &str) -> usize {
        self.counts.get(group_id).copied().unwrap_or(0)
    }

    fn max(&self) -> usize {
        self.counts.values().copied().max().unwrap_or(0)
    }

    /// All group IDs sharing the highest count, in ascending order.
    pub fn candidates(&self) -> Vec<&'a str> {
        let max = self.max();
        self.counts.iter().filter(|(_, count)| **count == max).map(|(group_id, _)| *group_id).collect()
    }

    /// More than one group ID shares the highest count.
    pub fn is_contested(&self) -> bool {
        self.candidates().len() > 1
    }

    /// The group ID with the highest count, ties going to the
    /// lexicographically smallest.
    pub fn winner(&self) -> Option<&'a str> {
        // BTreeMap iterates in ascending key order, and only a strictly
        // greater count replaces the current best.
        self.counts
            .iter()
            .fold(None, |best: Option<(&'a str, usize)>, (group_id, count)| match best {
                Some((_, max)) if max >= *count => best,
                _ => Some((*group_id, *count)),
            })
            .map(|(group_id, _)| group_id)
    }
}

/// Pick the group ID for a set of entries sharing an artifact ID and version.
///
/// Returns `None` only when `entries` is empty.
pub fn select_group_id(entries: &[IndexEntry]) -> Option<&str> {
    Tally::from_entries(entries).winner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FileType;
    use rstest::rstest;

    fn entries(group_ids: &[&str]) -> Vec<IndexEntry> {
        group_ids
            .iter()
            .enumerate()
            .map(|(i, group_id)| IndexEntry::new(*group_id, "jstl", "1.2", format!("{i:040x}"), FileType::Jar))
            .collect()
    }

    #[rstest]
    #[case(&["javax.servlet", "jstl", "javax.servlet"], Some("javax.servlet"))]
    #[case(&["jstl", "javax.servlet", "jstl"], Some("jstl"))]
    #[case(&["org.example"], Some("org.example"))]
    #[case(&[], None)]
    // Ties go to the lexicographically smallest group ID, whatever the input order.
    #[case(&["jstl", "javax.servlet"], Some("javax.servlet"))]
    #[case(&["javax.servlet", "jstl"], Some("javax.servlet"))]
    #[case(&["zzz", "b", "a", "zzz", "b", "a"], Some("a"))]
    #[case(&["zzz", "b", "a", "zzz", "b"], Some("b"))]
    fn test_select_group_id(#[case] group_ids: &[&str], #[case] expected: Option<&str>) {
        assert_eq!(select_group_id(&entries(group_ids)), expected);
    }

    #[test]
    fn test_tally() {
        let entries = entries(&["javax.servlet", "jstl", "javax.servlet", "org.example", "jstl"]);
        let tally = Tally::from_entries(&entries);
        assert_eq!(tally.count("javax.servlet"), 2);
        assert_eq!(tally.count("jstl"), 2);
        assert_eq!(tally.count("org.example"), 1);
        assert_eq!(tally.count("missing"), 0);
        assert_eq!(tally.candidates(), vec!["javax.servlet", "jstl"]);
        assert!(tally.is_contested());
        assert_eq!(tally.winner(), Some("javax.servlet"));
    }

    #[test]
    fn test_uncontested() {
        let tally = Tally::new(["javax.servlet", "javax.servlet", "jstl"]);
        assert!(!tally.is_contested());
        assert_eq!(tally.candidates(), vec!["javax.servlet"]);
    }

    #[test]
    fn test_empty() {
        let tally = Tally::default();
        assert!(tally.is_empty());
        assert!(tally.candidates().is_empty());
        assert!(!tally.is_contested());
        assert_eq!(tally.winner(), None);
    }
}
