// GrepMark - core/filter.rs
//
// Include/exclude line filter.
// Matching is case-sensitive literal substring containment; the include
// and exclude predicates are AND-combined.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::{is_blank, WordLists};

/// Include and exclude word sets for one filter run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordFilter {
    /// A line survives only if it contains at least one of these
    /// (empty = no constraint).
    pub include: Vec<String>,

    /// A line is dropped if it contains any of these (empty = no constraint).
    pub exclude: Vec<String>,
}

impl WordFilter {
    /// Build a filter, discarding blank words.
    pub fn new(include: &[String], exclude: &[String]) -> Self {
        let keep = |words: &[String]| -> Vec<String> {
            words.iter().filter(|w| !is_blank(w)).cloned().collect()
        };
        Self {
            include: keep(include),
            exclude: keep(exclude),
        }
    }

    /// Filter built from the include/exclude lists of a profile body.
    pub fn from_lists(lists: &WordLists) -> Self {
        Self::new(&lists.include, &lists.exclude)
    }

    /// Returns true if no filters are active.
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Check a single line against both predicates.
    pub fn matches(&self, line: &str) -> bool {
        if !self.include.is_empty() && !self.include.iter().any(|w| line.contains(w.as_str())) {
            return false;
        }
        !self.exclude.iter().any(|w| line.contains(w.as_str()))
    }
}

/// Apply the filter to a slice of lines, returning indices of survivors.
///
/// Indices are in input order; duplicates are kept. An empty result is a
/// normal outcome meaning "no matches".
pub fn apply_filters<S: AsRef<str>>(lines: &[S], filter: &WordFilter) -> Vec<usize> {
    if filter.is_empty() {
        return (0..lines.len()).collect();
    }

    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| filter.matches(line.as_ref()))
        .map(|(idx, _)| idx)
        .collect()
}

/// Apply the filter and return the surviving lines themselves.
pub fn filter_lines<'a, S: AsRef<str>>(lines: &'a [S], filter: &WordFilter) -> Vec<&'a str> {
    apply_filters(lines, filter)
        .into_iter()
        .map(|idx| lines[idx].as_ref())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_filter_returns_all_in_order() {
        let lines = ["b", "a", "b", ""];
        let result = filter_lines(&lines, &WordFilter::default());
        assert_eq!(result, vec!["b", "a", "b", ""]);
    }

    #[test]
    fn test_include_only_needs_one_word() {
        let lines = ["ERROR disk", "WARN net", "INFO ok"];
        let filter = WordFilter::new(&words(&["ERROR", "WARN"]), &[]);
        assert_eq!(apply_filters(&lines, &filter), vec![0, 1]);
    }

    #[test]
    fn test_exclude_only_drops_any_match() {
        let lines = ["ERROR disk", "WARN net", "INFO ok"];
        let filter = WordFilter::new(&[], &words(&["disk", "net"]));
        assert_eq!(filter_lines(&lines, &filter), vec!["INFO ok"]);
    }

    #[test]
    fn test_include_and_exclude_combined() {
        let lines = ["alpha", "beta", "alpha beta"];
        let filter = WordFilter::new(&words(&["alpha"]), &words(&["beta"]));
        assert_eq!(filter_lines(&lines, &filter), vec!["alpha"]);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let lines = ["Error", "error"];
        let filter = WordFilter::new(&words(&["error"]), &[]);
        assert_eq!(apply_filters(&lines, &filter), vec![1]);
    }

    #[test]
    fn test_duplicates_survive() {
        let lines = ["x", "x", "y"];
        let filter = WordFilter::new(&words(&["x"]), &[]);
        assert_eq!(filter_lines(&lines, &filter), vec!["x", "x"]);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let lines = ["a", "b"];
        let filter = WordFilter::new(&words(&["zzz"]), &[]);
        assert!(apply_filters(&lines, &filter).is_empty());
    }

    /// Blank words would match every line; they must be dropped instead.
    #[test]
    fn test_blank_words_are_ignored() {
        let lines = ["a", "b"];
        let filter = WordFilter::new(&words(&["", "  "]), &words(&[""]));
        assert!(filter.is_empty());
        assert_eq!(apply_filters(&lines, &filter), vec![0, 1]);
    }

    /// Every survivor satisfies the predicate and every line that satisfies
    /// it survives, in order.
    #[test]
    fn test_output_is_exactly_the_satisfying_lines() {
        let lines = [
            "GET /a 200",
            "GET /b 500",
            "POST /a 200",
            "POST /c 404",
            "PUT /a 500",
        ];
        let include = words(&["/a", "404"]);
        let exclude = words(&["500"]);
        let filter = WordFilter::new(&include, &exclude);
        let expected: Vec<&str> = lines
            .iter()
            .copied()
            .filter(|l| include.iter().any(|w| l.contains(w.as_str())))
            .filter(|l| !exclude.iter().any(|w| l.contains(w.as_str())))
            .collect();
        assert_eq!(filter_lines(&lines, &filter), expected);
        assert_eq!(expected, vec!["GET /a 200", "POST /a 200", "POST /c 404"]);
    }
}
