//! Result filters by change type and indicator.
//!
//! Both passes leave the input untouched and return a new `DirectoryMatches`
//! holding only files that still have at least one match.

use crate::models::{ChangeType, DirectoryMatches, FileMatches, Indicator, Match};
use std::collections::HashSet;

/// Parse a comma separated list of change types. Unknown tokens are dropped.
pub fn parse_types(list: &str) -> HashSet<ChangeType> {
    list.split(',').filter_map(|t| t.parse().ok()).collect()
}

/// Parse a comma separated list of indicators. Unknown tokens are dropped.
pub fn parse_indicators(list: &str) -> HashSet<Indicator> {
    list.split(',').filter_map(|t| t.parse().ok()).collect()
}

pub fn filter_by_type(matches: &DirectoryMatches, allowed: &HashSet<ChangeType>) -> DirectoryMatches {
    retain(matches, |m| allowed.contains(&m.change_type))
}

pub fn filter_by_indicator(
    matches: &DirectoryMatches,
    allowed: &HashSet<Indicator>,
) -> DirectoryMatches {
    retain(matches, |m| allowed.contains(&m.indicator))
}

fn retain<F>(matches: &DirectoryMatches, keep: F) -> DirectoryMatches
where
    F: Fn(&Match) -> bool,
{
    let mut out = DirectoryMatches::new(matches.path.clone());
    for file in &matches.files {
        let kept: Vec<Match> = file.matches.iter().filter(|m| keep(m)).cloned().collect();
        if !kept.is_empty() {
            out.files.push(FileMatches {
                path: file.path.clone(),
                matches: kept,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(t: ChangeType, i: Indicator, line: usize) -> Match {
        Match {
            change_type: t,
            indicator: i,
            rule_file: "Breaking-1-A.rst".into(),
            source_file: "/src/a.php".into(),
            line,
            message: String::new(),
        }
    }

    fn sample() -> DirectoryMatches {
        let mut d = DirectoryMatches::new("/src");
        let mut a = FileMatches::new("/src/a.php");
        a.matches = vec![
            m(ChangeType::Breaking, Indicator::Strong, 1),
            m(ChangeType::Deprecation, Indicator::Weak, 2),
            m(ChangeType::Breaking, Indicator::Weak, 3),
        ];
        let mut b = FileMatches::new("/src/b.php");
        b.matches = vec![m(ChangeType::Feature, Indicator::Strong, 9)];
        d.files.push(a);
        d.files.push(b);
        d
    }

    #[test]
    fn test_parse_lists_case_insensitive_and_ignore_unknown() {
        let t = parse_types("Breaking, deprecation,bogus,");
        assert_eq!(t.len(), 2);
        assert!(t.contains(&ChangeType::Breaking));
        assert!(t.contains(&ChangeType::Deprecation));
        let i = parse_indicators("STRONG,maybe");
        assert_eq!(i.len(), 1);
        assert!(i.contains(&Indicator::Strong));
        assert!(parse_types("").is_empty());
    }

    #[test]
    fn test_filter_by_type_drops_empty_files_and_keeps_order() {
        let d = sample();
        let out = filter_by_type(&d, &parse_types("breaking"));
        assert_eq!(out.path, d.path);
        assert_eq!(out.files.len(), 1);
        assert_eq!(out.files[0].matches.iter().map(|m| m.line).collect::<Vec<_>>(), vec![1, 3]);
        // input untouched
        assert_eq!(d.count_all(), 4);
    }

    #[test]
    fn test_filter_by_type_idempotent() {
        let d = sample();
        let t = parse_types("breaking,feature");
        let once = filter_by_type(&d, &t);
        let twice = filter_by_type(&once, &t);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_set_filters_everything() {
        let d = sample();
        assert_eq!(filter_by_type(&d, &HashSet::new()).count_all(), 0);
        assert_eq!(filter_by_indicator(&d, &parse_indicators("unknown")).count_all(), 0);
        assert!(filter_by_type(&d, &parse_types("nonsense")).files.is_empty());
    }

    #[test]
    fn test_filters_commute() {
        let d = sample();
        let t = parse_types("breaking,deprecation");
        let i = parse_indicators("weak");
        let a = filter_by_indicator(&filter_by_type(&d, &t), &i);
        let b = filter_by_type(&filter_by_indicator(&d, &i), &t);
        assert_eq!(a, b);
        assert_eq!(a.count_all(), 2);
    }
}
