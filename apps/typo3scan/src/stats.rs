//! Match statistics by indicator and change type.
//!
//! Counts keep insertion order: `STRONG` and `WEAK` first (always present),
//! then change types in the order they are first seen. Percentages are
//! rendered as `"<pct>% (<count>)"` so the raw count stays visible next to
//! the share of the filtered total.

use crate::models::{DirectoryMatches, Indicator};
use serde_json::{Map, Value as Json};

/// Percentage strings keyed like `Counts`, in the same order.
pub type Statistics = Map<String, Json>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counts(Vec<(String, usize)>);

impl Counts {
    pub fn get(&self, key: &str) -> Option<usize> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, c)| *c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(k, c)| (k.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn seed(&mut self, key: &str) {
        if self.get(key).is_none() {
            self.0.push((key.to_string(), 0));
        }
    }

    fn increment(&mut self, key: &str) {
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some((_, c)) => *c += 1,
            None => self.0.push((key.to_string(), 1)),
        }
    }
}

/// Count matches per indicator and per change type.
pub fn counts_by_type(matches: &DirectoryMatches) -> Counts {
    let mut counts = Counts::default();
    for ind in Indicator::ALL {
        counts.seed(ind.as_str());
    }
    for m in matches.iter_matches() {
        counts.increment(m.indicator.as_str());
        counts.increment(m.change_type.as_str());
    }
    counts
}

/// Convert counts into percentage strings of `total`.
///
/// A non-positive total yields a literal `0` for every key instead of a
/// formatted string.
pub fn to_percentages(counts: &Counts, total: usize) -> Statistics {
    let mut out = Statistics::new();
    for (key, count) in counts.iter() {
        let value = if total == 0 {
            Json::from(0)
        } else {
            Json::String(format!("{:.1}% ({})", percent(count, total), count))
        };
        out.insert(key.to_string(), value);
    }
    out
}

/// `100 * count / total`, rounded half away from zero to one decimal.
fn percent(count: usize, total: usize) -> f64 {
    let raw = 100.0 * count as f64 / total as f64;
    (raw * 10.0).round() / 10.0
}
