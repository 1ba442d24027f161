//! Scan result data models and the report context handed to templates.

pub mod report;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
/// Category of a detected change.
pub enum ChangeType {
    Breaking,
    Deprecation,
    Important,
    Feature,
}

impl ChangeType {
    pub const ALL: [ChangeType; 4] = [
        ChangeType::Breaking,
        ChangeType::Deprecation,
        ChangeType::Important,
        ChangeType::Feature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Breaking => "BREAKING",
            ChangeType::Deprecation => "DEPRECATION",
            ChangeType::Important => "IMPORTANT",
            ChangeType::Feature => "FEATURE",
        }
    }
}

impl FromStr for ChangeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        ChangeType::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(t))
            .ok_or_else(|| format!("unknown change type: {}", t))
    }
}

impl TryFrom<String> for ChangeType {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ChangeType> for String {
    fn from(c: ChangeType) -> Self {
        c.as_str().to_string()
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
/// Confidence of a match: `Strong` is certain, `Weak` may be a false positive.
pub enum Indicator {
    Strong,
    Weak,
}

impl Indicator {
    pub const ALL: [Indicator; 2] = [Indicator::Strong, Indicator::Weak];

    pub fn as_str(&self) -> &'static str {
        match self {
            Indicator::Strong => "STRONG",
            Indicator::Weak => "WEAK",
        }
    }
}

impl FromStr for Indicator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        Indicator::ALL
            .into_iter()
            .find(|i| i.as_str().eq_ignore_ascii_case(t))
            .ok_or_else(|| format!("unknown indicator: {}", t))
    }
}

impl TryFrom<String> for Indicator {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Indicator> for String {
    fn from(i: Indicator) -> Self {
        i.as_str().to_string()
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
/// One detected occurrence of a changed API.
pub struct Match {
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    pub indicator: Indicator,
    pub rule_file: String,
    pub source_file: PathBuf,
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Matches reported for a single source file, in engine order.
pub struct FileMatches {
    pub path: PathBuf,
    pub matches: Vec<Match>,
}

impl FileMatches {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileMatches {
            path: path.into(),
            matches: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// All file results for one scanned root.
pub struct DirectoryMatches {
    pub path: PathBuf,
    pub files: Vec<FileMatches>,
}

impl DirectoryMatches {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DirectoryMatches {
            path: path.into(),
            files: Vec::new(),
        }
    }

    /// Total number of matches across all files.
    pub fn count_all(&self) -> usize {
        self.files.iter().map(FileMatches::len).sum()
    }

    pub fn iter_matches(&self) -> impl Iterator<Item = &Match> {
        self.files.iter().flat_map(|f| f.matches.iter())
    }
}
