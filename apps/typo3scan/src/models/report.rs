//! Render-time context passed to report templates.

use super::DirectoryMatches;
use crate::stats::Statistics;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
/// Everything a report template receives. Built once per scan.
pub struct ReportContext {
    /// Extension key when scanning inside an extension, else the scanned path.
    pub title: String,
    pub target_version: String,
    pub total: usize,
    pub base_path: PathBuf,
    pub statistics: Statistics,
    pub directory_matches: DirectoryMatches,
    /// Seconds spent from scan start to context assembly.
    pub execution_time: f64,
}
