//! Error type shared by the scan pipeline, renderer and CLI.
//!
//! Only fatal conditions live here. Documentation lookup misses, unknown
//! filter tokens and unknown target versions are normal outcomes and never
//! surface as errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Path does not exist: \"{}\"", .0.display())]
    PathNotFound(PathBuf),

    #[error("Reportfile path does not exist: \"{}\"", .0.display())]
    ReportDirNotFound(PathBuf),

    #[error("Matcher configuration not found; looked in: {}", format_candidates(.0))]
    MatcherPathNotFound(Vec<PathBuf>),

    #[error("Invalid configuration in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("Unknown output format: {0}")]
    UnknownFormat(String),

    #[error("Scan engine failed: {0}")]
    Engine(String),

    #[error("Template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("Render error: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

fn format_candidates(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
