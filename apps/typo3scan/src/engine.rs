//! Scan engine contract and the process-backed adapter.
//!
//! Parsing PHP and evaluating matchers happens in an external scanner. The
//! pipeline only needs `ScanEngine::scan`; `CommandEngine` fulfils it by
//! running a scanner executable and decoding the JSON it prints.

use crate::bundle::MatcherBundle;
use crate::error::{Error, Result};
use crate::models::{ChangeType, DirectoryMatches, FileMatches, Indicator, Match};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Produces matches for every file below `root` using the bundle's matchers.
pub trait ScanEngine {
    fn scan(&self, root: &Path, bundle: &MatcherBundle) -> Result<DirectoryMatches>;
}

#[derive(Debug, Clone)]
/// Runs `<program> <args..> --config <dir> --matcher <id>.. <root>`.
pub struct CommandEngine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandEngine {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        CommandEngine {
            program: program.into(),
            args,
        }
    }

    fn command(&self, root: &Path, bundle: &MatcherBundle) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.arg("--config").arg(&bundle.config_path);
        for id in bundle.matcher_ids() {
            cmd.arg("--matcher").arg(id);
        }
        cmd.arg(root);
        cmd
    }
}

impl ScanEngine for CommandEngine {
    fn scan(&self, root: &Path, bundle: &MatcherBundle) -> Result<DirectoryMatches> {
        log::debug!("running {} on {}", self.program, root.display());
        let out = self
            .command(root, bundle)
            .output()
            .map_err(|e| Error::Engine(format!("cannot run {}: {}", self.program, e)))?;
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(Error::Engine(format!(
                "{} exited with {}: {}",
                self.program,
                out.status,
                stderr.trim()
            )));
        }
        decode_matches(&out.stdout)
    }
}

#[derive(Deserialize)]
struct WireDirectory {
    path: PathBuf,
    #[serde(default)]
    files: Vec<WireFile>,
}

#[derive(Deserialize)]
struct WireFile {
    path: PathBuf,
    #[serde(default)]
    matches: Vec<WireMatch>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMatch {
    #[serde(rename = "type")]
    change_type: ChangeType,
    indicator: Indicator,
    rule_file: String,
    #[serde(default)]
    source_file: Option<PathBuf>,
    line: usize,
    #[serde(default)]
    message: String,
}

/// Decode the engine's JSON report. Matches without `sourceFile` inherit the
/// path of the file entry they are listed under.
pub fn decode_matches(bytes: &[u8]) -> Result<DirectoryMatches> {
    let wire: WireDirectory = serde_json::from_slice(bytes)
        .map_err(|e| Error::Engine(format!("invalid scanner output: {}", e)))?;
    let files = wire
        .files
        .into_iter()
        .map(|f| {
            let matches = f
                .matches
                .into_iter()
                .map(|m| Match {
                    change_type: m.change_type,
                    indicator: m.indicator,
                    rule_file: m.rule_file,
                    source_file: m.source_file.unwrap_or_else(|| f.path.clone()),
                    line: m.line,
                    message: m.message,
                })
                .collect();
            FileMatches {
                path: f.path,
                matches,
            }
        })
        .collect();
    Ok(DirectoryMatches {
        path: wire.path,
        files,
    })
}
