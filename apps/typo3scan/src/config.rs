//! Configuration discovery and effective settings resolution.
//!
//! typo3scan reads `typo3scan.toml|yaml|yml` from the current directory (or
//! the closest ancestor, stopping at a `.git` directory) unless `--config`
//! names a file explicitly, and merges it with CLI flags into `Effective`.
//! Defaults:
//! - `target`: `10`
//! - `only`: `breaking,deprecation,important,feature`
//! - `indicators`: `strong,weak`
//! - `format`: `plain`
//! - `resources.changelog_dir`: `<exe dir>/Resources/Private/Changelog`
//! - `resources.links_file`: `<exe dir>/Resources/Private/links.txt`
//! - `engine.command`: `typo3-scanner`
//!
//! Relative paths inside a config file are resolved against the directory of
//! that file. Overrides precedence: CLI > config file > defaults.

use crate::bundle;
use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILES: [&str; 3] = ["typo3scan.toml", "typo3scan.yaml", "typo3scan.yml"];

pub const DEFAULT_TARGET: &str = "10";
pub const DEFAULT_ONLY: &str = "breaking,deprecation,important,feature";
pub const DEFAULT_INDICATORS: &str = "strong,weak";
pub const DEFAULT_FORMAT: &str = "plain";
pub const DEFAULT_ENGINE: &str = "typo3-scanner";

#[derive(Debug, Default, Deserialize, Clone)]
/// Documentation sources under `[resources]`.
pub struct ResourcesCfg {
    pub changelog_dir: Option<String>,
    pub links_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Matcher configuration location under `[matchers]`.
pub struct MatchersCfg {
    pub path: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// External scanner invocation under `[engine]`.
pub struct EngineCfg {
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `typo3scan.toml|yaml`.
pub struct ScanConfig {
    #[serde(default, deserialize_with = "version_string")]
    pub target: Option<String>,
    pub only: Option<String>,
    pub indicators: Option<String>,
    pub format: Option<String>,
    pub template_path: Option<String>,
    pub resources: Option<ResourcesCfg>,
    pub matchers: Option<MatchersCfg>,
    pub engine: Option<EngineCfg>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VersionValue {
    Text(String),
    Number(u64),
}

/// Accept `target = "9"` as well as `target = 9`.
fn version_string<'de, D>(d: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<VersionValue>::deserialize(d)?.map(|v| match v {
        VersionValue::Text(s) => s,
        VersionValue::Number(n) => n.to_string(),
    }))
}

#[derive(Debug, Default, Clone)]
/// Values given on the command line; `None` defers to config or defaults.
pub struct CliOverrides {
    pub config: Option<PathBuf>,
    pub target: Option<String>,
    pub only: Option<String>,
    pub indicators: Option<String>,
    pub format: Option<String>,
    pub template_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by the scan command.
pub struct Effective {
    pub config_file: Option<PathBuf>,
    pub target: String,
    pub only: String,
    pub indicators: String,
    pub format: String,
    pub template_path: Option<PathBuf>,
    pub changelog_dir: PathBuf,
    pub links_file: PathBuf,
    pub matcher_candidates: Vec<PathBuf>,
    pub engine_command: String,
    pub engine_args: Vec<String>,
}

/// Walk upward from `start` to the nearest config file.
///
/// Stops without a result at a `.git` directory or the filesystem root.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut cur = start;
    loop {
        for name in CONFIG_FILES {
            let p = cur.join(name);
            if p.is_file() {
                return Some(p);
            }
        }
        if cur.join(".git").exists() {
            return None;
        }
        cur = cur.parent()?;
    }
}

/// Load a config file, choosing the parser by extension.
pub fn load_config_file(path: &Path) -> Result<ScanConfig> {
    let s = fs::read_to_string(path).map_err(|e| Error::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let parsed = if is_yaml {
        serde_yaml::from_str::<ScanConfig>(&s).map_err(|e| e.to_string())
    } else {
        toml::from_str::<ScanConfig>(&s).map_err(|e| e.to_string())
    };
    parsed.map_err(|message| Error::Config {
        path: path.to_path_buf(),
        message,
    })
}

fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Resolve `Effective` by merging CLI flags, the discovered config, and
/// defaults. `start` is where config discovery begins.
pub fn resolve_effective(cli: &CliOverrides, start: &Path) -> Result<Effective> {
    let config_file = match cli.config.as_ref() {
        Some(p) => Some(p.clone()),
        None => find_config(start),
    };
    let cfg = match config_file.as_ref() {
        Some(p) => {
            log::debug!("using config {}", p.display());
            load_config_file(p)?
        }
        None => ScanConfig::default(),
    };
    let cfg_dir = config_file
        .as_ref()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| start.to_path_buf());
    let rel = |s: &String| cfg_dir.join(s);

    let target = cli
        .target
        .clone()
        .or(cfg.target)
        .unwrap_or_else(|| DEFAULT_TARGET.to_string());
    let only = cli
        .only
        .clone()
        .or(cfg.only)
        .unwrap_or_else(|| DEFAULT_ONLY.to_string());
    let indicators = cli
        .indicators
        .clone()
        .or(cfg.indicators)
        .unwrap_or_else(|| DEFAULT_INDICATORS.to_string());
    let format = cli
        .format
        .clone()
        .or(cfg.format)
        .unwrap_or_else(|| DEFAULT_FORMAT.to_string());
    let template_path = cli
        .template_path
        .clone()
        .or_else(|| cfg.template_path.as_ref().map(rel));

    let resources_dir = exe_dir().join("Resources/Private");
    let resources = cfg.resources.unwrap_or_default();
    let changelog_dir = resources
        .changelog_dir
        .as_ref()
        .map(rel)
        .unwrap_or_else(|| resources_dir.join("Changelog"));
    let links_file = resources
        .links_file
        .as_ref()
        .map(rel)
        .unwrap_or_else(|| resources_dir.join("links.txt"));

    let mut matcher_candidates = Vec::new();
    if let Some(p) = cfg.matchers.as_ref().and_then(|m| m.path.as_ref()) {
        matcher_candidates.push(rel(p));
    }
    matcher_candidates.extend(bundle::default_base_candidates());

    let engine = cfg.engine.unwrap_or_default();
    let engine_command = engine
        .command
        .unwrap_or_else(|| DEFAULT_ENGINE.to_string());

    Ok(Effective {
        config_file,
        target,
        only,
        indicators,
        format,
        template_path,
        changelog_dir,
        links_file,
        matcher_candidates,
        engine_command,
        engine_args: engine.args,
    })
}
