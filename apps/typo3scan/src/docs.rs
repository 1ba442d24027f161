//! Documentation lookup for rule files.
//!
//! A match only carries the basename of its change document (the path the
//! matcher configuration stores is not reliable across core versions), so
//! both lookups work on the basename:
//! - titles come from the `.rst` file of the same name found anywhere below
//!   the changelog directory;
//! - URLs come from the first entry of the links list whose text ends with
//!   the basename converted to `.html`.
//!
//! Everything is best effort: a miss resolves to an empty string. The
//! changelog index and links list are loaded at most once; resolved titles
//! and URLs are cached for the lifetime of the resolver.

use std::collections::HashMap;
use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};

/// Prefix for documentation pages listed in the links file.
pub const DOCS_BASE_URL: &str = "https://docs.typo3.org/typo3cms/extensions/core/";

/// Rule files of the v7 class name pattern matcher have no changelog entry.
struct LegacyRule {
    file: &'static str,
    title: &'static str,
    url: &'static str,
}

static LEGACY_RULES: [LegacyRule; 2] = [
    LegacyRule {
        file: "Deprecation-legacy-files.md",
        title: "Renamed TYPO3 core libraries",
        url: "https://gist.github.com/Tuurlijk/f857bf41e559ce3908290fb96d98b5e4",
    },
    LegacyRule {
        file: "Deprecation-non-namespaced.md",
        title: "Use of non-namespaced classes",
        url: "https://gist.github.com/Tuurlijk/79aba880880e6340ffd2720ff1c5b623",
    },
];

fn legacy_rule(name: &str) -> Option<&'static LegacyRule> {
    LEGACY_RULES.iter().find(|r| r.file == name)
}

pub struct DocResolver {
    changelog_dir: PathBuf,
    links_file: PathBuf,
    index: OnceLock<HashMap<String, PathBuf>>,
    links: OnceLock<Vec<String>>,
    // keyed by resolved changelog path
    titles: Mutex<HashMap<String, String>>,
    // keyed by rule file basename
    urls: Mutex<HashMap<String, String>>,
}

impl DocResolver {
    pub fn new(changelog_dir: impl Into<PathBuf>, links_file: impl Into<PathBuf>) -> Self {
        DocResolver {
            changelog_dir: changelog_dir.into(),
            links_file: links_file.into(),
            index: OnceLock::new(),
            links: OnceLock::new(),
            titles: Mutex::new(HashMap::new()),
            urls: Mutex::new(HashMap::new()),
        }
    }

    /// Human title of the change described by `rule_file`, or `""`.
    pub fn resolve_title(&self, rule_file: &str) -> String {
        let name = basename(rule_file);
        if let Some(rule) = legacy_rule(&name) {
            return rule.title.to_string();
        }
        let path = match self.index().get(&name) {
            Some(p) => p,
            None => {
                log::debug!("no changelog entry for {}", name);
                return String::new();
            }
        };
        let key = path.to_string_lossy().to_string();
        if let Some(title) = lock(&self.titles).get(&key) {
            return title.clone();
        }
        let title = match extract_title(path) {
            Ok(t) => t,
            Err(e) => {
                log::warn!("cannot read {}: {}", path.display(), e);
                String::new()
            }
        };
        lock(&self.titles).insert(key, title.clone());
        title
    }

    /// Online documentation URL for `rule_file`, or `""`.
    pub fn resolve_doc_url(&self, rule_file: &str) -> String {
        let name = basename(rule_file);
        if let Some(rule) = legacy_rule(&name) {
            return rule.url.to_string();
        }
        if name.is_empty() {
            return String::new();
        }
        if let Some(url) = lock(&self.urls).get(&name) {
            return url.clone();
        }
        let page = name.replace(".rst", ".html");
        let url = self
            .links()
            .iter()
            .find(|link| link.ends_with(&page))
            .map(|link| format!("{}{}", DOCS_BASE_URL, link))
            .unwrap_or_default();
        lock(&self.urls).insert(name, url.clone());
        url
    }

    /// Forget the changelog index, links list and all cached lookups.
    pub fn clear(&mut self) {
        self.index = OnceLock::new();
        self.links = OnceLock::new();
        lock(&self.titles).clear();
        lock(&self.urls).clear();
    }

    fn index(&self) -> &HashMap<String, PathBuf> {
        self.index
            .get_or_init(|| build_changelog_index(&self.changelog_dir))
    }

    fn links(&self) -> &[String] {
        self.links.get_or_init(|| load_links(&self.links_file))
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn basename(rule_file: &str) -> String {
    Path::new(rule_file)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Map every `*.rst` basename below `dir` to its full path. On duplicate
/// basenames the first path in glob order wins.
fn build_changelog_index(dir: &Path) -> HashMap<String, PathBuf> {
    let mut index = HashMap::new();
    if !dir.is_dir() {
        log::warn!(
            "changelog directory not found: {}; change titles will be empty",
            dir.display()
        );
        return index;
    }
    let pattern = format!(
        "{}/**/*.rst",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let entries = match glob::glob(&pattern) {
        Ok(e) => e,
        Err(e) => {
            log::warn!("bad changelog pattern {}: {}", pattern, e);
            return index;
        }
    };
    for path in entries.flatten() {
        if let Some(name) = path.file_name() {
            index
                .entry(name.to_string_lossy().to_string())
                .or_insert(path);
        }
    }
    log::debug!("indexed {} changelog files", index.len());
    index
}

fn load_links(path: &Path) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(s) => s
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect(),
        Err(e) => {
            log::warn!(
                "links file {} unavailable ({}); documentation links will be empty",
                path.display(),
                e
            );
            Vec::new()
        }
    }
}

/// First non-empty line after a line starting with `=`.
fn extract_title(path: &Path) -> io::Result<String> {
    let reader = BufReader::new(fs::File::open(path)?);
    let mut after_marker = false;
    for line in reader.lines() {
        let line = line?;
        let text = line.trim();
        if after_marker {
            if !text.is_empty() {
                return Ok(text.to_string());
            }
            continue;
        }
        if is_title_marker(&line) {
            after_marker = true;
        }
    }
    Ok(String::new())
}

fn is_title_marker(line: &str) -> bool {
    line.starts_with('=')
}
