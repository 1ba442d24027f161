//! Scan orchestration: bundle selection, engine run, filtering, statistics
//! and report context assembly.
//!
//! Documentation titles and links are not resolved here; templates pull them
//! per match through the renderer's helpers.

use crate::bundle::{self, select_bundle};
use crate::config::{self, CliOverrides};
use crate::context::extract_extension_context;
use crate::docs::DocResolver;
use crate::engine::{CommandEngine, ScanEngine};
use crate::error::{Error, Result};
use crate::filter::{filter_by_indicator, filter_by_type, parse_indicators, parse_types};
use crate::models::report::ReportContext;
use crate::models::{ChangeType, Indicator};
use crate::output::{self, Renderer};
use crate::stats::{counts_by_type, to_percentages};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// No matches left after filtering.
pub const EXIT_CLEAN: i32 = 0;
/// Matches left after filtering.
pub const EXIT_MATCHES: i32 = 1;
/// Usage, configuration or collaborator failure.
pub const EXIT_ERROR: i32 = 2;

/// Parameters of one scan.
pub struct ScanRequest {
    pub root: PathBuf,
    pub version: String,
    pub types: HashSet<ChangeType>,
    pub indicators: HashSet<Indicator>,
}

pub struct Scanner<'a> {
    engine: &'a dyn ScanEngine,
    matcher_base: PathBuf,
}

impl<'a> Scanner<'a> {
    pub fn new(engine: &'a dyn ScanEngine, matcher_base: impl Into<PathBuf>) -> Self {
        Scanner {
            engine,
            matcher_base: matcher_base.into(),
        }
    }

    pub fn run(&self, req: &ScanRequest) -> Result<ReportContext> {
        let started = Instant::now();
        let bundle = select_bundle(&req.version, &self.matcher_base);
        let all = self.engine.scan(&req.root, &bundle)?;
        log::debug!("engine reported {} matches", all.count_all());

        let by_type = filter_by_type(&all, &req.types);
        let filtered = filter_by_indicator(&by_type, &req.indicators);
        let total = filtered.count_all();
        log::debug!("{} matches after filtering", total);

        let statistics = to_percentages(&counts_by_type(&filtered), total);
        let ctx = extract_extension_context(&req.root);
        let title = if ctx.is_extension {
            ctx.extension_key
        } else {
            display(&req.root)
        };

        Ok(ReportContext {
            title,
            target_version: req.version.clone(),
            total,
            base_path: ctx.base_path,
            statistics,
            directory_matches: filtered,
            execution_time: started.elapsed().as_secs_f64(),
        })
    }
}

fn display(p: &Path) -> String {
    p.to_string_lossy().to_string()
}

/// Process exit status for a finished scan with `total` remaining matches.
pub fn exit_code(total: usize) -> i32 {
    if total > 0 {
        EXIT_MATCHES
    } else {
        EXIT_CLEAN
    }
}

/// Canonical directory to scan, or `PathNotFound`.
pub fn resolve_scan_root(path: &Path) -> Result<PathBuf> {
    match std::fs::canonicalize(path) {
        Ok(p) if p.is_dir() => Ok(p),
        _ => Err(Error::PathNotFound(path.to_path_buf())),
    }
}

/// Run the scan command end to end and write its report. Returns the
/// filtered match total.
///
/// Usage and configuration problems (scan path, config, matcher location,
/// report directory, format) are reported before the engine runs. `cwd` is
/// where config discovery starts.
pub fn run_scan(
    path: &Path,
    overrides: &CliOverrides,
    report_file: Option<&Path>,
    cwd: &Path,
) -> Result<usize> {
    let root = resolve_scan_root(path)?;
    let eff = config::resolve_effective(overrides, cwd)?;
    let matcher_base = bundle::locate_base_path(&eff.matcher_candidates)?;

    if let Some(dir) = report_file.and_then(Path::parent) {
        if !dir.as_os_str().is_empty() && !dir.is_dir() {
            return Err(Error::ReportDirNotFound(dir.to_path_buf()));
        }
    }

    let docs = Arc::new(DocResolver::new(&eff.changelog_dir, &eff.links_file));
    let renderer = Renderer::new(docs, eff.template_path.as_deref())?;
    if !renderer.formats().contains(&eff.format.trim().to_ascii_lowercase()) {
        return Err(Error::UnknownFormat(eff.format.clone()));
    }

    let engine = CommandEngine::new(eff.engine_command.clone(), eff.engine_args.clone());
    let scanner = Scanner::new(&engine, matcher_base);
    let ctx = scanner.run(&ScanRequest {
        root,
        version: eff.target.clone(),
        types: parse_types(&eff.only),
        indicators: parse_indicators(&eff.indicators),
    })?;

    let text = renderer.render(&eff.format, &ctx)?;
    output::write_report(&text, report_file)?;
    Ok(ctx.total)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::bundle::MatcherBundle;
    use crate::filter::{parse_indicators, parse_types};
    use crate::models::{DirectoryMatches, FileMatches, Match};
    use serde_json::Value as Json;
    use std::cell::RefCell;

    /// Engine double returning canned matches and recording the bundle used.
    pub(crate) struct StaticEngine {
        pub result: DirectoryMatches,
        pub seen: RefCell<Option<MatcherBundle>>,
    }

    impl StaticEngine {
        pub(crate) fn new(result: DirectoryMatches) -> Self {
            StaticEngine {
                result,
                seen: RefCell::new(None),
            }
        }
    }

    impl ScanEngine for StaticEngine {
        fn scan(&self, _root: &Path, bundle: &MatcherBundle) -> Result<DirectoryMatches> {
            *self.seen.borrow_mut() = Some(bundle.clone());
            Ok(self.result.clone())
        }
    }

    pub(crate) fn three_matches(root: &str) -> DirectoryMatches {
        let file = format!("{}/Classes/Foo.php", root);
        let m = |t, i, line| Match {
            change_type: t,
            indicator: i,
            rule_file: "Breaking-72931-SearchFormController.rst".into(),
            source_file: file.clone().into(),
            line,
            message: "Removed class".into(),
        };
        let mut dm = DirectoryMatches::new(root);
        let mut f = FileMatches::new(file.clone());
        f.matches = vec![
            m(ChangeType::Breaking, Indicator::Strong, 3),
            m(ChangeType::Deprecation, Indicator::Weak, 5),
            m(ChangeType::Breaking, Indicator::Strong, 8),
        ];
        dm.files.push(f);
        dm
    }

    fn request(root: &str, version: &str, only: &str, indicators: &str) -> ScanRequest {
        ScanRequest {
            root: root.into(),
            version: version.into(),
            types: parse_types(only),
            indicators: parse_indicators(indicators),
        }
    }

    #[test]
    fn test_type_filter_end_to_end() {
        let engine = StaticEngine::new(three_matches("/src"));
        let scanner = Scanner::new(&engine, "/matchers/");
        let ctx = scanner
            .run(&request("/src", "9", "breaking", "strong,weak"))
            .unwrap();
        assert_eq!(ctx.total, 2);
        assert_eq!(ctx.directory_matches.count_all(), 2);
        assert_eq!(ctx.statistics["STRONG"], "100.0% (2)");
        assert_eq!(ctx.statistics["WEAK"], "0.0% (0)");
        assert_eq!(ctx.statistics["BREAKING"], "100.0% (2)");
        assert!(ctx.statistics.get("DEPRECATION").is_none());
        assert_eq!(ctx.title, "/src");
        assert_eq!(ctx.target_version, "9");

        let seen = engine.seen.borrow();
        let bundle = seen.as_ref().unwrap();
        assert_eq!(bundle.config_path, PathBuf::from("/matchers/9"));
    }

    #[test]
    fn test_zero_matches() {
        let engine = StaticEngine::new(DirectoryMatches::new("/src"));
        let scanner = Scanner::new(&engine, "/matchers/");
        let ctx = scanner
            .run(&request("/src", "10", "breaking,deprecation,important,feature", "strong,weak"))
            .unwrap();
        assert_eq!(ctx.total, 0);
        assert_eq!(ctx.statistics["STRONG"], Json::from(0));
        assert_eq!(ctx.statistics["WEAK"], Json::from(0));
        assert_eq!(ctx.statistics.len(), 2);
    }

    #[test]
    fn test_extension_title_and_base_path() {
        let root = "/site/typo3conf/ext/news";
        let engine = StaticEngine::new(three_matches(root));
        let scanner = Scanner::new(&engine, "/matchers/");
        let ctx = scanner
            .run(&request(root, "bogus", "breaking,deprecation", "weak"))
            .unwrap();
        assert_eq!(ctx.title, "news");
        assert!(ctx.base_path.to_string_lossy().ends_with("ext/news/"));
        assert_eq!(ctx.total, 1);
        assert_eq!(ctx.statistics["WEAK"], "100.0% (1)");
        assert_eq!(ctx.statistics["STRONG"], "0.0% (0)");
        // unknown version keeps the requested label but scans with v7 matchers
        assert_eq!(ctx.target_version, "bogus");
        let seen = engine.seen.borrow();
        assert_eq!(seen.as_ref().unwrap().config_path, PathBuf::from("/matchers/7"));
    }

    #[test]
    fn test_exit_code_follows_remaining_matches() {
        assert_eq!(exit_code(0), EXIT_CLEAN);
        assert_eq!(exit_code(1), EXIT_MATCHES);
        assert_eq!(exit_code(42), EXIT_MATCHES);
        assert_eq!(EXIT_CLEAN, 0);
        assert_eq!(EXIT_MATCHES, 1);
        assert_eq!(EXIT_ERROR, 2);
    }

    /// Workspace with a source tree, a matcher directory and a config file
    /// whose engine is `sh -c <script>`.
    fn workspace(script: &str) -> (tempfile::TempDir, PathBuf, CliOverrides) {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        std::fs::create_dir_all(root.join("src")).unwrap();
        std::fs::create_dir_all(root.join("matchers/10")).unwrap();
        let cfg = root.join("typo3scan.toml");
        std::fs::write(
            &cfg,
            format!(
                "format = \"json\"\n[matchers]\npath = \"matchers/\"\n[resources]\nchangelog_dir = \"Changelog\"\nlinks_file = \"links.txt\"\n[engine]\ncommand = \"sh\"\nargs = [\"-c\", {:?}]\n",
                script
            ),
        )
        .unwrap();
        let overrides = CliOverrides {
            config: Some(cfg),
            ..Default::default()
        };
        let src = root.join("src");
        (tmp, src, overrides)
    }

    #[test]
    fn test_run_scan_missing_path_is_path_not_found() {
        let (tmp, _src, overrides) = workspace("exit 0");
        let missing = tmp.path().join("no/such/dir");
        let err = run_scan(&missing, &overrides, None, tmp.path()).unwrap_err();
        assert!(matches!(err, Error::PathNotFound(ref p) if p == &missing));

        let file = tmp.path().join("typo3scan.toml");
        assert!(matches!(
            run_scan(&file, &overrides, None, tmp.path()),
            Err(Error::PathNotFound(_))
        ));
    }

    #[test]
    fn test_run_scan_rejects_missing_report_dir_before_scanning() {
        // the engine would fail; the report directory check comes first
        let (tmp, src, overrides) = workspace("exit 3");
        let report = tmp.path().join("missing/report.json");
        let err = run_scan(&src, &overrides, Some(&report), tmp.path()).unwrap_err();
        assert!(matches!(err, Error::ReportDirNotFound(_)));
    }

    #[test]
    fn test_run_scan_rejects_unknown_format_before_scanning() {
        let (tmp, src, mut overrides) = workspace("exit 3");
        overrides.format = Some("html".into());
        let err = run_scan(&src, &overrides, None, tmp.path()).unwrap_err();
        assert!(matches!(err, Error::UnknownFormat(ref f) if f == "html"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_scan_zero_matches_exits_clean() {
        let (tmp, src, overrides) =
            workspace(r#"printf '{"path": "/src", "files": [{"path": "/src/a.php"}]}'"#);
        let report = tmp.path().join("report.json");
        let total = run_scan(&src, &overrides, Some(&report), tmp.path()).unwrap();
        assert_eq!(total, 0);
        assert_eq!(exit_code(total), EXIT_CLEAN);
        let v: Json = serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(v["total"], 0);
        assert_eq!(v["statistics"]["STRONG"], 0);
        assert_eq!(v["targetVersion"], "10");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_scan_remaining_matches_exit_non_zero() {
        let (tmp, src, overrides) = workspace(
            r#"printf '{"path": "/src", "files": [{"path": "/src/a.php", "matches": [{"type": "breaking", "indicator": "strong", "ruleFile": "Breaking-1-A.rst", "line": 3}]}]}'"#,
        );
        let report = tmp.path().join("report.json");
        let total = run_scan(&src, &overrides, Some(&report), tmp.path()).unwrap();
        assert_eq!(total, 1);
        assert_eq!(exit_code(total), EXIT_MATCHES);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_scan_engine_failure_is_error() {
        let (tmp, src, overrides) = workspace("echo boom >&2; exit 3");
        let report = tmp.path().join("report.json");
        let err = run_scan(&src, &overrides, Some(&report), tmp.path()).unwrap_err();
        assert!(matches!(err, Error::Engine(ref m) if m.contains("boom")));
        assert!(!report.exists());
    }

    #[test]
    fn test_context_serializes_camel_case() {
        let engine = StaticEngine::new(three_matches("/src"));
        let scanner = Scanner::new(&engine, "/matchers/");
        let ctx = scanner
            .run(&request("/src", "8", "breaking", "strong"))
            .unwrap();
        let v = serde_json::to_value(&ctx).unwrap();
        for key in [
            "title",
            "targetVersion",
            "total",
            "basePath",
            "statistics",
            "directoryMatches",
            "executionTime",
        ] {
            assert!(v.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(v["directoryMatches"]["files"][0]["matches"][0]["type"], "BREAKING");
    }
}
