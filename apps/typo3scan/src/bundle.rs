//! Matcher bundle selection per target TYPO3 version.
//!
//! Each supported version maps to a fixed, hand-curated list of matchers.
//! The order is kept stable so reports stay comparable between runs.

use crate::error::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Supported target versions. Anything unrecognized falls back to `V7`.
pub enum TargetVersion {
    V7,
    V8,
    V9,
    V10,
}

impl TargetVersion {
    pub fn parse(version: &str) -> Self {
        match version.trim() {
            "10" => TargetVersion::V10,
            "9" => TargetVersion::V9,
            "8" => TargetVersion::V8,
            "7" => TargetVersion::V7,
            other => {
                log::debug!("unrecognized target version {:?}; using v7 matchers", other);
                TargetVersion::V7
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetVersion::V7 => "7",
            TargetVersion::V8 => "8",
            TargetVersion::V9 => "9",
            TargetVersion::V10 => "10",
        }
    }

    pub fn matchers(&self) -> &'static [MatcherKind] {
        use MatcherKind::*;
        match self {
            TargetVersion::V10 => &[
                ArrayDimension,
                ArrayGlobal,
                ClassConstant,
                ClassName,
                Constant,
                ConstructorArgument,
                FunctionCall,
                InterfaceMethodChanged,
                MethodAnnotation,
                MethodArgumentDropped,
                MethodArgumentDroppedStatic,
                MethodArgumentRequired,
                MethodArgumentRequiredStatic,
                MethodArgumentUnused,
                MethodCall,
                MethodCallStatic,
                PropertyAnnotation,
                PropertyExistsStatic,
                PropertyProtected,
                PropertyPublic,
            ],
            TargetVersion::V9 => &[
                ArrayDimension,
                ArrayGlobal,
                ClassConstant,
                ClassName,
                Constant,
                FunctionCall,
                InterfaceMethodChanged,
                MethodAnnotation,
                MethodArgumentDropped,
                MethodArgumentDroppedStatic,
                MethodArgumentRequired,
                MethodArgumentRequiredStatic,
                MethodArgumentUnused,
                MethodCall,
                MethodCallStatic,
                PropertyAnnotation,
                PropertyExistsStatic,
                PropertyProtected,
                PropertyPublic,
            ],
            TargetVersion::V8 => &[
                ArrayDimension,
                ArrayGlobal,
                ClassName,
                Constant,
                MethodArgumentDropped,
                MethodArgumentDroppedStatic,
                MethodArgumentRequired,
                MethodArgumentUnused,
                MethodCall,
                MethodCallStatic,
                PropertyPublic,
            ],
            TargetVersion::V7 => &[
                Array,
                ArrayDimension,
                ArrayGlobal,
                ClassConstant,
                ClassName,
                ClassNamePattern,
                Constant,
                Global,
                MethodArgumentDropped,
                MethodArgumentRequired,
                MethodArgumentUnusedStatic,
                MethodCall,
                MethodCallStatic,
                PropertyProtected,
                PropertyPublic,
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Kinds of code-pattern matchers understood by the scan engine.
pub enum MatcherKind {
    Array,
    ArrayDimension,
    ArrayGlobal,
    ClassConstant,
    ClassName,
    ClassNamePattern,
    Constant,
    ConstructorArgument,
    FunctionCall,
    Global,
    InterfaceMethodChanged,
    MethodAnnotation,
    MethodArgumentDropped,
    MethodArgumentDroppedStatic,
    MethodArgumentRequired,
    MethodArgumentRequiredStatic,
    MethodArgumentUnused,
    MethodArgumentUnusedStatic,
    MethodCall,
    MethodCallStatic,
    PropertyAnnotation,
    PropertyExistsStatic,
    PropertyProtected,
    PropertyPublic,
}

impl MatcherKind {
    /// Identifier passed to the engine.
    pub fn id(&self) -> &'static str {
        match self {
            MatcherKind::Array => "ArrayMatcher",
            MatcherKind::ArrayDimension => "ArrayDimensionMatcher",
            MatcherKind::ArrayGlobal => "ArrayGlobalMatcher",
            MatcherKind::ClassConstant => "ClassConstantMatcher",
            MatcherKind::ClassName => "ClassNameMatcher",
            MatcherKind::ClassNamePattern => "ClassNamePatternMatcher",
            MatcherKind::Constant => "ConstantMatcher",
            MatcherKind::ConstructorArgument => "ConstructorArgumentMatcher",
            MatcherKind::FunctionCall => "FunctionCallMatcher",
            MatcherKind::Global => "GlobalMatcher",
            MatcherKind::InterfaceMethodChanged => "InterfaceMethodChangedMatcher",
            MatcherKind::MethodAnnotation => "MethodAnnotationMatcher",
            MatcherKind::MethodArgumentDropped => "MethodArgumentDroppedMatcher",
            MatcherKind::MethodArgumentDroppedStatic => "MethodArgumentDroppedStaticMatcher",
            MatcherKind::MethodArgumentRequired => "MethodArgumentRequiredMatcher",
            MatcherKind::MethodArgumentRequiredStatic => "MethodArgumentRequiredStaticMatcher",
            MatcherKind::MethodArgumentUnused => "MethodArgumentUnusedMatcher",
            MatcherKind::MethodArgumentUnusedStatic => "MethodArgumentUnusedStaticMatcher",
            MatcherKind::MethodCall => "MethodCallMatcher",
            MatcherKind::MethodCallStatic => "MethodCallStaticMatcher",
            MatcherKind::PropertyAnnotation => "PropertyAnnotationMatcher",
            MatcherKind::PropertyExistsStatic => "PropertyExistsStaticMatcher",
            MatcherKind::PropertyProtected => "PropertyProtectedMatcher",
            MatcherKind::PropertyPublic => "PropertyPublicMatcher",
        }
    }
}

impl fmt::Display for MatcherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Ordered matcher set for one target version, plus the engine config path.
pub struct MatcherBundle {
    pub version: TargetVersion,
    pub matchers: &'static [MatcherKind],
    pub config_path: PathBuf,
}

impl MatcherBundle {
    pub fn matcher_ids(&self) -> Vec<&'static str> {
        self.matchers.iter().map(MatcherKind::id).collect()
    }
}

/// Select the matcher bundle for `version`. The config path is
/// `<base><effective version>`.
pub fn select_bundle(version: &str, base: &Path) -> MatcherBundle {
    let version = TargetVersion::parse(version);
    let bundle = MatcherBundle {
        version,
        matchers: version.matchers(),
        config_path: base.join(version.as_str()),
    };
    log::debug!(
        "selected v{} bundle with {} matchers",
        version.as_str(),
        bundle.matchers.len()
    );
    bundle
}

/// Default matcher config locations relative to the running executable:
/// packaged next to the binary, or installed as a sibling dependency.
pub fn default_base_candidates() -> Vec<PathBuf> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    vec![
        exe_dir.join("vendor/typo3/cms-scanner/config/Matcher/"),
        exe_dir.join("../../typo3/cms-scanner/config/Matcher/"),
    ]
}

/// Return the first candidate that exists as a directory.
pub fn locate_base_path(candidates: &[PathBuf]) -> Result<PathBuf> {
    candidates
        .iter()
        .find(|p| p.is_dir())
        .cloned()
        .ok_or_else(|| Error::MatcherPathNotFound(candidates.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_unknown_version_falls_back_to_v7() {
        let b = select_bundle("6.2", Path::new("/m/"));
        assert_eq!(b.version, TargetVersion::V7);
        assert_eq!(b.matchers, TargetVersion::V7.matchers());
        assert_eq!(b.config_path, PathBuf::from("/m/7"));
        assert_eq!(select_bundle("", Path::new("/m")).version, TargetVersion::V7);
        assert_eq!(select_bundle(" 9 ", Path::new("/m")).version, TargetVersion::V9);
    }

    #[test]
    fn test_lists_differ_per_version() {
        let has = |v: TargetVersion, k: MatcherKind| v.matchers().contains(&k);
        assert!(has(TargetVersion::V10, MatcherKind::ConstructorArgument));
        assert!(!has(TargetVersion::V9, MatcherKind::ConstructorArgument));
        assert!(!has(TargetVersion::V8, MatcherKind::ConstructorArgument));
        assert!(has(TargetVersion::V7, MatcherKind::ClassNamePattern));
        assert!(!has(TargetVersion::V8, MatcherKind::ClassNamePattern));
        assert_eq!(TargetVersion::V7.matchers().len(), 15);
        assert_eq!(TargetVersion::V8.matchers().len(), 11);
        assert_eq!(TargetVersion::V9.matchers().len(), 19);
        assert_eq!(TargetVersion::V10.matchers().len(), 20);
    }

    #[test]
    fn test_order_is_stable() {
        let ids = select_bundle("10", Path::new("/m")).matcher_ids();
        assert_eq!(&ids[..6], &[
            "ArrayDimensionMatcher",
            "ArrayGlobalMatcher",
            "ClassConstantMatcher",
            "ClassNameMatcher",
            "ConstantMatcher",
            "ConstructorArgumentMatcher",
        ]);
        assert_eq!(ids.last(), Some(&"PropertyPublicMatcher"));
        assert_eq!(select_bundle("7", Path::new("/m")).matcher_ids()[0], "ArrayMatcher");
    }

    #[test]
    fn test_locate_base_path_picks_first_existing() {
        let tmp = tempdir().unwrap();
        let missing = tmp.path().join("nope");
        let second = tmp.path().join("vendor");
        std::fs::create_dir_all(&second).unwrap();
        let found = locate_base_path(&[missing.clone(), second.clone()]).unwrap();
        assert_eq!(found, second);

        let err = locate_base_path(&[missing]).unwrap_err();
        assert!(matches!(err, Error::MatcherPathNotFound(ref c) if c.len() == 1));
    }
}
