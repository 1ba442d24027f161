//! Extension context derived from a scanned path.
//!
//! TYPO3 installs extensions under `.../typo3conf/ext/<extension key>/`.
//! When the scanned path lives inside such a directory the report is titled
//! after the extension and paths are shown relative to its root.

use std::ffi::OsStr;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionContext {
    pub is_extension: bool,
    pub extension_key: String,
    pub base_path: PathBuf,
}

/// Walk `path` upward looking for a directory named `ext`.
///
/// The extension key is the component directly below `ext`; the base path is
/// `<ext>/<key>/`. Without an `ext` ancestor (or when `ext` is the last
/// component) the input path is returned unchanged as base path.
pub fn extract_extension_context(path: &Path) -> ExtensionContext {
    let mut below: Option<&OsStr> = None;
    for ancestor in path.ancestors() {
        let name = match ancestor.file_name() {
            Some(n) => n,
            None => break,
        };
        if name == "ext" {
            if let Some(key) = below {
                let base = format!(
                    "{}{}",
                    ancestor.join(key).to_string_lossy(),
                    MAIN_SEPARATOR
                );
                return ExtensionContext {
                    is_extension: true,
                    extension_key: key.to_string_lossy().to_string(),
                    base_path: PathBuf::from(base),
                };
            }
            break;
        }
        below = Some(name);
    }
    ExtensionContext {
        is_extension: false,
        extension_key: String::new(),
        base_path: path.to_path_buf(),
    }
}
