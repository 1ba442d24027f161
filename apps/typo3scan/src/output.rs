//! Report rendering and output.
//!
//! Supports the embedded `plain` and `markdown` templates, any `<name>.hbs`
//! from a template override directory, and `json` (the report context
//! serialized as is). Templates reach documentation and source excerpts
//! through helpers:
//! - `change_title ruleFile` / `online_document ruleFile`
//! - `line_from_file sourceFile line`
//! - `lines_from_file sourceFile line [before] [after]`
//! - `filename path`, `escape_dollar text`, `relative_path path base`

use crate::docs::DocResolver;
use crate::error::{Error, Result};
use crate::models::report::ReportContext;
use crate::utils;
use handlebars::{Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext};
use serde_json::Value as Json;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

const EMBEDDED: [(&str, &str); 2] = [
    ("plain", include_str!("../templates/plain.hbs")),
    ("markdown", include_str!("../templates/markdown.hbs")),
];

pub struct Renderer {
    registry: Handlebars<'static>,
}

impl Renderer {
    /// Build a renderer. Templates in `template_path` override embedded ones
    /// of the same name and may add new formats.
    pub fn new(docs: Arc<DocResolver>, template_path: Option<&Path>) -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        for (name, source) in EMBEDDED {
            registry.register_template_string(name, source)?;
        }
        if let Some(dir) = template_path {
            register_dir(&mut registry, dir)?;
        }
        register_helpers(&mut registry, docs);
        Ok(Renderer { registry })
    }

    pub fn formats(&self) -> Vec<String> {
        let mut names: Vec<String> = self.registry.get_templates().keys().cloned().collect();
        names.push("json".to_string());
        names.sort();
        names
    }

    /// Render `ctx` with the template named `format` (case-insensitive).
    pub fn render(&self, format: &str, ctx: &ReportContext) -> Result<String> {
        let name = format.trim().to_ascii_lowercase();
        if name == "json" {
            let mut s = serde_json::to_string_pretty(ctx)?;
            s.push('\n');
            return Ok(s);
        }
        if !self.registry.has_template(&name) {
            return Err(Error::UnknownFormat(format.to_string()));
        }
        Ok(self.registry.render(&name, ctx)?)
    }
}

fn register_dir(registry: &mut Handlebars<'static>, dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        log::warn!("template path {} is not a directory; ignoring", dir.display());
        return Ok(());
    }
    let pattern = format!("{}/*.hbs", glob::Pattern::escape(&dir.to_string_lossy()));
    let entries = match glob::glob(&pattern) {
        Ok(e) => e,
        Err(e) => {
            log::warn!("bad template pattern {}: {}", pattern, e);
            return Ok(());
        }
    };
    for path in entries.flatten() {
        if let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().to_ascii_lowercase()) {
            log::debug!("template {} from {}", stem, path.display());
            registry.register_template_file(&stem, &path)?;
        }
    }
    Ok(())
}

fn str_param(h: &Helper, idx: usize) -> String {
    match h.param(idx).map(|p| p.value()) {
        Some(Json::String(s)) => s.clone(),
        Some(Json::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Numeric helper argument; negative values count by their magnitude.
fn usize_param(h: &Helper, idx: usize) -> Option<usize> {
    let v = h.param(idx)?.value();
    let n = match v {
        Json::Number(n) => n
            .as_u64()
            .or_else(|| n.as_i64().map(i64::unsigned_abs))?,
        Json::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .or_else(|_| s.parse::<i64>().map(i64::unsigned_abs))
                .ok()?
        }
        _ => return None,
    };
    Some(usize::try_from(n).unwrap_or(usize::MAX))
}

/// Wrap a string-producing function as a helper that writes its result.
fn text_helper<F>(f: F) -> Box<dyn HelperDef + Send + Sync>
where
    F: Fn(&Helper) -> String + Send + Sync + 'static,
{
    Box::new(
        move |h: &Helper,
              _: &Handlebars,
              _: &Context,
              _: &mut RenderContext,
              out: &mut dyn Output|
              -> HelperResult {
            out.write(&f(h))?;
            Ok(())
        },
    )
}

fn register_helpers(registry: &mut Handlebars<'static>, docs: Arc<DocResolver>) {
    let titles = Arc::clone(&docs);
    registry.register_helper(
        "change_title",
        text_helper(move |h| titles.resolve_title(&str_param(h, 0))),
    );
    registry.register_helper(
        "online_document",
        text_helper(move |h| docs.resolve_doc_url(&str_param(h, 0))),
    );
    registry.register_helper(
        "line_from_file",
        text_helper(|h| {
            let line = usize_param(h, 1).unwrap_or(0);
            utils::line_from_file(Path::new(&str_param(h, 0)), line)
        }),
    );
    registry.register_helper(
        "lines_from_file",
        text_helper(|h| {
            let line = usize_param(h, 1).unwrap_or(0);
            let before = usize_param(h, 2).unwrap_or(2);
            let after = usize_param(h, 3).unwrap_or(2);
            utils::lines_from_file(Path::new(&str_param(h, 0)), line, before, after)
        }),
    );
    registry.register_helper(
        "filename",
        text_helper(|h| {
            Path::new(&str_param(h, 0))
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default()
        }),
    );
    registry.register_helper(
        "escape_dollar",
        text_helper(|h| str_param(h, 0).replace('$', "\\$")),
    );
    registry.register_helper(
        "relative_path",
        text_helper(|h| {
            let path = str_param(h, 0);
            let base = str_param(h, 1);
            if base.is_empty() {
                return path;
            }
            match pathdiff::diff_paths(&path, &base) {
                Some(rel) if !rel.as_os_str().is_empty() => rel.to_string_lossy().to_string(),
                _ => path,
            }
        }),
    );
}

/// Write the rendered report to `report_file`, or to stdout when `None`.
///
/// The report file's directory must already exist.
pub fn write_report(text: &str, report_file: Option<&Path>) -> Result<()> {
    match report_file {
        Some(path) => {
            let dir = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p,
                _ => Path::new("."),
            };
            if !dir.is_dir() {
                return Err(Error::ReportDirNotFound(dir.to_path_buf()));
            }
            fs::write(path, text)?;
            log::info!("report written to {}", path.display());
            Ok(())
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}
