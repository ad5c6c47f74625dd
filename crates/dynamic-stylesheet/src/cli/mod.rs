//! Logic behind the command-line entry points.
//!
//! - `css-diff`:  diff batch between two literal-content documents
//! - `css-patch`: replay a diff batch onto stylesheet text

use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::codec::json::{from_json_diff, to_json_diff};
use crate::css_in_js;
use crate::cssom::{apply_diff, StyleSheet};
use crate::stylesheet_diff::diff_trees;

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Stylesheet(#[from] crate::Error),
}

impl CliError {
    fn stylesheet(err: impl Into<crate::Error>) -> Self {
        CliError::Stylesheet(err.into())
    }
}

pub fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.display().to_string(),
        source,
    })
}

// ── css-diff ──────────────────────────────────────────────────────────────

/// Diff batch turning the `before` document into `after`, as pretty JSON.
pub fn diff_documents(before: &str, after: &str) -> Result<String, CliError> {
    let before: Value = serde_json::from_str(before)?;
    let after: Value = serde_json::from_str(after)?;
    let lhs = css_in_js::parse(&before).map_err(CliError::stylesheet)?;
    let rhs = css_in_js::parse(&after).map_err(CliError::stylesheet)?;
    let diff = diff_trees(Some(&lhs), &rhs);
    tracing::debug!(edits = diff.len(), "computed diff");
    Ok(serde_json::to_string_pretty(&to_json_diff(&diff))?)
}

// ── css-patch ─────────────────────────────────────────────────────────────

/// Replays the JSON diff batch onto `css` and returns the resulting text.
pub fn patch_stylesheet(css: &str, diff_json: &str) -> Result<String, CliError> {
    let mut sheet = StyleSheet::from_css("stdin", css).map_err(CliError::stylesheet)?;
    let diff = from_json_diff(&serde_json::from_str(diff_json)?).map_err(CliError::stylesheet)?;
    apply_diff(&mut sheet, &diff).map_err(CliError::stylesheet)?;
    Ok(sheet.css_text())
}
