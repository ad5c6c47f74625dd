//! Diff batch replay against a live [`RuleList`].
//!
//! Edits are replayed strictly in order; each path is read against the
//! collection as left by the edits before it. A failing edit stops the batch
//! and leaves earlier edits applied.

use super::{CssomError, LiveRuleMut, RuleList};
use crate::stylesheet_diff::Edit;

// ── Path navigation ───────────────────────────────────────────────────────

/// Descends through the groups at `steps`. Intermediate groups must exist.
fn container<'a>(
    list: &'a mut dyn RuleList,
    steps: &[usize],
    path: &[usize],
) -> Result<&'a mut dyn RuleList, CssomError> {
    let Some((&first, rest)) = steps.split_first() else {
        return Ok(list);
    };
    match list.get_mut(first) {
        Some(LiveRuleMut::Group(group)) => container(group, rest, path),
        _ => Err(CssomError::InvalidPath(path.to_vec())),
    }
}

/// The list holding the addressed rule, and the rule's index in it.
fn parent_of<'a>(
    list: &'a mut dyn RuleList,
    path: &[usize],
) -> Result<(&'a mut dyn RuleList, usize), CssomError> {
    let (&last, init) = path
        .split_last()
        .ok_or_else(|| CssomError::InvalidPath(Vec::new()))?;
    Ok((container(list, init, path)?, last))
}

// ── Replay ────────────────────────────────────────────────────────────────

/// Applies one edit.
pub fn apply_edit(list: &mut dyn RuleList, edit: &Edit) -> Result<(), CssomError> {
    tracing::trace!(kind = edit.type_name(), path = ?edit.path(), "applying edit");
    match edit {
        Edit::Raw { path, value } => {
            let (parent, idx) = parent_of(list, path)?;
            parent.insert_rule(value, idx)?;
        }
        Edit::Node { path, value: None } => {
            let (parent, idx) = parent_of(list, path)?;
            parent.delete_rule(idx)?;
        }
        Edit::Node {
            path,
            value: Some(text),
        } => {
            let (parent, idx) = parent_of(list, path)?;
            if idx < parent.len() {
                parent.delete_rule(idx)?;
            }
            parent.insert_rule(text, idx)?;
        }
        Edit::Properties { path, value } => {
            let (parent, idx) = parent_of(list, path)?;
            let len = parent.len();
            let style = match parent.get_mut(idx) {
                Some(LiveRuleMut::Style(style)) => style,
                Some(LiveRuleMut::Group(_)) => return Err(CssomError::NotAStyleRule(path.clone())),
                None => return Err(CssomError::IndexSize { index: idx, len }),
            };
            for (property, change) in value {
                match change {
                    Some(v) => style.set_property(property, v),
                    None => {
                        style.remove_property(property);
                    }
                }
            }
        }
    }
    Ok(())
}

/// Applies a batch in order, stopping at the first failing edit.
pub fn apply_diff(list: &mut dyn RuleList, diff: &[Edit]) -> Result<(), CssomError> {
    for (i, edit) in diff.iter().enumerate() {
        if let Err(err) = apply_edit(list, edit) {
            tracing::warn!(edit = i, error = %err, "diff replay stopped; live rules out of sync");
            return Err(err);
        }
    }
    tracing::debug!(edits = diff.len(), "replayed diff");
    Ok(())
}
