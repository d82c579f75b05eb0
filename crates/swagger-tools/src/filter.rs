//! Operation filtering policy.
//!
//! A [`FilterPolicy`] decides per operation whether it becomes a tool. Include-only rules are
//! strict allow-lists and are evaluated before any exclude rule; the full rule order is fixed
//! and short-circuits on the first match.

use crate::spec::Operation;
use serde::{Deserialize, Serialize};

/// Inclusion/exclusion rules restricting which operations become tools.
///
/// Configured once at startup and read-only thereafter.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPolicy {
    /// If non-empty, only these exact paths are converted.
    #[serde(default)]
    pub include_only_paths: Vec<String>,

    /// If non-empty, only operations with one of these ids are converted.
    #[serde(default)]
    pub include_only_operation_ids: Vec<String>,

    /// Exact paths to exclude.
    #[serde(default)]
    pub exclude_paths: Vec<String>,

    /// Glob-style path patterns to exclude (`*` matches within a single segment).
    #[serde(default)]
    pub exclude_path_patterns: Vec<String>,

    /// Operation ids to exclude.
    #[serde(default)]
    pub exclude_operation_ids: Vec<String>,

    /// HTTP methods to exclude (case-insensitive).
    #[serde(default)]
    pub exclude_methods: Vec<String>,

    /// Tags to exclude (case-insensitive).
    #[serde(default)]
    pub exclude_tags: Vec<String>,
}

impl FilterPolicy {
    /// True when the policy has no rules at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.include_only_paths.is_empty()
            && self.include_only_operation_ids.is_empty()
            && self.exclude_paths.is_empty()
            && self.exclude_path_patterns.is_empty()
            && self.exclude_operation_ids.is_empty()
            && self.exclude_methods.is_empty()
            && self.exclude_tags.is_empty()
    }

    /// Decide whether an operation is excluded from tool conversion.
    ///
    /// Rules short-circuit in order: include-only paths, include-only operation ids, exact
    /// excluded paths, excluded path patterns, excluded operation ids, excluded methods,
    /// excluded tags.
    #[must_use]
    pub fn should_exclude(&self, method: &str, path: &str, operation: &Operation) -> bool {
        if !self.include_only_paths.is_empty()
            && !self.include_only_paths.iter().any(|p| p == path)
        {
            return true;
        }

        if !self.include_only_operation_ids.is_empty()
            && let Some(id) = operation.id()
            && !self.include_only_operation_ids.iter().any(|x| x == id)
        {
            return true;
        }

        if self.exclude_paths.iter().any(|p| p == path) {
            return true;
        }

        if self
            .exclude_path_patterns
            .iter()
            .any(|pattern| path_pattern_matches(pattern, path))
        {
            return true;
        }

        if let Some(id) = operation.id()
            && self.exclude_operation_ids.iter().any(|x| x == id)
        {
            return true;
        }

        if self
            .exclude_methods
            .iter()
            .any(|m| m.eq_ignore_ascii_case(method))
        {
            return true;
        }

        if operation.tags.iter().any(|tag| {
            self.exclude_tags
                .iter()
                .any(|excluded| excluded.eq_ignore_ascii_case(tag))
        }) {
            return true;
        }

        false
    }
}

/// Match a path against an exclusion pattern.
///
/// Path-template segments of the form `{...}` in the pattern are normalized to `*` first, then
/// glob matching is applied segment-aware: `*` and `?` never consume a `/`.
#[must_use]
pub fn path_pattern_matches(pattern: &str, path: &str) -> bool {
    if pattern.contains('{') {
        let normalized: Vec<&str> = pattern
            .split('/')
            .map(|segment| {
                if segment.starts_with('{') && segment.ends_with('}') {
                    "*"
                } else {
                    segment
                }
            })
            .collect();
        glob_match(&normalized.join("/"), path)
    } else {
        glob_match(pattern, path)
    }
}

fn glob_match(pattern: &str, text: &str) -> bool {
    // Byte-wise glob matching:
    //   * => any sequence not containing '/'
    //   ? => any single character except '/'
    let pattern_bytes = pattern.as_bytes();
    let text_bytes = text.as_bytes();

    let mut pattern_index = 0usize;
    let mut text_index = 0usize;

    let mut star_index: Option<usize> = None;
    let mut star_text_index: usize = 0;

    while text_index < text_bytes.len() {
        match pattern_bytes.get(pattern_index) {
            Some(b'*') => {
                star_index = Some(pattern_index);
                pattern_index += 1;
                star_text_index = text_index;
            }
            Some(b'?') if text_bytes[text_index] != b'/' => {
                pattern_index += 1;
                text_index += 1;
            }
            Some(&b) if b != b'*' && b != b'?' && b == text_bytes[text_index] => {
                pattern_index += 1;
                text_index += 1;
            }
            _ => {
                let Some(si) = star_index else {
                    return false;
                };

                // A star never crosses a segment boundary.
                if text_bytes[star_text_index] == b'/' {
                    return false;
                }

                pattern_index = si + 1;
                star_text_index += 1;
                text_index = star_text_index;
            }
        }
    }

    while matches!(pattern_bytes.get(pattern_index), Some(b'*')) {
        pattern_index += 1;
    }

    pattern_index == pattern_bytes.len()
}
