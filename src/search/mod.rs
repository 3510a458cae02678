//! Find and replace over the editor text.
//!
//! All functions are pure: they take the current text and return match
//! locations or a new text. Offsets are char offsets, matching the editor
//! buffer. Case-insensitive matching folds each char on its own so that
//! offsets in the folded view line up one-to-one with the original text.

use std::ops::Range;

use crate::editor::format::{Edit, splice};
use crate::editor::Selection;

/// Inputs of the find & replace dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    pub replacement: String,
    pub case_sensitive: bool,
}

impl SearchState {
    pub fn new(query: impl Into<String>, replacement: impl Into<String>, case_sensitive: bool) -> Self {
        Self {
            query: query.into(),
            replacement: replacement.into(),
            case_sensitive,
        }
    }

    pub fn find_next(&self, text: &str, from: usize) -> Option<Range<usize>> {
        find_next(text, &self.query, from, self.case_sensitive)
    }

    pub fn replace_all(&self, text: &str) -> (String, usize) {
        replace_all(text, &self.query, &self.replacement, self.case_sensitive)
    }
}

/// Find the next occurrence of `query` at or after char offset `from`.
///
/// When nothing matches before the end of the text, the search wraps and
/// scans once from the start. Returns `None` only when `query` does not occur
/// anywhere, or when `query` is empty.
pub fn find_next(text: &str, query: &str, from: usize, case_sensitive: bool) -> Option<Range<usize>> {
    if query.is_empty() {
        return None;
    }
    let hay = fold(text, case_sensitive);
    let needle = fold(query, case_sensitive);
    let from = from.min(hay.len());

    scan(&hay, &needle, from)
        .or_else(|| scan(&hay, &needle, 0))
        .map(|start| start..start + needle.len())
}

/// All non-overlapping matches, scanning left to right.
pub fn find_all(text: &str, query: &str, case_sensitive: bool) -> Vec<Range<usize>> {
    if query.is_empty() {
        return Vec::new();
    }
    let hay = fold(text, case_sensitive);
    let needle = fold(query, case_sensitive);
    let mut matches = Vec::new();
    let mut i = 0;
    while let Some(start) = scan(&hay, &needle, i) {
        matches.push(start..start + needle.len());
        i = start + needle.len();
    }
    matches
}

/// Replace the selected range with the replacement text.
///
/// With no active selection, the next match after the cursor is selected
/// first. The selected text is replaced as-is, whether or not it matches the
/// query. Returns `None` when there is nothing to replace.
pub fn replace_one(text: &str, selection: Selection, search: &SearchState) -> Option<Edit> {
    let target = if selection.is_empty() {
        let found = search.find_next(text, selection.end)?;
        Selection::from(found)
    } else {
        selection
    };
    Some(splice(text, target, &search.replacement))
}

/// Replace every non-overlapping match of `query`.
///
/// In case-insensitive mode the match is found on lowercased text, but the
/// replacement is always inserted with its own casing. Returns the new text
/// and the number of replacements.
pub fn replace_all(text: &str, query: &str, replacement: &str, case_sensitive: bool) -> (String, usize) {
    if query.is_empty() {
        return (text.to_string(), 0);
    }
    let original: Vec<char> = text.chars().collect();
    let hay = fold(text, case_sensitive);
    let needle = fold(query, case_sensitive);

    let mut out = String::with_capacity(text.len());
    let mut count = 0;
    let mut i = 0;
    while let Some(start) = scan(&hay, &needle, i) {
        out.extend(&original[i..start]);
        out.push_str(replacement);
        count += 1;
        i = start + needle.len();
    }
    out.extend(&original[i..]);
    (out, count)
}

fn fold(text: &str, case_sensitive: bool) -> Vec<char> {
    if case_sensitive {
        text.chars().collect()
    } else {
        text.chars().map(fold_char).collect()
    }
}

fn fold_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(single), None) => single,
        // Multi-char lowercase forms (e.g. 'İ') keep their original char.
        _ => c,
    }
}

fn scan(hay: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() || needle.len() > hay.len() {
        return None;
    }
    let last = hay.len() - needle.len();
    (from..=last).find(|&i| hay[i..i + needle.len()] == *needle)
}
