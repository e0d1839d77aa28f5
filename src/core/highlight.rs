// GrepMark - core/highlight.rs
//
// Multi-word highlight renderer.
//
// Lines are joined into one buffer, markup-escaped, then each highlight
// word in list order rewrites every literal occurrence in the *current*
// buffer. Later words therefore also match text inside spans inserted by
// earlier words (class attributes, tag names, the earlier word itself),
// which nests or duplicates spans. That order-dependent result is the
// intended behaviour and is covered by tests.
//
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::{ColoredWord, RenderedResult, StyleRule};
use crate::util::constants::{HIGHLIGHT_CLASS_PREFIX, LINE_DELIMITER};
use regex::{NoExpand, Regex};

/// Escape markup-sensitive characters.
///
/// Equivalent to replacing `&` first and then `<`, `>`, `"`, `'`, so
/// entities produced here are never escaped twice.
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Assign one class per distinct colour token, in first-seen order.
///
/// The class suffix is the index of the first word carrying that colour,
/// so class names stay stable for a given word list. Words coloured
/// `"none"` and empty words get no class.
pub fn assign_classes(words: &[ColoredWord]) -> Vec<StyleRule> {
    let mut rules: Vec<StyleRule> = Vec::new();
    for (idx, cw) in words.iter().enumerate() {
        if !cw.is_highlighted() || rules.iter().any(|r| r.color == cw.color) {
            continue;
        }
        rules.push(StyleRule {
            color: cw.color.clone(),
            class_name: format!("{HIGHLIGHT_CLASS_PREFIX}{idx}"),
        });
    }
    rules
}

/// Render lines with highlight spans.
///
/// Lines must not contain `LINE_DELIMITER` (`'\n'`); input split with
/// `platform::fs::split_lines` never does. Under that precondition the
/// output has exactly one markup line per input line, in order. A line
/// that does embed the delimiter comes back as several output lines.
///
/// Colour tokens are not validated; unknown tokens end up verbatim in the CSS.
pub fn render<S: AsRef<str>>(lines: &[S], words: &[ColoredWord]) -> RenderedResult {
    let style_rules = assign_classes(words);
    if lines.is_empty() {
        return RenderedResult {
            lines: Vec::new(),
            style_rules,
        };
    }

    let delimiter = LINE_DELIMITER.to_string();
    let joined = lines
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(delimiter.as_str());
    let mut buffer = escape_markup(&joined);

    for cw in words.iter().filter(|cw| cw.is_highlighted()) {
        let Some(rule) = style_rules.iter().find(|r| r.color == cw.color) else {
            continue;
        };
        let replacement = format!("{}{}</span>", rule.open_tag(), cw.word);
        buffer = replace_literal(&buffer, &cw.word, &replacement);
    }

    tracing::debug!(
        lines = lines.len(),
        words = words.len(),
        classes = style_rules.len(),
        "Highlight render complete"
    );

    RenderedResult {
        lines: buffer.split(LINE_DELIMITER).map(str::to_string).collect(),
        style_rules,
    }
}

/// Replace every non-overlapping occurrence of `literal`, scanning left to right.
fn replace_literal(buffer: &str, literal: &str, replacement: &str) -> String {
    match Regex::new(&regex::escape(literal)) {
        Ok(pattern) => pattern
            .replace_all(buffer, NoExpand(replacement))
            .into_owned(),
        Err(e) => {
            // Only reachable when the escaped word exceeds the regex size
            // limit; plain string replacement has identical semantics.
            tracing::debug!(error = %e, len = literal.len(), "Literal pattern too large for regex");
            buffer.replace(literal, replacement)
        }
    }
}
