// GrepMark - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers. The serde
// field names are the canonical profile JSON keys ("Grep", "Grep_v",
// "Highlight") so the same shape is used for export, the store tiers and
// the session snapshot.

use crate::util::constants::{HIGHLIGHT_BASE_CLASS, NO_COLOR};
use serde::{Deserialize, Serialize};

// =============================================================================
// Words
// =============================================================================

/// Returns true for words that must never reach a word list
/// (empty or whitespace-only).
pub fn is_blank(word: &str) -> bool {
    word.trim().is_empty()
}

/// Drop blank words, keeping order and duplicates.
pub fn normalize_words(words: Vec<String>) -> Vec<String> {
    words.into_iter().filter(|w| !is_blank(w)).collect()
}

/// Drop colored words whose word is blank, keeping order and duplicates.
pub fn normalize_colored(words: Vec<ColoredWord>) -> Vec<ColoredWord> {
    words.into_iter().filter(|w| !is_blank(&w.word)).collect()
}

/// A highlight target paired with a display colour token.
///
/// The colour is opaque: any CSS colour name or value is passed through
/// untouched. The token `"none"` disables highlighting for the word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColoredWord {
    pub word: String,
    pub color: String,
}

impl ColoredWord {
    pub fn new(word: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            color: color.into(),
        }
    }

    /// True when this word should produce highlight markup.
    pub fn is_highlighted(&self) -> bool {
        !self.word.is_empty() && self.color != NO_COLOR
    }
}

// =============================================================================
// Word lists (profile body)
// =============================================================================

/// Include, exclude and highlight lists: the body of a profile or
/// session snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordLists {
    /// Lines must contain at least one of these (empty = no constraint).
    #[serde(rename = "Grep", default)]
    pub include: Vec<String>,

    /// Lines must contain none of these (empty = no constraint).
    #[serde(rename = "Grep_v", default)]
    pub exclude: Vec<String>,

    /// Words to highlight in surviving lines, in application order.
    #[serde(rename = "Highlight", default)]
    pub highlights: Vec<ColoredWord>,
}

impl WordLists {
    /// Build word lists with blank words removed.
    pub fn new(include: Vec<String>, exclude: Vec<String>, highlights: Vec<ColoredWord>) -> Self {
        Self {
            include,
            exclude,
            highlights,
        }
        .normalized()
    }

    /// Remove blank words from every list.
    pub fn normalized(self) -> Self {
        Self {
            include: normalize_words(self.include),
            exclude: normalize_words(self.exclude),
            highlights: normalize_colored(self.highlights),
        }
    }

    /// Returns true if all three lists are empty.
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty() && self.highlights.is_empty()
    }
}

// =============================================================================
// Profile and session snapshot
// =============================================================================

/// A named, persisted bundle of word lists.
///
/// Name uniqueness is enforced by the store's keying, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub words: WordLists,
}

impl Profile {
    pub fn new(name: impl Into<String>, words: WordLists) -> Self {
        Self {
            name: name.into(),
            words,
        }
    }
}

/// The single unnamed "current state" slot. `setting_name` is the name
/// last typed or loaded by the user and may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(rename = "settingName", default)]
    pub setting_name: String,

    #[serde(flatten)]
    pub words: WordLists,
}

// =============================================================================
// Rendering output
// =============================================================================

/// A generated CSS class bound to one colour token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    pub color: String,
    pub class_name: String,
}

impl StyleRule {
    /// CSS for this class.
    ///
    /// The colour is painted by an absolutely positioned `::before`
    /// pseudo-element behind the text, so the span never changes glyph
    /// metrics, spacing or wrapping of the line it sits in.
    pub fn to_css(&self) -> String {
        format!(
            ".{class} {{\n  position: relative;\n  display: inline;\n}}\n\
             .{class}::before {{\n  content: '';\n  position: absolute;\n  inset: 0;\n  \
             background-color: {color};\n  z-index: -1;\n  border-radius: 2px;\n}}\n",
            class = self.class_name,
            color = self.color,
        )
    }

    /// Opening tag of a highlight span carrying this rule's class.
    pub fn open_tag(&self) -> String {
        format!(
            "<span class=\"{HIGHLIGHT_BASE_CLASS} {}\">",
            self.class_name
        )
    }
}

/// Highlighter output: one markup line per surviving input line, plus
/// the style rules those lines reference (in first-seen order).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedResult {
    pub lines: Vec<String>,
    pub style_rules: Vec<StyleRule>,
}

impl RenderedResult {
    /// Generated class name for a colour token, if one was assigned.
    pub fn class_for(&self, color: &str) -> Option<&str> {
        self.style_rules
            .iter()
            .find(|r| r.color == color)
            .map(|r| r.class_name.as_str())
    }
}
