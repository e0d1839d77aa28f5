// GrepMark - core/export.rs
//
// Canonical JSON form of a profile body:
//   {"Grep": [...], "Grep_v": [...], "Highlight": [{"word": .., "color": ..}]}
// Export writes compact JSON to any Write sink; import accepts the same
// form and normalises it.
// Core layer: no filesystem access.

use crate::core::model::WordLists;
use crate::util::error::ImportError;
use std::io::Write;

/// Write `words` as canonical compact JSON.
pub fn export_json<W: Write>(words: &WordLists, writer: W) -> serde_json::Result<()> {
    serde_json::to_writer(writer, words)
}

/// Canonical compact JSON as a string.
pub fn export_string(words: &WordLists) -> serde_json::Result<String> {
    serde_json::to_string(words)
}

/// Parse canonical JSON into word lists.
///
/// Missing keys default to empty lists and blank words are dropped, so an
/// imported profile always satisfies the no-empty-word invariant.
pub fn import_json(text: &str) -> Result<WordLists, ImportError> {
    let value: serde_json::Value =
        serde_json::from_str(text.trim()).map_err(|source| ImportError::Json { source })?;
    if !value.is_object() {
        return Err(ImportError::Json {
            source: serde::de::Error::custom("expected a JSON object with Grep, Grep_v and Highlight keys"),
        });
    }
    let words: WordLists =
        serde_json::from_value(value).map_err(|source| ImportError::Json { source })?;
    Ok(words.normalized())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::ColoredWord;

    fn sample() -> WordLists {
        WordLists::new(
            vec!["ERROR".to_string(), "WARN".to_string()],
            vec!["heartbeat".to_string()],
            vec![
                ColoredWord::new("ERROR", "salmon"),
                ColoredWord::new("WARN", "gold"),
                ColoredWord::new("id=", "none"),
            ],
        )
    }

    #[test]
    fn test_export_uses_canonical_keys() {
        let json = export_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"{"Grep":["ERROR","WARN"],"Grep_v":["heartbeat"],"Highlight":[{"word":"ERROR","color":"salmon"},{"word":"WARN","color":"gold"},{"word":"id=","color":"none"}]}"#
        );
    }

    #[test]
    fn test_export_then_import_yields_equal_lists() {
        let original = sample();
        let mut buf = Vec::new();
        export_json(&original, &mut buf).unwrap();
        let imported = import_json(&String::from_utf8(buf).unwrap()).unwrap();
        assert_eq!(imported, original);
    }

    #[test]
    fn test_import_drops_blank_words() {
        let imported =
            import_json(r#"{"Grep":["", "a"],"Grep_v":[" "],"Highlight":[{"word":"","color":"red"}]}"#)
                .unwrap();
        assert_eq!(imported.include, vec!["a"]);
        assert!(imported.exclude.is_empty());
        assert!(imported.highlights.is_empty());
    }

    #[test]
    fn test_import_rejects_garbage() {
        assert!(matches!(
            import_json("not json"),
            Err(ImportError::Json { .. })
        ));
        assert!(matches!(
            import_json(r#"[["a"], [], []]"#),
            Err(ImportError::Json { .. })
        ));
    }
}
