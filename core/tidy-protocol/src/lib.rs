#![no_std] // The wasm surface links this crate without std

extern crate alloc;

// Enable std if the feature is active (for tests/tools)
#[cfg(feature = "std")]
extern crate std;

pub mod columns;
pub mod ids;

// Re-export core types for convenience
pub use columns::{Column, CONLLU_COLUMNS, TABLE_COLUMNS};
pub use ids::ParagraphId;

pub mod model;
pub use model::*;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::{String, ToString};
    use alloc::vec;
    use rkyv::{from_bytes, to_bytes};

    fn token(id: &str) -> AnnotatedToken {
        AnnotatedToken {
            doc_id: Some("d1".to_string()),
            paragraph_id: ParagraphId::FIRST,
            sentence_id: Some("1".to_string()),
            sentence_text: None,
            id: id.to_string(),
            form: "Hi".to_string(),
            lemma: "hi".to_string(),
            upostag: "INTJ".to_string(),
            xpostag: "_".to_string(),
            feats: "_".to_string(),
            head: "0".to_string(),
            deprel: "root".to_string(),
            deps: "_".to_string(),
            misc: "SpaceAfter=No".to_string(),
        }
    }

    #[test]
    fn test_table_serialization() {
        let original = TokenTable::new(vec![token("1"), token("2")]);

        let bytes = to_bytes::<_, 1024>(&original).expect("Failed to serialize TokenTable");

        // Simulate loading a table written by the cli
        let deserialized: TokenTable = from_bytes(&bytes).expect("Failed to deserialize TokenTable");

        assert_eq!(original, deserialized);
        assert_eq!(deserialized.version, TABLE_VERSION);
    }

    #[test]
    fn test_paragraph_id_layout() {
        assert_eq!(core::mem::size_of::<ParagraphId>(), 4);
        assert_eq!(ParagraphId::FIRST, ParagraphId::new(1));
    }

    #[test]
    fn test_conllu_line_and_fields() {
        let row = token("1");
        assert_eq!(row.to_conllu_line(), "1\tHi\thi\tINTJ\t_\t_\t0\troot\t_\tSpaceAfter=No");
        assert_eq!(row.field(Column::DepRel), "root");
        assert_eq!(row.fields().len(), CONLLU_COLUMNS);
        assert_eq!(TABLE_COLUMNS[4..], Column::ALL.map(Column::name));
    }

    #[test]
    fn test_token_kinds() {
        assert!(token("1-2").is_multiword());
        assert!(token("8.1").is_empty_node());
        assert!(!token("3").is_multiword());
        assert!(!token("3").is_empty_node());
    }

    #[test]
    fn test_result_failures() {
        let result = AnnotationResult {
            doc_ids: vec!["a".to_string(), "b".to_string()],
            texts: vec![String::new(), String::new()],
            conllu: String::new(),
            errors: vec![None, Some("empty document".to_string())],
        };

        let failures: vec::Vec<_> = result.failures().collect();
        assert_eq!(failures, vec![("b", "empty document")]);
        assert!(!result.is_clean());
    }
}
