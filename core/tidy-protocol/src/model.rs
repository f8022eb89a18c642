use alloc::string::String;
use alloc::vec::Vec;

use rkyv::{Archive, Deserialize, Serialize};

use crate::columns::{Column, CONLLU_COLUMNS};
use crate::ids::ParagraphId;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// Format version written into every [`TokenTable`].
pub const TABLE_VERSION: u32 = 1;

/// One annotated token together with the document, paragraph and sentence
/// it was found in.
///
/// Context fields are `None` until a marker of their kind has been seen.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct AnnotatedToken {
    pub doc_id: Option<String>,
    pub paragraph_id: ParagraphId,
    pub sentence_id: Option<String>,
    pub sentence_text: Option<String>,
    pub id: String,
    pub form: String,
    pub lemma: String,
    pub upostag: String,
    pub xpostag: String,
    pub feats: String,
    pub head: String,
    pub deprel: String,
    pub deps: String,
    pub misc: String,
}

impl AnnotatedToken {
    pub fn field(&self, column: Column) -> &str {
        match column {
            Column::Id => &self.id,
            Column::Form => &self.form,
            Column::Lemma => &self.lemma,
            Column::UPosTag => &self.upostag,
            Column::XPosTag => &self.xpostag,
            Column::Feats => &self.feats,
            Column::Head => &self.head,
            Column::DepRel => &self.deprel,
            Column::Deps => &self.deps,
            Column::Misc => &self.misc,
        }
    }

    /// The ten token columns in file order.
    pub fn fields(&self) -> [&str; CONLLU_COLUMNS] {
        Column::ALL.map(|column| self.field(column))
    }

    /// Rebuilds the tab-separated data line this row was read from.
    pub fn to_conllu_line(&self) -> String {
        self.fields().join("\t")
    }

    /// Multiword token ranges such as `1-2`.
    pub fn is_multiword(&self) -> bool {
        self.id.contains('-')
    }

    /// Empty nodes of the enhanced graph such as `8.1`.
    pub fn is_empty_node(&self) -> bool {
        self.id.contains('.')
    }
}

/// What a single engine call produced for a batch of documents.
///
/// `errors[i]` belongs to `doc_ids[i]` / `texts[i]`; `conllu` covers the
/// whole batch in request order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct AnnotationResult {
    pub doc_ids: Vec<String>,
    pub texts: Vec<String>,
    pub conllu: String,
    pub errors: Vec<Option<String>>,
}

impl AnnotationResult {
    /// `(doc_id, message)` for every document the engine could not annotate.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.doc_ids
            .iter()
            .zip(self.errors.iter())
            .filter_map(|(doc_id, error)| error.as_deref().map(|message| (doc_id.as_str(), message)))
    }

    pub fn is_clean(&self) -> bool {
        self.errors.iter().all(Option::is_none)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct TokenTable {
    pub version: u32,
    pub rows: Vec<AnnotatedToken>,
}

impl TokenTable {
    pub fn new(rows: Vec<AnnotatedToken>) -> Self {
        Self {
            version: TABLE_VERSION,
            rows,
        }
    }
}
