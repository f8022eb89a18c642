use tidy_protocol::{AnnotatedToken, ParagraphId, CONLLU_COLUMNS};

use crate::line::Line;

/// Document, paragraph and sentence context in effect at some point of the
/// annotation text.
///
/// Each value is the last one observed for its marker kind; nothing is reset
/// by blank lines or unrelated comments. A `# newdoc` restarts paragraph
/// numbering for the new document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    doc_id: Option<String>,
    in_document: bool,
    // Number of paragraphs opened so far in the current document.
    paragraph: u32,
    sentence_id: Option<String>,
    sentence_text: Option<String>,
}

impl Context {
    /// Context after `line` has been read.
    pub fn observe(self, line: &Line<'_>) -> Self {
        match *line {
            Line::NewDoc(id) => Self {
                doc_id: id.map(str::to_owned),
                in_document: true,
                paragraph: 0,
                ..self
            },
            Line::NewPar => Self {
                paragraph: self.paragraph + 1,
                ..self
            },
            Line::SentId(id) => Self {
                sentence_id: Some(id.to_owned()),
                ..self
            },
            Line::Text(text) => Self {
                sentence_text: Some(text.to_owned()),
                ..self
            },
            // Tokens before any `# newpar` sit in an implicit first paragraph.
            Line::Data(_) => Self {
                paragraph: self.paragraph.max(1),
                ..self
            },
            Line::Blank | Line::Comment(_) => self,
        }
    }

    pub fn doc_id(&self) -> Option<&str> {
        self.doc_id.as_deref()
    }

    /// Whether a `# newdoc` marker has been seen at all.
    pub fn in_document(&self) -> bool {
        self.in_document
    }

    pub fn paragraph_id(&self) -> ParagraphId {
        ParagraphId::new(self.paragraph.max(1))
    }

    pub fn sentence_id(&self) -> Option<&str> {
        self.sentence_id.as_deref()
    }

    pub fn sentence_text(&self) -> Option<&str> {
        self.sentence_text.as_deref()
    }

    /// Builds a row from a split token line under this context.
    pub fn token(&self, fields: [&str; CONLLU_COLUMNS]) -> AnnotatedToken {
        let [id, form, lemma, upostag, xpostag, feats, head, deprel, deps, misc] = fields.map(str::to_owned);

        AnnotatedToken {
            doc_id: self.doc_id.clone(),
            paragraph_id: self.paragraph_id(),
            sentence_id: self.sentence_id.clone(),
            sentence_text: self.sentence_text.clone(),
            id,
            form,
            lemma,
            upostag,
            xpostag,
            feats,
            head,
            deprel,
            deps,
            misc,
        }
    }
}
