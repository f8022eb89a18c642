use tidy_protocol::AnnotatedToken;
use tracing::warn;

use crate::error::ReshapeError;
use crate::line::{classify, Line};
use crate::reshape::{numbered_lines, Reshaper};

/// The lines of one document, starting at its `# newdoc` marker.
///
/// Lines before the first marker form a leading chunk with `doc_id: None`
/// and `preamble: true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChunk<'a> {
    pub doc_id: Option<&'a str>,
    pub preamble: bool,
    pub lines: Vec<(usize, &'a str)>,
}

impl DocumentChunk<'_> {
    pub fn first_line(&self) -> usize {
        self.lines.first().map_or(0, |(number, _)| *number)
    }

    pub fn has_tokens(&self) -> bool {
        self.lines.iter().any(|(_, line)| classify(line).is_data())
    }
}

/// Rows of one document, or the error that stopped it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRows {
    pub doc_id: Option<String>,
    pub first_line: usize,
    pub rows: Result<Vec<AnnotatedToken>, ReshapeError>,
}

/// Cuts annotation text at every `# newdoc` line.
pub fn split_documents(conllu: &str) -> Vec<DocumentChunk<'_>> {
    numbered_lines(conllu).fold(Vec::<DocumentChunk>::new(), |mut chunks, (number, raw)| {
        if let Line::NewDoc(doc_id) = classify(raw) {
            chunks.push(DocumentChunk {
                doc_id,
                preamble: false,
                lines: vec![(number, raw)],
            });
        } else if let Some(chunk) = chunks.last_mut() {
            chunk.lines.push((number, raw));
        } else {
            chunks.push(DocumentChunk {
                doc_id: None,
                preamble: true,
                lines: vec![(number, raw)],
            });
        }
        chunks
    })
}

impl Reshaper {
    /// Reshapes every document on its own, so a malformed line only costs the
    /// document it belongs to. Context does not carry over between documents.
    ///
    /// A preamble without token lines is skipped.
    pub fn reshape_documents(&self, conllu: &str) -> Vec<DocumentRows> {
        split_documents(conllu)
            .into_iter()
            .filter(|chunk| !chunk.preamble || chunk.has_tokens())
            .map(|chunk| {
                let rows = self.reshape_lines(chunk.lines.iter().copied());
                if let Err(err) = &rows {
                    warn!(doc_id = chunk.doc_id, error = %err, "document could not be reshaped");
                }

                DocumentRows {
                    doc_id: chunk.doc_id.map(str::to_owned),
                    first_line: chunk.first_line(),
                    rows,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reshape::{reshape, ReshapeOptions};

    const TWO_DOCS: &str = "# newdoc id = a\n# sent_id = 1\n1\tx\tx\tX\t_\t_\t0\troot\t_\t_\n\n\
                            # newdoc id = b\n# sent_id = 1\n1\ty\ty\tX\t_\t_\t0\troot\t_\n\n\
                            # newdoc id = c\n# sent_id = 1\n1\tz\tz\tX\t_\t_\t0\troot\t_\t_\n";

    #[test]
    fn test_split_documents() {
        let chunks = split_documents("# generator = x\n\n# newdoc id = a\n1\n# newdoc\n2\n");

        assert_eq!(chunks.len(), 3);
        assert!(chunks[0].preamble);
        assert!(!chunks[0].has_tokens());
        assert_eq!(chunks[1].doc_id, Some("a"));
        assert_eq!(chunks[1].first_line(), 3);
        assert_eq!(chunks[1].lines, vec![(3, "# newdoc id = a"), (4, "1")]);
        assert_eq!(chunks[2].doc_id, None);
        assert!(!chunks[2].preamble);
    }

    #[test]
    fn test_malformed_document_is_isolated() {
        let documents = Reshaper::default().reshape_documents(TWO_DOCS);

        assert_eq!(documents.len(), 3);
        assert_eq!(documents[0].doc_id.as_deref(), Some("a"));
        assert_eq!(documents[0].rows.as_ref().unwrap().len(), 1);

        let err = documents[1].rows.as_ref().unwrap_err();
        // Line numbers stay relative to the whole text.
        assert_eq!(err.line(), 7);
        assert_eq!(documents[1].first_line, 5);

        let rows = documents[2].rows.as_ref().unwrap();
        assert_eq!(rows[0].form, "z");
        assert_eq!(rows[0].doc_id.as_deref(), Some("c"));

        // The global pass fails on the same line.
        assert_eq!(reshape(TWO_DOCS).unwrap_err().line(), 7);
    }

    #[test]
    fn test_preamble_tokens_follow_orphan_policy() {
        let text = "1\tx\tx\tX\t_\t_\t0\troot\t_\t_\n# newdoc id = a\n1\ty\ty\tX\t_\t_\t0\troot\t_\t_\n";

        let documents = Reshaper::default().reshape_documents(text);
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].doc_id, None);
        assert!(documents[0].rows.is_ok());

        let documents = Reshaper::new(ReshapeOptions::strict()).reshape_documents(text);
        assert!(documents[0].rows.is_err());
        assert!(documents[1].rows.is_ok());
    }
}
