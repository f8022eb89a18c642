use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReshapeError {
    /// A token line without exactly ten tab-separated fields.
    #[error(
        "malformed token line {line} in document {}: expected 10 tab-separated fields, found {found}: {content:?}",
        .doc_id.as_deref().unwrap_or("<none>")
    )]
    MalformedRow {
        line: usize,
        doc_id: Option<String>,
        found: usize,
        content: String,
    },
    /// A token line before any `# newdoc` marker while orphans are rejected.
    #[error("token line {line} appears before any `# newdoc` marker: {content:?}")]
    MissingDocument { line: usize, content: String },
}

impl ReshapeError {
    /// 1-based line number in the annotation text.
    pub fn line(&self) -> usize {
        match self {
            ReshapeError::MalformedRow { line, .. } | ReshapeError::MissingDocument { line, .. } => *line,
        }
    }
}
