use tidy_protocol::{AnnotatedToken, AnnotationResult};
use tracing::{debug, warn};

use crate::context::Context;
use crate::error::ReshapeError;
use crate::fields::split_fields;
use crate::line::{classify, Line};

/// What to do with token lines that precede every `# newdoc` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrphanPolicy {
    /// Emit them with no `doc_id`.
    #[default]
    Keep,
    /// Fail the parse with [`ReshapeError::MissingDocument`].
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReshapeOptions {
    pub orphans: OrphanPolicy,
}

impl ReshapeOptions {
    pub fn strict() -> Self {
        Self {
            orphans: OrphanPolicy::Reject,
        }
    }
}

/// Turns CoNLL-U annotation text into one [`AnnotatedToken`] per token line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reshaper {
    options: ReshapeOptions,
}

impl Reshaper {
    pub fn new(options: ReshapeOptions) -> Self {
        Self { options }
    }

    /// Single forward pass over the whole text. Rows come out in line order.
    pub fn reshape(&self, conllu: &str) -> Result<Vec<AnnotatedToken>, ReshapeError> {
        let rows = self.reshape_lines(numbered_lines(conllu))?;
        debug!(rows = rows.len(), "reshaped annotation text");
        Ok(rows)
    }

    /// Reshapes the `conllu` blob of an engine result, logging the documents
    /// the engine reported as failed.
    pub fn reshape_result(&self, result: &AnnotationResult) -> Result<Vec<AnnotatedToken>, ReshapeError> {
        for (doc_id, message) in result.failures() {
            warn!(doc_id, error = message, "engine could not annotate document");
        }
        self.reshape(&result.conllu)
    }

    /// Folds the context over already numbered lines.
    pub(crate) fn reshape_lines<'a, I>(&self, lines: I) -> Result<Vec<AnnotatedToken>, ReshapeError>
    where
        I: IntoIterator<Item = (usize, &'a str)>,
    {
        let (_, rows) = lines.into_iter().try_fold(
            (Context::default(), Vec::new()),
            |(context, mut rows), (number, raw)| {
                let line = classify(raw);
                let context = context.observe(&line);

                if let Line::Data(data) = line {
                    rows.push(self.row(&context, number, data)?);
                }

                Ok::<_, ReshapeError>((context, rows))
            },
        )?;

        Ok(rows)
    }

    fn row(&self, context: &Context, number: usize, data: &str) -> Result<AnnotatedToken, ReshapeError> {
        if !context.in_document() {
            match self.options.orphans {
                OrphanPolicy::Reject => {
                    return Err(ReshapeError::MissingDocument {
                        line: number,
                        content: data.to_owned(),
                    })
                }
                OrphanPolicy::Keep => warn!(line = number, "token line before any document marker"),
            }
        }

        let fields = split_fields(data).map_err(|found| ReshapeError::MalformedRow {
            line: number,
            doc_id: context.doc_id().map(str::to_owned),
            found,
            content: data.to_owned(),
        })?;

        Ok(context.token(fields))
    }
}

/// Lines with their 1-based numbers; a trailing `\r` is dropped from each.
pub fn numbered_lines(conllu: &str) -> impl Iterator<Item = (usize, &str)> {
    conllu
        .split('\n')
        .enumerate()
        .map(|(index, line)| (index + 1, line.strip_suffix('\r').unwrap_or(line)))
}

/// Reshapes with the default options.
pub fn reshape(conllu: &str) -> Result<Vec<AnnotatedToken>, ReshapeError> {
    Reshaper::default().reshape(conllu)
}
