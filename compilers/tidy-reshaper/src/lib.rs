//! CoNLL-U annotation text to tidy token rows.
//!
//! Every token line becomes one [`AnnotatedToken`] carrying the document,
//! paragraph and sentence it was found in. The hierarchy is not stored in the
//! token lines themselves; it is rebuilt from the `# newdoc`, `# newpar`,
//! `# sent_id` and `# text` comment markers by folding a [`Context`] over the
//! lines in order.

pub mod context;
pub mod documents;
pub mod error;
pub mod fields;
pub mod line;
pub mod reshape;

pub use context::Context;
pub use documents::{split_documents, DocumentChunk, DocumentRows};
pub use error::ReshapeError;
pub use line::{classify, Line};
pub use reshape::{reshape, OrphanPolicy, ReshapeOptions, Reshaper};
pub use tidy_protocol::AnnotatedToken;
