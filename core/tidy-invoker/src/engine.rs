use std::path::Path;

use serde::Deserialize;

use crate::request::AnnotationRequest;

/// What the engine hands back for a whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct EngineOutput {
    /// Annotation text for all documents, in request order.
    pub conllu: String,
    /// Per-document failures; may be left empty when every document succeeded.
    #[serde(default)]
    pub errors: Vec<Option<String>>,
}

/// The external tokenizer/tagger/parser.
///
/// Implementations own the model representation; the invoker only ever sees
/// it through a [`ModelHandle`](crate::ModelHandle).
pub trait AnnotationEngine {
    type Model;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Loads the model stored at `path`. The path has already been checked to
    /// be absolute and to name an existing file.
    fn load(&self, path: &Path) -> Result<Self::Model, Self::Error>;

    /// Whether `model` can still be used for annotation.
    fn is_loaded(&self, _model: &Self::Model) -> bool {
        true
    }

    /// Annotates every document of `request` in one call.
    fn annotate(&self, model: &Self::Model, request: &AnnotationRequest) -> Result<EngineOutput, Self::Error>;
}
