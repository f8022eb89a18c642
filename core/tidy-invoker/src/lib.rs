//! Calls an external annotation engine over a batch of documents.
//!
//! Request-shape problems are rejected before the engine is touched. The
//! engine is then called exactly once; documents it could not annotate are
//! reported through [`AnnotationResult::errors`] rather than as an error, so
//! the rest of the batch stays usable.

pub mod command;
pub mod engine;
pub mod error;
pub mod model;
pub mod request;

pub use command::{CommandEngine, CommandError, CommandModel};
pub use engine::{AnnotationEngine, EngineOutput};
pub use error::{BoxError, InvokerError};
pub use model::{load_model, ModelHandle};
pub use request::AnnotationRequest;
pub use tidy_protocol::AnnotationResult;

use tracing::{debug, warn};

/// Annotates every document of `request` with a single engine call.
pub fn annotate<E: AnnotationEngine>(
    engine: &E,
    handle: &ModelHandle<E::Model>,
    request: AnnotationRequest,
) -> Result<AnnotationResult, InvokerError> {
    if !engine.is_loaded(handle.model()) {
        return Err(InvokerError::InvalidModel {
            path: handle.path().to_path_buf(),
        });
    }

    debug!(model = %handle.path().display(), documents = request.len(), "annotating batch");
    let output = engine
        .annotate(handle.model(), &request)
        .map_err(|source| InvokerError::Engine {
            path: handle.path().to_path_buf(),
            source: Box::new(source),
        })?;

    let expected = request.len();
    let errors = match output.errors.len() {
        0 => vec![None; expected],
        found if found == expected => output.errors,
        found => return Err(InvokerError::EngineContract { expected, found }),
    };

    let (doc_ids, texts) = request.into_parts();
    for (doc_id, error) in doc_ids.iter().zip(&errors) {
        if let Some(message) = error {
            warn!(doc_id = doc_id.as_str(), error = message.as_str(), "document was not annotated");
        }
    }

    Ok(AnnotationResult {
        doc_ids,
        texts,
        conllu: output.conllu,
        errors,
    })
}

/// [`annotate`] over parallel id and text vectors.
pub fn annotate_texts<E: AnnotationEngine>(
    engine: &E,
    handle: &ModelHandle<E::Model>,
    texts: Vec<String>,
    doc_ids: Vec<String>,
) -> Result<AnnotationResult, InvokerError> {
    annotate(engine, handle, AnnotationRequest::new(doc_ids, texts)?)
}
