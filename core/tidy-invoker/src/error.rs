use std::path::PathBuf;

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum InvokerError {
    #[error("model path `{}` is not absolute", .path.display())]
    InvalidPath { path: PathBuf },
    #[error("model file `{}` does not exist", .path.display())]
    FileNotFound { path: PathBuf },
    #[error("engine could not load model `{}`: {source}", .path.display())]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
    #[error("model `{}` is not loaded", .path.display())]
    InvalidModel { path: PathBuf },
    #[error("request has {texts} texts but {doc_ids} document ids")]
    ArityMismatch { texts: usize, doc_ids: usize },
    #[error("{field} #{index} (document {}) is not valid UTF-8", .doc_id.as_deref().unwrap_or("<unknown>"))]
    NotText {
        field: &'static str,
        index: usize,
        doc_id: Option<String>,
    },
    #[error("engine returned {found} error slots for {expected} documents")]
    EngineContract { expected: usize, found: usize },
    #[error("annotation with model `{}` failed: {source}", .path.display())]
    Engine {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
}
