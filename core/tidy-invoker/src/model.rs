use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::engine::AnnotationEngine;
use crate::error::InvokerError;

/// A model loaded by an [`AnnotationEngine`], together with the file it came from.
///
/// Only the path is exposed; the model itself is handed back to the engine
/// that produced it.
pub struct ModelHandle<M> {
    path: PathBuf,
    model: M,
}

impl<M> ModelHandle<M> {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn model(&self) -> &M {
        &self.model
    }
}

impl<M> fmt::Debug for ModelHandle<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle").field("path", &self.path).finish_non_exhaustive()
    }
}

/// Checks `path` and asks `engine` to load the model stored there.
pub fn load_model<E: AnnotationEngine>(engine: &E, path: impl AsRef<Path>) -> Result<ModelHandle<E::Model>, InvokerError> {
    let path = path.as_ref();

    if !path.is_absolute() {
        return Err(InvokerError::InvalidPath { path: path.to_path_buf() });
    }
    if !path.is_file() {
        return Err(InvokerError::FileNotFound { path: path.to_path_buf() });
    }

    let model = engine.load(path).map_err(|source| InvokerError::ModelLoad {
        path: path.to_path_buf(),
        source: Box::new(source),
    })?;
    debug!(model = %path.display(), "loaded annotation model");

    Ok(ModelHandle {
        path: path.to_path_buf(),
        model,
    })
}
