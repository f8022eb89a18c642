use serde::Serialize;

use crate::error::InvokerError;

/// Parallel document ids and texts for one engine call.
///
/// Ids are expected to be unique but this is not checked.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AnnotationRequest {
    doc_ids: Vec<String>,
    texts: Vec<String>,
}

impl AnnotationRequest {
    pub fn new(doc_ids: Vec<String>, texts: Vec<String>) -> Result<Self, InvokerError> {
        check_arity(doc_ids.len(), texts.len())?;
        Ok(Self { doc_ids, texts })
    }

    /// Builds a request from raw bytes, rejecting anything that is not UTF-8.
    pub fn from_bytes(doc_ids: Vec<Vec<u8>>, texts: Vec<Vec<u8>>) -> Result<Self, InvokerError> {
        check_arity(doc_ids.len(), texts.len())?;

        let doc_ids = doc_ids
            .into_iter()
            .enumerate()
            .map(|(index, bytes)| {
                String::from_utf8(bytes).map_err(|_| InvokerError::NotText {
                    field: "doc_id",
                    index,
                    doc_id: None,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let texts = texts
            .into_iter()
            .enumerate()
            .map(|(index, bytes)| {
                String::from_utf8(bytes).map_err(|_| InvokerError::NotText {
                    field: "text",
                    index,
                    doc_id: Some(doc_ids[index].clone()),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { doc_ids, texts })
    }

    pub fn from_pairs<I, D, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (D, T)>,
        D: Into<String>,
        T: Into<String>,
    {
        let (doc_ids, texts) = pairs.into_iter().map(|(id, text)| (id.into(), text.into())).unzip();
        Self { doc_ids, texts }
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn doc_ids(&self) -> &[String] {
        &self.doc_ids
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.doc_ids.iter().map(String::as_str).zip(self.texts.iter().map(String::as_str))
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<String>) {
        (self.doc_ids, self.texts)
    }
}

fn check_arity(doc_ids: usize, texts: usize) -> Result<(), InvokerError> {
    if doc_ids == texts {
        Ok(())
    } else {
        Err(InvokerError::ArityMismatch { texts, doc_ids })
    }
}
