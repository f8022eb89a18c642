use serde::Serialize;
use tidy_protocol::{AnnotatedToken, TABLE_COLUMNS};
use tidy_reshaper::{ReshapeOptions, Reshaper};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Whole-text result sent back to JavaScript.
#[derive(Serialize)]
pub struct TableReport {
    pub columns: Vec<&'static str>,
    pub rows: Vec<AnnotatedToken>,
}

/// One entry per document when reshaping documents independently.
#[derive(Serialize)]
pub struct DocumentReport {
    pub doc_id: Option<String>,
    pub first_line: usize,
    pub rows: Vec<AnnotatedToken>,
    pub error: Option<String>,
}

/// Reshaper instance living on the JavaScript side.
#[wasm_bindgen]
pub struct TidyReshaper {
    reshaper: Reshaper,
}

#[wasm_bindgen]
impl TidyReshaper {
    /// `strict` rejects token lines that precede every `# newdoc` marker.
    #[wasm_bindgen(constructor)]
    pub fn new(strict: bool) -> Self {
        let options = if strict {
            ReshapeOptions::strict()
        } else {
            ReshapeOptions::default()
        };
        Self {
            reshaper: Reshaper::new(options),
        }
    }

    /// Text -> `{ columns, rows }`; throws on the first malformed line.
    pub fn reshape(&self, conllu: &str) -> Result<JsValue, JsValue> {
        let report = table_report(&self.reshaper, conllu).map_err(|message| JsValue::from_str(&message))?;
        Ok(serde_wasm_bindgen::to_value(&report)?)
    }

    /// Text -> one report per document; malformed documents carry `error`.
    #[wasm_bindgen(js_name = reshapeDocuments)]
    pub fn reshape_documents(&self, conllu: &str) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&document_reports(&self.reshaper, conllu))?)
    }
}

fn table_report(reshaper: &Reshaper, conllu: &str) -> Result<TableReport, String> {
    let rows = reshaper.reshape(conllu).map_err(|err| err.to_string())?;
    Ok(TableReport {
        columns: TABLE_COLUMNS.to_vec(),
        rows,
    })
}

fn document_reports(reshaper: &Reshaper, conllu: &str) -> Vec<DocumentReport> {
    reshaper
        .reshape_documents(conllu)
        .into_iter()
        .map(|document| {
            let (rows, error) = match document.rows {
                Ok(rows) => (rows, None),
                Err(err) => (Vec::new(), Some(err.to_string())),
            };
            DocumentReport {
                doc_id: document.doc_id,
                first_line: document.first_line,
                rows,
                error,
            }
        })
        .collect()
}
