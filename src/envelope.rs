// searchRetrieveResponse envelope: record count and diagnostics

use crate::sru_xml::SearchRetrieveResponse;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvelopeError {
    #[error("numberOfRecords unusable ({reason}) and no diagnostic message in response")]
    MissingDiagnostic { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub record_count: i64,
    pub ok: bool,
    pub error_message: Option<String>,
}

impl Envelope {
    // Envelope of a response that could not be read at all
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            record_count: 0,
            ok: false,
            error_message: Some(message.into()),
        }
    }

    pub fn from_response(doc: &SearchRetrieveResponse) -> Result<Self, EnvelopeError> {
        match read_record_count(doc) {
            Ok(record_count) => Ok(Self {
                record_count,
                ok: true,
                error_message: None,
            }),
            Err(reason) => {
                debug!(%reason, "no usable record count, reading diagnostics");
                let message = doc
                    .diagnostics
                    .as_ref()
                    .and_then(|diagnostics| diagnostics.first_message())
                    .ok_or(EnvelopeError::MissingDiagnostic { reason })?;
                Ok(Self::failed(message))
            }
        }
    }
}

fn read_record_count(doc: &SearchRetrieveResponse) -> Result<i64, String> {
    let count = doc
        .number_of_records
        .as_deref()
        .ok_or_else(|| "numberOfRecords missing".to_string())?;
    count
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("numberOfRecords {:?}: {}", count, e))
}
