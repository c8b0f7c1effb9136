// Parsed SRU response: envelope plus print and electronic holdings

use crate::config::{QueryContext, Zone};
use crate::envelope::Envelope;
use crate::holdings::{extract_e_holdings, extract_print_holdings, RecordSet};
use crate::sru_xml::{parse_response, SearchRetrieveResponse};
use serde::Serialize;
use tracing::{error, warn};

/// Holdings availability extracted from one searchRetrieve response.
///
/// Building one never fails. Parse problems show up as `ok() == false` or as
/// empty holdings lists, and the raw response text is kept for inspection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SruResponse {
    zone: Zone,
    record_count: i64,
    ok: bool,
    error_message: Option<String>,
    print_holdings: Vec<String>,
    e_holdings: Vec<String>,
    has_e_holdings: bool,
    location: String,
    call_number: String,
    #[serde(skip)]
    raw_xml: String,
}

impl SruResponse {
    pub fn parse(raw_xml: impl Into<String>, ctx: &QueryContext) -> Self {
        let raw_xml = raw_xml.into();
        let mut response = Self {
            zone: ctx.zone,
            record_count: 0,
            ok: false,
            error_message: None,
            print_holdings: Vec::new(),
            e_holdings: Vec::new(),
            has_e_holdings: false,
            location: String::new(),
            call_number: String::new(),
            raw_xml,
        };

        let doc = match parse_response(&response.raw_xml) {
            Ok(doc) => doc,
            Err(e) => {
                error!(error = %e, xml = %response.raw_xml, "unparseable SRU response");
                response.apply_envelope(Envelope::failed(e.to_string()));
                return response;
            }
        };

        let envelope = match Envelope::from_response(&doc) {
            Ok(envelope) => {
                if let Some(message) = &envelope.error_message {
                    warn!(error = %message, xml = %response.raw_xml, "SRU diagnostic in response");
                }
                envelope
            }
            Err(e) => {
                error!(error = %e, xml = %response.raw_xml, "unreadable SRU envelope");
                Envelope::failed(e.to_string())
            }
        };
        response.apply_envelope(envelope);

        if response.record_count > 0 {
            response.extract_holdings(&doc, ctx);
        }
        response.has_e_holdings = !response.e_holdings.is_empty();
        response
    }

    fn apply_envelope(&mut self, envelope: Envelope) {
        self.record_count = envelope.record_count;
        self.ok = envelope.ok;
        self.error_message = envelope.error_message;
    }

    // Print and electronic extraction fail independently of each other
    fn extract_holdings(&mut self, doc: &SearchRetrieveResponse, ctx: &QueryContext) {
        if ctx.zone == Zone::Institution {
            let print = RecordSet::from_response(doc).and_then(|set| extract_print_holdings(&set));
            match print {
                Ok(holdings) => {
                    self.print_holdings = holdings.statements;
                    self.location = holdings.location;
                    self.call_number = holdings.call_number;
                }
                Err(e) => {
                    warn!(error = %e, xml = %self.raw_xml, "print holdings extraction failed");
                    self.print_holdings = Vec::new();
                }
            }
        }

        let electronic =
            RecordSet::from_response(doc).and_then(|set| extract_e_holdings(&set, ctx));
        match electronic {
            Ok(statements) => self.e_holdings = statements,
            Err(e) => {
                warn!(error = %e, xml = %self.raw_xml, "e-holdings extraction failed");
                self.e_holdings = Vec::new();
            }
        }
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    pub fn ok(&self) -> bool {
        self.ok
    }

    pub fn record_count(&self) -> i64 {
        self.record_count
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn print_holdings(&self) -> &[String] {
        &self.print_holdings
    }

    pub fn e_holdings(&self) -> &[String] {
        &self.e_holdings
    }

    pub fn has_e_holdings(&self) -> bool {
        self.has_e_holdings
    }

    // Last AVA $c in the response
    pub fn location(&self) -> &str {
        &self.location
    }

    // Last AVA $d in the response
    pub fn call_number(&self) -> &str {
        &self.call_number
    }

    pub fn raw_xml(&self) -> &str {
        &self.raw_xml
    }
}

// Sample responses stored in the samples directory
pub const SAMPLE_IZ_RESPONSE_PATH: &str = "samples/iz_search_response.xml";
pub const SAMPLE_NZ_RESPONSE_PATH: &str = "samples/nz_search_response.xml";
pub const SAMPLE_DIAGNOSTIC_RESPONSE_PATH: &str = "samples/diagnostic_response.xml";
