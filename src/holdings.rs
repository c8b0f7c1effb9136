// Holdings extraction from AVA (physical) and AVE (electronic) availability fields

use crate::config::{QueryContext, Zone};
use crate::sru_xml::{MarcDataField, MarcRecord, SearchRetrieveResponse, XmlRecords};
use thiserror::Error;
use tracing::debug;

pub const PHYSICAL_TAG: &str = "AVA";
pub const ELECTRONIC_TAG: &str = "AVE";

// AVA accepts either capitalisation, AVE only the capitalised literal
const PRINT_AVAILABLE: [&str; 2] = ["available", "Available"];
const E_AVAILABLE: &str = "Available";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    #[error("Missing element: {0}")]
    MissingElement(String),

    #[error("<{element}> without {attribute} attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityTag {
    Physical,
    Electronic,
    Other,
}

impl AvailabilityTag {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            PHYSICAL_TAG => AvailabilityTag::Physical,
            ELECTRONIC_TAG => AvailabilityTag::Electronic,
            _ => AvailabilityTag::Other,
        }
    }

    fn of(field: &MarcDataField) -> Result<Self, ExtractionError> {
        field
            .tag
            .as_deref()
            .map(Self::from_tag)
            .ok_or(ExtractionError::MissingAttribute {
                element: "datafield",
                attribute: "tag",
            })
    }
}

/// Subfield values of one availability field, gathered in a single pass.
///
/// Single-valued codes keep the last occurrence. `t` (shelf range lines) and
/// `i` (institution scoping) keep every occurrence in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubfieldCodes {
    pub c: Option<String>,
    pub d: Option<String>,
    pub e: Option<String>,
    pub m: Option<String>,
    pub s: Option<String>,
    pub t: Vec<String>,
    pub i: Vec<String>,
}

impl SubfieldCodes {
    pub fn collect(field: &MarcDataField) -> Result<Self, ExtractionError> {
        let mut codes = SubfieldCodes::default();
        for subfield in &field.subfields {
            let code = subfield
                .code
                .as_deref()
                .ok_or(ExtractionError::MissingAttribute {
                    element: "subfield",
                    attribute: "code",
                })?;
            let text = subfield.text.clone();
            match code {
                "c" => codes.c = Some(text),
                "d" => codes.d = Some(text),
                "e" => codes.e = Some(text),
                "m" => codes.m = Some(text),
                "s" => codes.s = Some(text),
                "t" => codes.t.push(text),
                "i" => codes.i.push(text),
                _ => (),
            }
        }
        Ok(codes)
    }

    pub fn range(&self) -> String {
        self.t.join("\n")
    }

    pub fn physically_available(&self) -> bool {
        self.e
            .as_deref()
            .map_or(false, |e| PRINT_AVAILABLE.contains(&e))
    }

    pub fn electronically_available(&self, ctx: &QueryContext) -> bool {
        let available = self.e.as_deref() == Some(E_AVAILABLE);
        match ctx.zone {
            Zone::Institution => available,
            Zone::Network => available && self.i.iter().any(|i| *i == ctx.institution_code),
        }
    }

    pub fn print_statement(&self) -> String {
        format!("{} ({})", self.range(), self.c.as_deref().unwrap_or_default())
    }

    pub fn e_statement(&self) -> String {
        format!(
            "{} ({})",
            self.m.as_deref().unwrap_or_default(),
            self.s.as_deref().unwrap_or_default()
        )
    }
}

/// The `records` element of a response and the bibliographic records under it.
#[derive(Debug, Clone, Copy)]
pub struct RecordSet<'a> {
    container: &'a XmlRecords,
}

impl<'a> RecordSet<'a> {
    pub fn new(container: &'a XmlRecords) -> Self {
        Self { container }
    }

    pub fn from_response(doc: &'a SearchRetrieveResponse) -> Result<Self, ExtractionError> {
        doc.records
            .as_ref()
            .map(Self::new)
            .ok_or_else(|| ExtractionError::MissingElement("searchRetrieveResponse/records".into()))
    }

    fn container_marc(&self) -> Option<&'a MarcRecord> {
        self.container.record_data.as_ref()?.record.as_ref()
    }

    /// MARC record of each record in the set, `None` where a record has no
    /// `recordData/record` of its own and the container has none to lend.
    ///
    /// A container carrying `recordData` itself and no `record` children
    /// stands in for its single record.
    pub fn records(&self) -> Vec<Option<&'a MarcRecord>> {
        if self.container.records.is_empty() {
            return self.container_marc().map(Some).into_iter().collect();
        }
        self.container
            .records
            .iter()
            .map(|record| {
                record
                    .record_data
                    .as_ref()
                    .and_then(|data| data.record.as_ref())
                    .or_else(|| self.container_marc())
            })
            .collect()
    }

    // Every datafield of every record, in document order
    pub fn datafields(&self) -> Result<Vec<&'a MarcDataField>, ExtractionError> {
        let mut fields = Vec::new();
        for marc in self.records() {
            let marc = marc.ok_or_else(|| {
                ExtractionError::MissingElement("record/recordData/record".to_string())
            })?;
            fields.extend(marc.datafields.iter());
        }
        Ok(fields)
    }
}

/// Print holdings of a response.
///
/// `location` and `call_number` are response-level values: `$c` and `$d` of
/// the last `AVA` field processed, whether or not that field was available.
/// They are not tied to any one statement (open question 1 in DESIGN.md).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrintHoldings {
    pub statements: Vec<String>,
    pub location: String,
    pub call_number: String,
}

fn push_unique(statements: &mut Vec<String>, statement: String) {
    if !statements.contains(&statement) {
        statements.push(statement);
    }
}

pub fn extract_print_holdings(records: &RecordSet) -> Result<PrintHoldings, ExtractionError> {
    let mut holdings = PrintHoldings::default();

    for field in records.datafields()? {
        match AvailabilityTag::of(field)? {
            AvailabilityTag::Physical => {
                let codes = SubfieldCodes::collect(field)?;
                if codes.physically_available() {
                    push_unique(&mut holdings.statements, codes.print_statement());
                }
                holdings.location = codes.c.unwrap_or_default();
                holdings.call_number = codes.d.unwrap_or_default();
            }
            AvailabilityTag::Electronic | AvailabilityTag::Other => {}
        }
    }

    debug!(count = holdings.statements.len(), "extracted print holdings");
    Ok(holdings)
}

pub fn extract_e_holdings(
    records: &RecordSet,
    ctx: &QueryContext,
) -> Result<Vec<String>, ExtractionError> {
    let mut statements = Vec::new();

    for field in records.datafields()? {
        match AvailabilityTag::of(field)? {
            AvailabilityTag::Electronic => {
                let codes = SubfieldCodes::collect(field)?;
                if codes.electronically_available(ctx) {
                    push_unique(&mut statements, codes.e_statement());
                }
            }
            AvailabilityTag::Physical | AvailabilityTag::Other => {}
        }
    }

    debug!(count = statements.len(), zone = %ctx.zone, "extracted e-holdings");
    Ok(statements)
}
