// Serde model of a searchRetrieve response carrying MARCXML records.
//
// quick-xml matches element names on their local part, so `diag:message` and
// `message` land in the same field. Elements not modelled here are skipped
// without being materialised.

use quick_xml::de::from_str;
use quick_xml::DeError;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum XmlError {
    #[error("XML parse error: {0}")]
    Parse(#[from] DeError),
}

#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(default, rename = "searchRetrieveResponse")]
pub struct SearchRetrieveResponse {
    #[serde(rename = "numberOfRecords")]
    pub number_of_records: Option<String>,
    pub records: Option<XmlRecords>,
    pub diagnostics: Option<XmlDiagnostics>,
}

/// The `records` container.
///
/// Normally a list of `record` elements, but some responses put a single
/// `recordData` directly on the container.
#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct XmlRecords {
    #[serde(rename = "record")]
    pub records: Vec<XmlRecord>,
    #[serde(rename = "recordData")]
    pub record_data: Option<XmlRecordData>,
}

#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct XmlRecord {
    #[serde(rename = "recordData")]
    pub record_data: Option<XmlRecordData>,
}

#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct XmlRecordData {
    pub record: Option<MarcRecord>,
}

// Leader and control fields are not needed for availability
#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct MarcRecord {
    #[serde(rename = "datafield")]
    pub datafields: Vec<MarcDataField>,
}

#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct MarcDataField {
    #[serde(rename = "@tag")]
    pub tag: Option<String>,
    #[serde(rename = "subfield")]
    pub subfields: Vec<MarcSubfield>,
}

#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct MarcSubfield {
    #[serde(rename = "@code")]
    pub code: Option<String>,
    #[serde(rename = "$text")]
    pub text: String,
}

#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct XmlDiagnostics {
    #[serde(rename = "diagnostic")]
    pub diagnostics: Vec<XmlDiagnostic>,
}

#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct XmlDiagnostic {
    pub uri: Option<String>,
    pub message: Option<String>,
}

impl XmlDiagnostics {
    pub fn first_message(&self) -> Option<&str> {
        self.diagnostics.first()?.message.as_deref()
    }
}

pub fn parse_response(xml: &str) -> Result<SearchRetrieveResponse, XmlError> {
    Ok(from_str(xml)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_parse_records_and_subfields() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
          <searchRetrieveResponse xmlns="http://www.loc.gov/zing/srw/">
            <version>1.2</version>
            <numberOfRecords>1</numberOfRecords>
            <records>
              <record>
                <recordSchema>marcxml</recordSchema>
                <recordData>
                  <record xmlns="http://www.loc.gov/MARC21/slim">
                    <leader>00000nam a2200000 a 4500</leader>
                    <controlfield tag="001">991234</controlfield>
                    <datafield tag="AVA" ind1=" " ind2=" ">
                      <subfield code="c">Main Stacks</subfield>
                      <subfield code="e">available</subfield>
                    </datafield>
                  </record>
                </recordData>
                <recordPosition>1</recordPosition>
              </record>
            </records>
          </searchRetrieveResponse>"#;

        let doc = parse_response(xml).unwrap();
        assert_eq!(doc.number_of_records.as_deref(), Some("1"));
        assert!(doc.diagnostics.is_none());

        let records = doc.records.unwrap();
        assert_eq!(records.records.len(), 1);
        assert!(records.record_data.is_none());

        let marc = records.records[0]
            .record_data
            .as_ref()
            .and_then(|data| data.record.as_ref())
            .unwrap();
        assert_eq!(marc.datafields.len(), 1);
        assert_eq!(marc.datafields[0].tag.as_deref(), Some("AVA"));
        assert_eq!(
            marc.datafields[0].subfields,
            vec![
                MarcSubfield {
                    code: Some("c".to_string()),
                    text: "Main Stacks".to_string()
                },
                MarcSubfield {
                    code: Some("e".to_string()),
                    text: "available".to_string()
                },
            ]
        );
    }

    #[test_case("diag:"; "prefixed")]
    #[test_case(""; "unprefixed")]
    fn test_diagnostics_with_or_without_prefix(prefix: &str) {
        let xml = format!(
            r#"<searchRetrieveResponse><diagnostics>
                 <{p}diagnostic xmlns:diag="http://www.loc.gov/zing/srw/diagnostic/">
                   <{p}uri>info:srw/diagnostic/1/10</{p}uri>
                   <{p}message>Query syntax error</{p}message>
                 </{p}diagnostic>
                 <{p}diagnostic><{p}message>Second</{p}message></{p}diagnostic>
               </diagnostics></searchRetrieveResponse>"#,
            p = prefix
        );

        let diagnostics = parse_response(&xml).unwrap().diagnostics.unwrap();
        assert_eq!(diagnostics.diagnostics.len(), 2);
        assert_eq!(
            diagnostics.diagnostics[0].uri.as_deref(),
            Some("info:srw/diagnostic/1/10")
        );
        assert_eq!(diagnostics.first_message(), Some("Query syntax error"));
    }

    #[test]
    fn test_entities_and_cdata_are_decoded() {
        let xml = r#"<searchRetrieveResponse><records><record><recordData><record>
            <datafield tag="AVE">
              <subfield code="m">Taylor &amp; Francis &#x263A; &lt;eBooks&gt;</subfield>
              <subfield code="s"><![CDATA[1990 & later]]></subfield>
            </datafield>
          </record></recordData></record></records></searchRetrieveResponse>"#;

        let doc = parse_response(xml).unwrap();
        let marc = doc.records.unwrap().records.remove(0).record_data.unwrap().record.unwrap();
        let subfields = &marc.datafields[0].subfields;
        assert_eq!(subfields[0].text, "Taylor & Francis \u{263A} <eBooks>");
        assert_eq!(subfields[1].text, "1990 & later");
    }

    #[test]
    fn test_missing_attributes_and_empty_subfields() {
        let xml = r#"<searchRetrieveResponse><records><record><recordData><record>
            <datafield><subfield/><subfield code="a"></subfield></datafield>
          </record></recordData></record></records></searchRetrieveResponse>"#;

        let doc = parse_response(xml).unwrap();
        let marc = doc.records.unwrap().records.remove(0).record_data.unwrap().record.unwrap();
        let field = &marc.datafields[0];
        assert_eq!(field.tag, None);
        assert_eq!(field.subfields[0], MarcSubfield::default());
        assert_eq!(field.subfields[1].code.as_deref(), Some("a"));
        assert_eq!(field.subfields[1].text, "");
    }

    #[test]
    fn test_container_record_data() {
        let xml = r#"<searchRetrieveResponse><records>
            <recordData><record><datafield tag="AVA"/></record></recordData>
          </records></searchRetrieveResponse>"#;

        let records = parse_response(xml).unwrap().records.unwrap();
        assert!(records.records.is_empty());
        assert!(records.record_data.is_some());
    }

    #[test]
    fn test_deeply_nested_unknown_elements_are_skipped() {
        let depth = 50_000;
        let xml = format!(
            "<searchRetrieveResponse><numberOfRecords>1</numberOfRecords>\
             <records>{}{}</records></searchRetrieveResponse>",
            "<x>".repeat(depth),
            "</x>".repeat(depth)
        );

        let doc = parse_response(&xml).unwrap();
        assert_eq!(doc.number_of_records.as_deref(), Some("1"));
        assert_eq!(doc.records, Some(XmlRecords::default()));
    }

    #[test_case(""; "empty")]
    #[test_case("not xml at all"; "plain text")]
    #[test_case("<searchRetrieveResponse><records>"; "unclosed")]
    #[test_case("<searchRetrieveResponse></records>"; "mismatched end")]
    fn test_malformed_documents(xml: &str) {
        assert!(matches!(parse_response(xml), Err(XmlError::Parse(_))));
    }
}
