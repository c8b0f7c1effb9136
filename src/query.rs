// SRU searchRetrieve URL construction

use crate::config::{ConfigError, SruConfig, Zone};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub operation: String,
    pub record_schema: String,
    pub maximum_records: u32,
    pub start_record: u32,
    // CQL expression, passed through without escaping
    pub query: String,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            operation: "searchRetrieve".to_string(),
            record_schema: "marcxml".to_string(),
            maximum_records: 10,
            start_record: 1,
            query: String::new(),
        }
    }
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }
}

pub fn make_url(
    config: &SruConfig,
    zone: Zone,
    params: &SearchParams,
) -> Result<String, ConfigError> {
    let sru_path = config.base_url(zone)?;
    Ok(format!(
        "{}?version={}&operation={}&recordSchema={}&maximumRecords={}&startRecord={}&query={}",
        sru_path,
        config.api_version,
        params.operation,
        params.record_schema,
        params.maximum_records,
        params.start_record,
        params.query
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config() -> SruConfig {
        let mut paths = HashMap::new();
        paths.insert(Zone::Institution, "https://inst.example.org/view/sru/01MY_INST".to_string());
        paths.insert(Zone::Network, "https://net.example.org/view/sru/01MY_NET".to_string());
        SruConfig::new(paths, "01MY_INST")
    }

    #[test]
    fn test_default_url() {
        let params = SearchParams::new("alma.isbn=9780262033848");
        let url = make_url(&config(), Zone::Institution, &params).unwrap();

        assert_eq!(
            url,
            "https://inst.example.org/view/sru/01MY_INST?version=1.2&operation=searchRetrieve\
             &recordSchema=marcxml&maximumRecords=10&startRecord=1&query=alma.isbn=9780262033848"
        );
    }

    #[test]
    fn test_custom_paging_and_zone() {
        let params = SearchParams {
            maximum_records: 50,
            start_record: 51,
            ..SearchParams::new("alma.title=\"rust\"")
        };
        let url = make_url(&config(), Zone::Network, &params).unwrap();

        assert!(url.starts_with("https://net.example.org/view/sru/01MY_NET?"));
        assert!(url.contains("&maximumRecords=50&startRecord=51&"));
        // the query is not escaped
        assert!(url.ends_with("&query=alma.title=\"rust\""));
    }

    #[test]
    fn test_unconfigured_zone() {
        let config = SruConfig::new(HashMap::new(), "01MY_INST");
        let result = make_url(&config, Zone::Network, &SearchParams::new("x"));
        assert!(matches!(result, Err(ConfigError::UnknownZone(Zone::Network))));
    }
}
