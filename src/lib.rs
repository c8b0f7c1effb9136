// Holdings availability lookups against Alma SRU endpoints

pub mod client;
pub mod config;
pub mod envelope;
pub mod holdings;
pub mod query;
pub mod response;
pub mod sru_xml;

// Re-export key types for convenience
pub use client::{
    ClientError, ClientStats, FetchError, HttpFetcher, ReqwestFetcher, SruClient, DEFAULT_WORKERS,
};
pub use config::{ConfigError, QueryContext, SruConfig, Zone};
pub use envelope::{Envelope, EnvelopeError};
pub use holdings::{
    extract_e_holdings, extract_print_holdings, ExtractionError, PrintHoldings, RecordSet,
    SubfieldCodes,
};
pub use query::{make_url, SearchParams};
pub use response::SruResponse;
pub use sru_xml::{parse_response, SearchRetrieveResponse, XmlError};
