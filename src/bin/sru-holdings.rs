// Looks up holdings for each query given on the command line and prints
// one JSON document per response.
//
//   SRU_CONFIG=sru.json sru-holdings IZ 'alma.isbn=9781718503106'

use alma_sru_holdings::{SearchParams, SruClient, SruConfig, Zone, DEFAULT_WORKERS};
use anyhow::{bail, Context, Result};
use std::env;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: sru-holdings <IZ|NZ> <query>...";

#[tokio::main]
async fn main() -> Result<()> {
    // logs go to stderr, stdout carries only the JSON
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let zone: Zone = match args.next() {
        Some(zone) => zone.parse()?,
        None => bail!(USAGE),
    };
    let queries: Vec<SearchParams> = args.map(SearchParams::new).collect();
    if queries.is_empty() {
        bail!(USAGE);
    }

    let config_path = env::var("SRU_CONFIG").unwrap_or_else(|_| "sru.json".to_string());
    let config = SruConfig::from_file(&config_path)
        .with_context(|| format!("loading SRU config from {}", config_path))?;
    let workers = env::var("SRU_WORKERS")
        .ok()
        .and_then(|w| w.parse().ok())
        .unwrap_or(DEFAULT_WORKERS);

    let client = SruClient::new(config);
    let results = client.search_many(zone, &queries, workers).await?;

    for (params, result) in queries.iter().zip(results) {
        let response = result.with_context(|| format!("searching {}", params.query))?;
        println!("{}", serde_json::to_string_pretty(&response)?);
    }
    Ok(())
}
