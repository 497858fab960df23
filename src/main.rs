use anyhow::{bail, Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use tmdb_lookup::filename::{clean_title, reject_unsupported_scripts};
use tmdb_lookup::{AppConfig, Listing, ListingLookup, SearchSession, TmdbClient};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tmdb_lookup=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    config.log_config();

    let raw_query = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    let query = reject_unsupported_scripts(&clean_title(&raw_query)).to_string();
    if query.is_empty() {
        bail!("Usage: tmdb-lookup <title or file name>");
    }

    let api_key = config
        .api_key
        .context("No TMDB API key; set TMDB_API_KEY or add it to the config file")?;
    let client = TmdbClient::new(api_key);

    let listing = Listing::Multi;
    let lookup = ListingLookup {
        client: &client,
        listing: listing.clone(),
        page: 1,
        language: config.language.clone(),
    };

    let session = SearchSession::new();
    let outcome = session
        .search(&lookup, &query, listing.implied_kind(), &config.images)
        .await?;

    if outcome.records.is_empty() {
        tracing::info!("No results for {:?}", query);
        return Ok(());
    }

    tracing::info!(
        "{} result(s) for {:?} ({} page(s))",
        outcome.records.len(),
        outcome.matched_text,
        outcome.total_pages
    );
    for record in &outcome.records {
        println!("{:>10}  {}", record.ident, record.title);
    }

    Ok(())
}
