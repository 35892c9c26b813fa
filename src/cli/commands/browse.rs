use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::domain::SortOrder;
use crate::gallery::{Dispatch, FetchLoop, FetchOutcome, HttpPhotoFetcher, Trigger};

pub async fn cmd_browse(
    mut config: Config,
    query: &str,
    pages: u32,
    sort: Option<&str>,
    server: Option<String>,
) -> anyhow::Result<()> {
    if let Some(server) = server {
        config.client.server_url = server;
    }
    config.validate_client()?;

    let fetcher = Arc::new(HttpPhotoFetcher::new(&config.client.server_url)?);
    let fetch_loop = FetchLoop::new(
        fetcher,
        Duration::from_secs(config.client.request_timeout_seconds),
        config.client.scroll_threshold_px,
    );

    let sort = SortOrder::parse_or_default(sort);
    println!("Browsing {} ...", config.client.server_url);

    let mut result = fetch_loop
        .dispatch(Trigger::Search {
            term: query.to_string(),
            sort,
        })
        .await;

    for _ in 1..pages.max(1) {
        if !matches!(result, Dispatch::Completed(FetchOutcome::Rendered { added }) if added > 0) {
            break;
        }
        result = fetch_loop.dispatch(Trigger::ScrollNearBottom).await;
    }

    let session = fetch_loop.snapshot().await;

    if let Some(note) = session.note() {
        println!("{note}");
    }

    println!(
        "Gallery: {} photos across {} page(s), sort {}",
        session.tiles().len(),
        session.page(),
        session.sort()
    );
    for tile in session.tiles() {
        println!("• {} {}", tile.alt, tile.image_url);
    }

    if let Some(message) = session.error_message() {
        println!();
        println!("Error: {message}");
    }

    let history = fetch_loop.history().await;
    if !history.is_empty() {
        println!();
        println!("Recent Search:");
        for entry in history {
            println!("  {}", entry.query_text);
        }
    }

    Ok(())
}
