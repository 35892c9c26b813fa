use crate::config::Config;
use crate::domain::SortOrder;
use crate::state::SharedState;

pub async fn cmd_search_photos(
    config: Config,
    query: &str,
    page: u32,
    sort: Option<&str>,
) -> anyhow::Result<()> {
    config.validate()?;

    if page == 0 {
        anyhow::bail!("Page must be a positive integer");
    }

    let sort = SortOrder::parse_or_default(sort);
    let state = SharedState::new(config).await?;

    if query.trim().is_empty() {
        println!("Fetching recent photos (page {page}, {sort})");
    } else {
        println!("Searching for: {query} (page {page}, {sort})");
    }

    let photos = state.search_service.search(Some(query), page, sort).await?;

    if photos.is_empty() {
        println!("No photos found.");
        return Ok(());
    }

    println!();
    println!("Photos:");
    println!("{:-<60}", "");

    for photo in &photos {
        let title = if photo.title.is_empty() {
            "(untitled)"
        } else {
            photo.title.as_str()
        };
        println!("• {title}");
        println!("  {}", photo.image_url());
    }

    println!();
    println!("{} photos. {}", photos.len(), next_page_hint(query, page));

    Ok(())
}

fn next_page_hint(query: &str, page: u32) -> String {
    match page.checked_add(1) {
        Some(next) => format!("Next page: photoscroll search {query} --page {next}"),
        None => "This is the last addressable page.".to_string(),
    }
}
