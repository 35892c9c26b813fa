use crate::config::Config;
use crate::db::Store;

pub async fn cmd_history(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let queries = store.list_search_queries().await?;

    if queries.is_empty() {
        println!("No search history.");
        return Ok(());
    }

    println!("Recent Searches ({}):", queries.len());
    println!("{:-<60}", "");

    for query in queries {
        println!(
            "• {} ({})",
            query.query_text,
            query.search_time.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }

    Ok(())
}
