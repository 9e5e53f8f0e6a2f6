use console::style;

use folio::config::Config;
use folio::error::Result;
use folio::services::SearchService;

use super::{open_index, print_json};

pub async fn run(
    config: &Config,
    query: &str,
    doc_type: Option<&str>,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let index = open_index(config)?;
    let service = SearchService::new(index.clone(), config.search);

    let results = service
        .search_with_limit(query, doc_type, limit.unwrap_or(config.search.default_limit))
        .await?;
    index.shutdown()?;

    if json {
        return print_json(&results);
    }

    if results.is_empty() {
        println!("{}", style("No matching documents").dim());
        return Ok(());
    }
    for (rank, result) in results.iter().enumerate() {
        println!(
            "{:>2}. {} {} {}",
            rank + 1,
            style(&result.file_name).bold(),
            style(&result.doc_type).cyan(),
            style(format!("{:.3}", result.score)).dim()
        );
        println!("    {}", result.document_id);
    }
    Ok(())
}
