use tabled::Table;

use crate::{
    cli::auth::authenticated_client,
    error,
    error::Error,
    spotify::search,
    types::{ContentKind, SearchResult, SearchTableRow},
    warning,
};

fn to_row(result: SearchResult) -> SearchTableRow {
    SearchTableRow {
        kind: result.kind.to_string(),
        id: result.id,
        name: result.name,
        artists: result.artists.join(", "),
    }
}

pub async fn search(
    query: Option<String>,
    id: Option<String>,
    kind: Option<ContentKind>,
    limit: Option<u32>,
) {
    let client = authenticated_client().await;

    let results = match (id, query) {
        (Some(id), _) => search::search_by_id(&client, &id).await.map(|r| vec![r]),
        (None, Some(query)) => {
            let limit = limit.unwrap_or(search::DEFAULT_LIMIT);
            search::search_by_query(&client, kind, &query, limit).await
        }
        (None, None) => error!("Provide a search query or --id."),
    };

    match results {
        Ok(results) => {
            let rows: Vec<SearchTableRow> = results.into_iter().map(to_row).collect();
            println!("{}", Table::new(rows));
        }
        Err(e @ (Error::NoResults(_) | Error::ContentNotFound(_) | Error::InvalidId(_))) => {
            warning!("{}", e)
        }
        Err(e) => error!("Search failed. Err: {}", e),
    }
}
