use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    spotify::client::SpotifyClient,
    types::Page,
};

/// Offset/limit walk over one paged collection.
#[derive(Debug, Clone, Copy)]
pub struct Pagination<'a> {
    pub endpoint: &'a str,
    pub page_size: usize,
    pub ceiling: usize,
}

impl<'a> Pagination<'a> {
    pub fn new(endpoint: &'a str, page_size: usize, ceiling: usize) -> Self {
        Self {
            endpoint,
            page_size,
            ceiling,
        }
    }
}

/// Fetches pages until a short page comes back or `ceiling` items have been
/// requested, whichever happens first. Items keep the order the API returned.
///
/// A page whose body cannot be decoded is skipped: the offset moves on by a
/// full page and the walk continues. Every other error aborts the fetch.
pub async fn fetch_all<T: DeserializeOwned>(
    client: &SpotifyClient,
    token: &str,
    pagination: Pagination<'_>,
) -> Result<Vec<T>> {
    let Pagination {
        endpoint,
        page_size,
        ceiling,
    } = pagination;

    if page_size == 0 {
        return Err(Error::BadRequest(format!(
            "page size for {} must be positive",
            endpoint
        )));
    }

    let mut items = Vec::new();
    let mut offset = 0;
    let mut last_page_size = page_size;

    while offset < ceiling && last_page_size == page_size {
        let query = [
            ("limit", page_size.to_string()),
            ("offset", offset.to_string()),
        ];

        match client.get::<Page<T>>(endpoint, token, &query).await {
            Ok(page) => {
                last_page_size = page.items.len();
                offset += page.items.len();
                debug!(endpoint, offset, received = last_page_size, "page fetched");
                items.extend(page.items);
            }
            Err(e) if e.is_recoverable_page_error() => {
                warn!(endpoint, offset, error = %e, "skipping malformed page");
                offset += page_size;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(items)
}
