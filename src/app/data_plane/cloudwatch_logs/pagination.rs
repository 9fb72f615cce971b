//! Token-driven pagination over CloudWatch Logs list and search calls.
//!
//! Every CloudWatch Logs listing follows the same continuation protocol: the
//! caller sends the previous page's `next_token` until the service stops
//! returning one. [`collect_pages`] drives that loop for any page operation and
//! accumulates the items in provider order.

#![warn(clippy::all, rust_2018_idioms)]

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;

use super::types::Page;

/// Upper bounds for a single paginated fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationLimits {
    /// Maximum number of page requests per fetch
    pub max_pages: usize,
    /// Maximum number of records kept per fetch
    pub max_records: usize,
}

impl Default for PaginationLimits {
    fn default() -> Self {
        Self {
            max_pages: 1000,
            max_records: 100_000,
        }
    }
}

impl PaginationLimits {
    pub fn new(max_pages: usize, max_records: usize) -> Self {
        Self {
            max_pages,
            max_records,
        }
    }
}

/// Items accumulated across every fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collected<T> {
    pub items: Vec<T>,
    pub pages_fetched: usize,
    /// True when a limit stopped the fetch before the provider ran out of pages
    pub truncated: bool,
}

/// Fetch pages until the provider reports no continuation token.
///
/// `fetch_page` receives the token of the previous page (`None` for the first
/// request). A missing or empty token ends the fetch, as does a token equal to
/// the one just sent. The first page error aborts the fetch and discards what
/// was accumulated so far.
pub async fn collect_pages<T, F, Fut>(
    limits: PaginationLimits,
    mut fetch_page: F,
) -> Result<Collected<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut next_token: Option<String> = None;
    let mut pages_fetched = 0;

    loop {
        if pages_fetched >= limits.max_pages {
            log_warn!(
                "Pagination stopped after {} pages with more results pending",
                pages_fetched
            );
            return Ok(Collected {
                items,
                pages_fetched,
                truncated: true,
            });
        }

        let sent_token = next_token.take();
        let page = fetch_page(sent_token.clone()).await?;
        pages_fetched += 1;
        trace_trace!(
            "Fetched page {} with {} items (more: {})",
            pages_fetched,
            page.items.len(),
            page.next_token.is_some()
        );

        items.extend(page.items);

        if items.len() >= limits.max_records {
            let more_available =
                items.len() > limits.max_records || has_more(&page.next_token, &sent_token);
            if more_available {
                items.truncate(limits.max_records);
                log_warn!(
                    "Pagination stopped at {} records after {} pages",
                    limits.max_records,
                    pages_fetched
                );
            }
            return Ok(Collected {
                items,
                pages_fetched,
                truncated: more_available,
            });
        }

        if !has_more(&page.next_token, &sent_token) {
            return Ok(Collected {
                items,
                pages_fetched,
                truncated: false,
            });
        }
        next_token = page.next_token;
    }
}

fn has_more(returned: &Option<String>, sent: &Option<String>) -> bool {
    match returned.as_deref() {
        None | Some("") => false,
        Some(token) => sent.as_deref() != Some(token),
    }
}
