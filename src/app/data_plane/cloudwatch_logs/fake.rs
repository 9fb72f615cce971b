//! In-memory CloudWatch Logs provider with scripted pages.
//!
//! Used by unit and integration tests in place of the AWS-backed client.
//! Outside this crate's own unit tests it requires the `test-util` feature.

#![warn(clippy::all, rust_2018_idioms)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::client::LogsProvider;
use super::registry::ClientFactory;
use super::types::{FilterDescriptor, LogEvent, LogGroupEntry, LogStreamEntry, Page};

/// Provider that answers from pre-recorded pages.
///
/// Pages are addressed by position: the first request gets page 0, a request
/// carrying token `"N"` gets page N. Page tokens in scripted pages are
/// rewritten to that scheme, so callers may use any token text.
#[derive(Debug, Default)]
pub struct FakeLogsProvider {
    region: String,
    event_pages: Vec<Page<LogEvent>>,
    group_pages: Vec<Page<LogGroupEntry>>,
    stream_pages: Vec<Page<LogStreamEntry>>,
    failure: Option<String>,
    fail_on_page: Option<usize>,
    filter_calls: AtomicUsize,
    describe_calls: AtomicUsize,
    filters_seen: Mutex<Vec<FilterDescriptor>>,
}

impl FakeLogsProvider {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Self::default()
        }
    }

    pub fn with_event_pages(mut self, pages: Vec<Page<LogEvent>>) -> Self {
        self.event_pages = renumber(pages);
        self
    }

    pub fn with_group_pages(mut self, pages: Vec<Page<LogGroupEntry>>) -> Self {
        self.group_pages = renumber(pages);
        self
    }

    pub fn with_stream_pages(mut self, pages: Vec<Page<LogStreamEntry>>) -> Self {
        self.stream_pages = renumber(pages);
        self
    }

    /// Fail every call with `message`
    pub fn failing_with(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Fail only when page `index` is requested
    pub fn failing_on_page(mut self, index: usize, message: impl Into<String>) -> Self {
        self.fail_on_page = Some(index);
        self.failure = Some(message.into());
        self
    }

    /// Number of `FilterLogEvents` pages requested
    pub fn filter_calls(&self) -> usize {
        self.filter_calls.load(Ordering::SeqCst)
    }

    /// Number of describe pages requested (groups and streams)
    pub fn describe_calls(&self) -> usize {
        self.describe_calls.load(Ordering::SeqCst)
    }

    /// Filter sent with the most recent `FilterLogEvents` page request
    pub fn last_filter(&self) -> Option<FilterDescriptor> {
        self.filters_seen
            .lock()
            .ok()
            .and_then(|seen| seen.last().cloned())
    }

    fn serve<T: Clone>(&self, pages: &[Page<T>], next_token: Option<String>) -> Result<Page<T>> {
        let index = match next_token {
            None => 0,
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| anyhow!("InvalidParameterException: bad token {}", token))?,
        };

        if let Some(message) = &self.failure {
            if self.fail_on_page.map_or(true, |page| page == index) {
                return Err(anyhow!("{}", message));
            }
        }

        Ok(pages
            .get(index)
            .cloned()
            .unwrap_or_else(|| Page::last(Vec::new())))
    }
}

fn renumber<T>(pages: Vec<Page<T>>) -> Vec<Page<T>> {
    pages
        .into_iter()
        .enumerate()
        .map(|(index, page)| Page {
            next_token: page.next_token.map(|_| (index + 1).to_string()),
            items: page.items,
        })
        .collect()
}

#[async_trait]
impl LogsProvider for FakeLogsProvider {
    fn region(&self) -> &str {
        &self.region
    }

    async fn filter_log_events_page(
        &self,
        filter: &FilterDescriptor,
        next_token: Option<String>,
    ) -> Result<Page<LogEvent>> {
        self.filter_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.filters_seen.lock() {
            seen.push(filter.clone());
        }
        self.serve(&self.event_pages, next_token)
    }

    async fn describe_log_groups_page(
        &self,
        _log_group_name_prefix: Option<&str>,
        next_token: Option<String>,
    ) -> Result<Page<LogGroupEntry>> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);
        self.serve(&self.group_pages, next_token)
    }

    async fn describe_log_streams_page(
        &self,
        _log_group_name: &str,
        next_token: Option<String>,
    ) -> Result<Page<LogStreamEntry>> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);
        self.serve(&self.stream_pages, next_token)
    }
}

/// Factory handing out pre-built fake providers by region
#[derive(Default)]
pub struct FakeClientFactory {
    providers: HashMap<String, Arc<FakeLogsProvider>>,
    failure: Option<String>,
    created: AtomicUsize,
}

impl FakeClientFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, provider: FakeLogsProvider) -> Self {
        self.providers
            .insert(provider.region.clone(), Arc::new(provider));
        self
    }

    /// Fail every client construction with `message`
    pub fn failing_with(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Number of clients constructed so far
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// The provider registered for `region`, for call-count assertions
    pub fn provider(&self, region: &str) -> Option<Arc<FakeLogsProvider>> {
        self.providers.get(region).cloned()
    }
}

#[async_trait]
impl ClientFactory for FakeClientFactory {
    async fn create(&self, region: &str) -> Result<Arc<dyn LogsProvider>> {
        if let Some(message) = &self.failure {
            return Err(anyhow!("{}", message));
        }
        self.created.fetch_add(1, Ordering::SeqCst);
        let provider: Arc<dyn LogsProvider> = match self.providers.get(region) {
            Some(provider) => provider.clone(),
            None => Arc::new(FakeLogsProvider::new(region)),
        };
        Ok(provider)
    }
}
