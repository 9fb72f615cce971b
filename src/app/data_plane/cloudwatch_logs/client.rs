//! CloudWatch Logs Client Wrapper
//!
//! [`LogsProvider`] is the seam between the datasource and the CloudWatch Logs
//! API: one call per provider page. [`CloudWatchLogsClient`] implements it over
//! the AWS SDK, and the `*_all` helpers drive full pagination for any provider.

#![warn(clippy::all, rust_2018_idioms)]

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_cloudwatchlogs as cloudwatchlogs;

use super::pagination::{collect_pages, Collected, PaginationLimits};
use super::types::{FilterDescriptor, LogEvent, LogGroupEntry, LogStreamEntry, Page};

/// Page-level access to CloudWatch Logs
#[async_trait]
pub trait LogsProvider: Send + Sync {
    /// Region this provider is bound to
    fn region(&self) -> &str;

    /// One page of `FilterLogEvents`
    async fn filter_log_events_page(
        &self,
        filter: &FilterDescriptor,
        next_token: Option<String>,
    ) -> Result<Page<LogEvent>>;

    /// One page of `DescribeLogGroups`
    async fn describe_log_groups_page(
        &self,
        log_group_name_prefix: Option<&str>,
        next_token: Option<String>,
    ) -> Result<Page<LogGroupEntry>>;

    /// One page of `DescribeLogStreams`
    async fn describe_log_streams_page(
        &self,
        log_group_name: &str,
        next_token: Option<String>,
    ) -> Result<Page<LogStreamEntry>>;
}

/// Search log events across every page matching `filter`
pub async fn filter_all_log_events(
    provider: &dyn LogsProvider,
    filter: &FilterDescriptor,
    limits: PaginationLimits,
) -> Result<Collected<LogEvent>> {
    collect_pages(limits, move |token| {
        provider.filter_log_events_page(filter, token)
    })
    .await
    .with_context(|| {
        format!(
            "Failed to filter log events in log group {} ({})",
            filter.log_group_name.as_deref().unwrap_or("<unset>"),
            provider.region()
        )
    })
}

/// List every log group whose name starts with `prefix`
pub async fn describe_all_log_groups(
    provider: &dyn LogsProvider,
    prefix: Option<&str>,
    limits: PaginationLimits,
) -> Result<Collected<LogGroupEntry>> {
    collect_pages(limits, move |token| {
        provider.describe_log_groups_page(prefix, token)
    })
    .await
    .with_context(|| format!("Failed to list log groups in {}", provider.region()))
}

/// List every log stream in `log_group_name`
pub async fn describe_all_log_streams(
    provider: &dyn LogsProvider,
    log_group_name: &str,
    limits: PaginationLimits,
) -> Result<Collected<LogStreamEntry>> {
    collect_pages(limits, move |token| {
        provider.describe_log_streams_page(log_group_name, token)
    })
    .await
    .with_context(|| {
        format!(
            "Failed to list log streams for log group: {}",
            log_group_name
        )
    })
}

/// CloudWatch Logs client bound to one region
#[derive(Clone, Debug)]
pub struct CloudWatchLogsClient {
    client: cloudwatchlogs::Client,
    region: String,
}

impl CloudWatchLogsClient {
    /// Wrap an SDK client built from a region-scoped config
    pub fn new(aws_config: &aws_config::SdkConfig, region: impl Into<String>) -> Self {
        Self {
            client: cloudwatchlogs::Client::new(aws_config),
            region: region.into(),
        }
    }
}

#[async_trait]
impl LogsProvider for CloudWatchLogsClient {
    fn region(&self) -> &str {
        &self.region
    }

    async fn filter_log_events_page(
        &self,
        filter: &FilterDescriptor,
        next_token: Option<String>,
    ) -> Result<Page<LogEvent>> {
        let mut request = self
            .client
            .filter_log_events()
            .set_log_group_name(filter.log_group_name.clone())
            .set_log_stream_name_prefix(filter.log_stream_name_prefix.clone())
            .set_filter_pattern(filter.filter_pattern.clone())
            .set_limit(filter.limit)
            .set_start_time(filter.start_time)
            .set_end_time(filter.end_time)
            .set_next_token(next_token);

        for stream_name in &filter.log_stream_names {
            request = request.log_stream_names(stream_name.clone());
        }

        let response = request.send().await?;

        let events = response
            .events
            .unwrap_or_default()
            .into_iter()
            .map(|event| LogEvent {
                event_id: event.event_id,
                timestamp: event.timestamp,
                ingestion_time: event.ingestion_time,
                log_stream_name: event.log_stream_name,
                message: event.message,
            })
            .collect();

        Ok(Page {
            items: events,
            next_token: response.next_token,
        })
    }

    async fn describe_log_groups_page(
        &self,
        log_group_name_prefix: Option<&str>,
        next_token: Option<String>,
    ) -> Result<Page<LogGroupEntry>> {
        let response = self
            .client
            .describe_log_groups()
            .set_log_group_name_prefix(log_group_name_prefix.map(str::to_string))
            .set_next_token(next_token)
            .send()
            .await?;

        let groups = response
            .log_groups
            .unwrap_or_default()
            .into_iter()
            .map(|group| LogGroupEntry {
                log_group_name: group.log_group_name,
                creation_time: group.creation_time,
            })
            .collect();

        Ok(Page {
            items: groups,
            next_token: response.next_token,
        })
    }

    async fn describe_log_streams_page(
        &self,
        log_group_name: &str,
        next_token: Option<String>,
    ) -> Result<Page<LogStreamEntry>> {
        let response = self
            .client
            .describe_log_streams()
            .log_group_name(log_group_name)
            .set_next_token(next_token)
            .send()
            .await?;

        let streams = response
            .log_streams
            .unwrap_or_default()
            .into_iter()
            .map(|stream| LogStreamEntry {
                log_stream_name: stream.log_stream_name,
                creation_time: stream.creation_time,
            })
            .collect();

        Ok(Page {
            items: streams,
            next_token: response.next_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::data_plane::cloudwatch_logs::fake::FakeLogsProvider;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_filter_all_log_events_passes_descriptor_to_every_page() {
        let provider = FakeLogsProvider::new("us-east-1").with_event_pages(vec![
            Page::with_next(vec![LogEvent::new(1000, 1001, "a", "first")], "p2"),
            Page::last(vec![LogEvent::new(2000, 2001, "b", "second")]),
        ]);
        let filter = FilterDescriptor::for_log_group("/aws/lambda/fn").with_time_bounds(10, 20);

        let collected = filter_all_log_events(&provider, &filter, PaginationLimits::default())
            .await
            .unwrap();

        assert_eq!(collected.items.len(), 2);
        assert_eq!(provider.filter_calls(), 2);
        assert_eq!(provider.last_filter(), Some(filter));
    }

    #[tokio::test]
    async fn test_provider_error_carries_log_group_context() {
        let provider = FakeLogsProvider::new("eu-west-1").failing_with("AccessDeniedException");
        let filter = FilterDescriptor::for_log_group("/secret");

        let err = filter_all_log_events(&provider, &filter, PaginationLimits::default())
            .await
            .unwrap_err();

        let message = format!("{:#}", err);
        assert!(message.contains("/secret"));
        assert!(message.contains("eu-west-1"));
        assert!(message.contains("AccessDeniedException"));
    }
}
