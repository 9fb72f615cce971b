//! CloudWatch Logs Data Types
//!
//! Records and request descriptors exchanged with the CloudWatch Logs API.

#![warn(clippy::all, rust_2018_idioms)]

use serde::{Deserialize, Serialize};

/// Filter parameters for a `FilterLogEvents` search.
///
/// Deserialized from the `input` object of a panel's query model. Keys are
/// camelCase; the PascalCase names used by the AWS API are accepted as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDescriptor {
    /// Log group to search
    #[serde(default, alias = "LogGroupName")]
    pub log_group_name: Option<String>,
    /// Only search streams whose name starts with this prefix
    #[serde(default, alias = "LogStreamNamePrefix")]
    pub log_stream_name_prefix: Option<String>,
    /// Explicit stream names to search (empty = all streams)
    #[serde(default, alias = "LogStreamNames")]
    pub log_stream_names: Vec<String>,
    /// Filter pattern (CloudWatch Logs filter syntax)
    #[serde(default, alias = "FilterPattern")]
    pub filter_pattern: Option<String>,
    /// Page size hint passed through to the provider
    #[serde(default, alias = "Limit")]
    pub limit: Option<i32>,
    /// Start time (Unix timestamp in milliseconds)
    #[serde(default, alias = "StartTime")]
    pub start_time: Option<i64>,
    /// End time (Unix timestamp in milliseconds)
    #[serde(default, alias = "EndTime")]
    pub end_time: Option<i64>,
}

impl FilterDescriptor {
    /// Create a descriptor for a log group with no other filters
    pub fn for_log_group(log_group_name: impl Into<String>) -> Self {
        Self {
            log_group_name: Some(log_group_name.into()),
            ..Self::default()
        }
    }

    /// Set the search window, replacing any bounds already present
    pub fn with_time_bounds(mut self, start_time: i64, end_time: i64) -> Self {
        self.start_time = Some(start_time);
        self.end_time = Some(end_time);
        self
    }

    /// Set the stream name prefix
    pub fn with_log_stream_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.log_stream_name_prefix = Some(prefix.into());
        self
    }

    /// Set the filter pattern
    pub fn with_filter_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.filter_pattern = Some(pattern.into());
        self
    }
}

/// A single log event as returned by `FilterLogEvents`.
///
/// Field names serialize in the provider's PascalCase so the annotation
/// payload matches the raw API shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    /// Event timestamp (Unix milliseconds)
    #[serde(default)]
    pub timestamp: Option<i64>,
    /// Time when the event was ingested (Unix milliseconds)
    #[serde(default)]
    pub ingestion_time: Option<i64>,
    /// Name of the log stream this event belongs to
    #[serde(default)]
    pub log_stream_name: Option<String>,
    /// Log message content
    #[serde(default)]
    pub message: Option<String>,
}

impl LogEvent {
    /// Create a fully populated log event
    pub fn new(
        timestamp: i64,
        ingestion_time: i64,
        log_stream_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            event_id: None,
            timestamp: Some(timestamp),
            ingestion_time: Some(ingestion_time),
            log_stream_name: Some(log_stream_name.into()),
            message: Some(message.into()),
        }
    }
}

/// A log group returned by `DescribeLogGroups`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogGroupEntry {
    pub log_group_name: Option<String>,
    /// Creation time (Unix milliseconds)
    pub creation_time: Option<i64>,
}

impl LogGroupEntry {
    pub fn new(name: impl Into<String>, creation_time: i64) -> Self {
        Self {
            log_group_name: Some(name.into()),
            creation_time: Some(creation_time),
        }
    }
}

/// A log stream returned by `DescribeLogStreams`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogStreamEntry {
    pub log_stream_name: Option<String>,
    /// Creation time (Unix milliseconds)
    pub creation_time: Option<i64>,
}

impl LogStreamEntry {
    pub fn new(name: impl Into<String>, creation_time: i64) -> Self {
        Self {
            log_stream_name: Some(name.into()),
            creation_time: Some(creation_time),
        }
    }
}

/// One page of provider results plus its continuation token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    /// The final page of a listing
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_token: None,
        }
    }

    /// A page followed by more results
    pub fn with_next(items: Vec<T>, next_token: impl Into<String>) -> Self {
        Self {
            items,
            next_token: Some(next_token.into()),
        }
    }
}

/// Accumulated output of a `FilterLogEvents` search across every page.
///
/// Serialized verbatim into the annotation result's metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FilteredEvents {
    pub events: Vec<LogEvent>,
    /// True when pagination stopped at a configured limit
    #[serde(default, skip_serializing_if = "is_false")]
    pub truncated: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_descriptor_accepts_both_key_styles() {
        let camel: FilterDescriptor = serde_json::from_str(
            r#"{"logGroupName":"/aws/lambda/fn","logStreamNamePrefix":"2024","filterPattern":"ERROR"}"#,
        )
        .unwrap();
        let pascal: FilterDescriptor = serde_json::from_str(
            r#"{"LogGroupName":"/aws/lambda/fn","LogStreamNamePrefix":"2024","FilterPattern":"ERROR"}"#,
        )
        .unwrap();

        assert_eq!(camel, pascal);
        assert_eq!(camel.log_group_name.as_deref(), Some("/aws/lambda/fn"));
        assert!(camel.log_stream_names.is_empty());
    }

    #[test]
    fn test_with_time_bounds_overrides_existing_values() {
        let descriptor = FilterDescriptor {
            start_time: Some(1),
            end_time: Some(2),
            ..FilterDescriptor::for_log_group("group")
        }
        .with_time_bounds(1000, 2000);

        assert_eq!(descriptor.start_time, Some(1000));
        assert_eq!(descriptor.end_time, Some(2000));
    }

    #[test]
    fn test_filtered_events_serialize_with_provider_field_names() {
        let payload = FilteredEvents {
            events: vec![LogEvent::new(1000, 1500, "stream-a", "hello")],
            truncated: false,
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["Events"][0]["Timestamp"], 1000);
        assert_eq!(json["Events"][0]["IngestionTime"], 1500);
        assert_eq!(json["Events"][0]["LogStreamName"], "stream-a");
        assert_eq!(json["Events"][0]["Message"], "hello");
        assert!(json.get("Truncated").is_none());
    }
}
