//! Conversion of provider records into host tables.

#![warn(clippy::all, rust_2018_idioms)]

use chrono::{DateTime, SecondsFormat};

use super::error::DatasourceError;
use super::model::{RowValue, Table};
use crate::app::data_plane::cloudwatch_logs::LogEvent;

pub const LOG_COLUMNS: [&str; 4] = ["Timestamp", "IngestionTime", "LogStreamName", "Message"];
pub const SUGGESTION_COLUMNS: [&str; 2] = ["text", "value"];

/// A pick-list entry for metadata lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub text: String,
    pub value: String,
}

impl Suggestion {
    /// Suggestion whose display text is its value
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            text: name.clone(),
            value: name,
        }
    }
}

/// Format epoch milliseconds as RFC 3339 in UTC with whole seconds
pub fn format_epoch_ms(epoch_ms: i64) -> Option<String> {
    let seconds = epoch_ms.div_euclid(1000);
    let nanos = (epoch_ms.rem_euclid(1000) * 1_000_000) as u32;
    DateTime::from_timestamp(seconds, nanos)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, false))
}

/// Shape log events into the four-column log table, one row per event
pub fn logs_to_table(events: &[LogEvent]) -> Result<Table, DatasourceError> {
    let mut table = Table::with_columns(LOG_COLUMNS);
    table.rows.reserve(events.len());

    for (index, event) in events.iter().enumerate() {
        let timestamp = timestamp_cell(index, "Timestamp", event.timestamp)?;
        let ingestion_time = timestamp_cell(index, "IngestionTime", event.ingestion_time)?;
        let log_stream_name = required(index, "LogStreamName", event.log_stream_name.as_deref())?;
        let message = required(index, "Message", event.message.as_deref())?;

        table.push_row(vec![
            timestamp,
            ingestion_time,
            log_stream_name,
            message,
        ])?;
    }

    Ok(table)
}

/// Shape suggestions into the two-column `text, value` table
pub fn suggestions_to_table(entries: &[Suggestion]) -> Result<Table, DatasourceError> {
    let mut table = Table::with_columns(SUGGESTION_COLUMNS);
    for entry in entries {
        table.push_row(vec![
            RowValue::from(entry.text.as_str()),
            RowValue::from(entry.value.as_str()),
        ])?;
    }
    Ok(table)
}

fn timestamp_cell(
    index: usize,
    field: &'static str,
    value: Option<i64>,
) -> Result<RowValue, DatasourceError> {
    let epoch_ms = value.ok_or(DatasourceError::IncompleteRecord { index, field })?;
    format_epoch_ms(epoch_ms)
        .map(RowValue::String)
        .ok_or(DatasourceError::TimestampOutOfRange {
            index,
            field,
            value: epoch_ms,
        })
}

fn required(
    index: usize,
    field: &'static str,
    value: Option<&str>,
) -> Result<RowValue, DatasourceError> {
    value
        .map(RowValue::from)
        .ok_or(DatasourceError::IncompleteRecord { index, field })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cell(table: &Table, row: usize, column: usize) -> &str {
        table.rows[row].values[column].as_str().unwrap()
    }

    #[test]
    fn test_format_epoch_ms() {
        assert_eq!(
            format_epoch_ms(1_700_000_000_123).as_deref(),
            Some("2023-11-14T22:13:20+00:00")
        );
        assert_eq!(
            format_epoch_ms(0).as_deref(),
            Some("1970-01-01T00:00:00+00:00")
        );
        assert_eq!(
            format_epoch_ms(-1).as_deref(),
            Some("1969-12-31T23:59:59+00:00")
        );
        assert_eq!(format_epoch_ms(i64::MAX), None);
    }

    #[test]
    fn test_logs_to_table_columns_and_order() {
        let events = vec![
            LogEvent::new(1_700_000_000_123, 1_700_000_005_000, "stream-b", "second"),
            LogEvent::new(1_699_999_990_000, 1_700_000_001_000, "stream-a", "first"),
        ];

        let table = logs_to_table(&events).unwrap();

        assert_eq!(table.column_names(), LOG_COLUMNS.to_vec());
        assert_eq!(table.rows.len(), 2);
        assert_eq!(cell(&table, 0, 0), "2023-11-14T22:13:20+00:00");
        assert_eq!(cell(&table, 0, 1), "2023-11-14T22:13:25+00:00");
        assert_eq!(cell(&table, 0, 2), "stream-b");
        assert_eq!(cell(&table, 0, 3), "second");
        assert_eq!(cell(&table, 1, 3), "first");
        assert!(table.rows.iter().all(|row| row.values.len() == 4));
    }

    #[test]
    fn test_incomplete_record_is_reported() {
        let mut event = LogEvent::new(1000, 1000, "stream", "msg");
        event.message = None;
        let events = vec![LogEvent::new(1000, 1000, "stream", "ok"), event];

        let err = logs_to_table(&events).unwrap_err();
        assert!(matches!(
            err,
            DatasourceError::IncompleteRecord {
                index: 1,
                field: "Message"
            }
        ));

        let mut event = LogEvent::new(1000, 1000, "stream", "msg");
        event.ingestion_time = None;
        assert!(matches!(
            logs_to_table(&[event]).unwrap_err(),
            DatasourceError::IncompleteRecord {
                index: 0,
                field: "IngestionTime"
            }
        ));
    }

    #[test]
    fn test_suggestions_to_table_preserves_order() {
        let table = suggestions_to_table(&[
            Suggestion::named("/aws/lambda/b"),
            Suggestion {
                text: "Display".to_string(),
                value: "underlying".to_string(),
            },
        ])
        .unwrap();

        assert_eq!(table.column_names(), vec!["text", "value"]);
        assert_eq!(cell(&table, 0, 0), "/aws/lambda/b");
        assert_eq!(cell(&table, 0, 1), "/aws/lambda/b");
        assert_eq!(cell(&table, 1, 0), "Display");
        assert_eq!(cell(&table, 1, 1), "underlying");
    }

    #[test]
    fn test_empty_inputs_keep_schema() {
        let table = suggestions_to_table(&[]).unwrap();
        assert_eq!(table.column_names(), vec!["text", "value"]);
        assert!(table.rows.is_empty());

        let table = logs_to_table(&[]).unwrap();
        assert_eq!(table.columns.len(), 4);
        assert!(table.rows.is_empty());
    }
}
