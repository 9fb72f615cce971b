//! AWS CloudWatch Logs datasource adapter.
//!
//! Lets a visualization host query CloudWatch Logs and render the results as
//! tables or annotations. A host request (time range + per-panel query models)
//! is routed to one of three modes:
//!
//! - **Metadata suggestion** (`metricFindQuery`): log group or log stream names
//!   for pick-lists, newest first
//! - **Annotation** (`annotationQuery`): raw log events serialized as metadata JSON
//! - **Log table** (default): one `Timestamp, IngestionTime, LogStreamName, Message`
//!   table per target
//!
//! Every provider listing is paginated to completion, bounded by the configured
//! [`app::data_plane::cloudwatch_logs::PaginationLimits`].
//!
//! The entry point is [`CloudWatchLogsDatasource`]; `src/main.rs` wraps it in a
//! command-line harness that answers one JSON request.

#![warn(clippy::all, rust_2018_idioms)]

// Include logging macros first
#[macro_use]
pub mod logging_macros;

pub mod app;
pub use app::CloudWatchLogsDatasource;
