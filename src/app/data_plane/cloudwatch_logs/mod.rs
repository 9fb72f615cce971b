//! CloudWatch Logs Integration Module
//!
//! Provides paginated access to AWS CloudWatch Logs for the datasource.
//!
//! ## Features
//!
//! - Log event search with log group, stream prefix, and pattern filters
//! - Log group and log stream listings
//! - Token-driven pagination with configurable page and record limits
//! - One lazily built client per region
//!
//! ## Usage
//!
//! ```rust,no_run
//! use awslogs_datasource::app::data_plane::cloudwatch_logs::{
//!     filter_all_log_events, AwsClientFactory, ClientRegistry, FilterDescriptor, PaginationLimits,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let registry = ClientRegistry::new(AwsClientFactory);
//! let client = registry.get_client("us-east-1").await?;
//!
//! let filter = FilterDescriptor::for_log_group("/aws/lambda/my-function")
//!     .with_time_bounds(1_700_000_000_000, 1_700_003_600_000);
//! let collected = filter_all_log_events(client.as_ref(), &filter, PaginationLimits::default()).await?;
//!
//! for event in collected.items {
//!     println!("{:?}: {:?}", event.timestamp, event.message);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all, rust_2018_idioms)]

pub mod client;
#[cfg(any(test, feature = "test-util"))]
pub mod fake;
pub mod pagination;
pub mod registry;
pub mod types;

// Re-export commonly used types
pub use client::{
    describe_all_log_groups, describe_all_log_streams, filter_all_log_events, CloudWatchLogsClient,
    LogsProvider,
};
pub use pagination::{collect_pages, Collected, PaginationLimits};
pub use registry::{AwsClientFactory, ClientFactory, ClientRegistry};
pub use types::{FilterDescriptor, FilteredEvents, LogEvent, LogGroupEntry, LogStreamEntry, Page};
