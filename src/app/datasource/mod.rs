//! CloudWatch Logs datasource for a visualization host.
//!
//! Translates host query requests into CloudWatch Logs searches and listings
//! and reshapes the results into generic tables.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use awslogs_datasource::app::config::DatasourceConfig;
//! use awslogs_datasource::app::datasource::{CloudWatchLogsDatasource, DatasourceRequest};
//!
//! # async fn example(request: DatasourceRequest) -> anyhow::Result<()> {
//! let config = DatasourceConfig::load()?;
//! let datasource = CloudWatchLogsDatasource::from_config(&config);
//!
//! let response = datasource.query(&request).await?;
//! for result in &response.results {
//!     println!("{}: {} tables", result.ref_id, result.tables.len());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all, rust_2018_idioms)]

pub mod dispatcher;
pub mod error;
pub mod model;
pub mod query;
pub mod shaping;

pub use dispatcher::CloudWatchLogsDatasource;
pub use error::DatasourceError;
pub use model::{
    DatasourceRequest, DatasourceResponse, Query, QueryResult, RawTimeRange, RowValue, Table,
    TableColumn, TableRow,
};
pub use query::{Format, MetricFindQuery, QueryMode, QueryTarget, Subtype, TimeRange};
pub use shaping::{logs_to_table, suggestions_to_table, Suggestion};
