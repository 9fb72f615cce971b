//! Core modules of the CloudWatch Logs datasource.
//!
//! # Module Organization
//!
//! - [`config`] - file and environment configuration
//! - [`data_plane`] - CloudWatch Logs clients, pagination, and the per-region client registry
//! - [`datasource`] - host request decoding, mode dispatch, and table shaping
//!
//! # Architecture
//!
//! [`datasource::CloudWatchLogsDatasource`] receives a host request, decodes its
//! targets, fetches every page from [`data_plane::cloudwatch_logs`] through a
//! region-scoped client, and shapes the records into tables.

pub mod config;
pub mod data_plane;
pub mod datasource;

pub use datasource::CloudWatchLogsDatasource;
