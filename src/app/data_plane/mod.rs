//! Data Plane Services Module
//!
//! AWS data plane integrations: services that query data held inside AWS
//! resources rather than manage the resources themselves.
//!
//! ## Available Services
//!
//! - **CloudWatch Logs**: log event search plus log group and log stream listings

pub mod cloudwatch_logs;

pub use cloudwatch_logs::{CloudWatchLogsClient, ClientRegistry, LogsProvider};
