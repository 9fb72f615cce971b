//! Decoding of per-target query models.
//!
//! The mode of a request is taken from the first target's `queryType` and
//! decoded into [`QueryMode`]; log targets decode into [`QueryTarget`]. Neither
//! decoder checks whether a region or log group actually exists.
//!
//! Log targets are decoded strictly. The mode selector and `metricFindQuery`
//! parameters are read leniently: a value of the wrong JSON type, `null`
//! included, reads as an empty string.

#![warn(clippy::all, rust_2018_idioms)]

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::error::DatasourceError;
use super::model::RawTimeRange;
use crate::app::data_plane::cloudwatch_logs::FilterDescriptor;

pub const METRIC_FIND_QUERY: &str = "metricFindQuery";
pub const ANNOTATION_QUERY: &str = "annotationQuery";

/// Epoch-millisecond bounds shared by every target of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub from_ms: i64,
    pub to_ms: i64,
}

impl TimeRange {
    pub fn parse(raw: &RawTimeRange) -> Result<Self, DatasourceError> {
        Ok(Self {
            from_ms: parse_epoch_ms(&raw.from_raw)?,
            to_ms: parse_epoch_ms(&raw.to_raw)?,
        })
    }
}

fn parse_epoch_ms(value: &str) -> Result<i64, DatasourceError> {
    value
        .parse::<i64>()
        .map_err(|source| DatasourceError::MalformedTimeRange {
            value: value.to_string(),
            source,
        })
}

/// Output format declared by a log target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Format {
    Table,
    TimeSeries,
    Unrecognized(String),
}

impl From<String> for Format {
    fn from(value: String) -> Self {
        match value.as_str() {
            "table" => Format::Table,
            "timeserie" => Format::TimeSeries,
            _ => Format::Unrecognized(value),
        }
    }
}

/// One decoded log query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTarget {
    pub ref_id: String,
    pub format: Format,
    pub region: String,
    pub filter: FilterDescriptor,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTarget {
    #[serde(default)]
    ref_id: String,
    #[serde(default)]
    format: String,
    #[serde(default)]
    region: String,
    #[serde(default, alias = "Input")]
    input: FilterDescriptor,
}

impl QueryTarget {
    /// Decode a target from its JSON model
    pub fn decode(model_json: &str) -> Result<Self, DatasourceError> {
        let raw: RawTarget = serde_json::from_str(model_json)?;
        Ok(Self {
            ref_id: raw.ref_id,
            format: Format::from(raw.format),
            region: raw.region,
            filter: raw.input,
        })
    }

    /// Decode a target and pin its filter to the request's time range
    pub fn decode_in_range(model_json: &str, range: TimeRange) -> Result<Self, DatasourceError> {
        let mut target = Self::decode(model_json)?;
        target.filter = target.filter.with_time_bounds(range.from_ms, range.to_ms);
        Ok(target)
    }
}

/// Which metadata lookup a suggestion query asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subtype {
    LogGroupNames { prefix: Option<String> },
    LogStreamNames { log_group_name: String },
    Unsupported(String),
}

/// Parameters of a `metricFindQuery`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricFindQuery {
    pub region: String,
    pub subtype: Subtype,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMetricFind {
    #[serde(default, deserialize_with = "lenient_string")]
    region: String,
    #[serde(default, deserialize_with = "lenient_string")]
    subtype: String,
    #[serde(default, deserialize_with = "lenient_string")]
    prefix: String,
    #[serde(default, deserialize_with = "lenient_string")]
    log_group_name: String,
}

/// Read a string field, treating any non-string value as empty
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => value,
        _ => String::new(),
    })
}

impl From<RawMetricFind> for MetricFindQuery {
    fn from(raw: RawMetricFind) -> Self {
        let subtype = match raw.subtype.as_str() {
            "log_group_names" => Subtype::LogGroupNames {
                prefix: Some(raw.prefix).filter(|p| !p.is_empty()),
            },
            "log_stream_names" => Subtype::LogStreamNames {
                log_group_name: raw.log_group_name,
            },
            _ => Subtype::Unsupported(raw.subtype),
        };
        Self {
            region: raw.region,
            subtype,
        }
    }
}

/// How a request is answered, decided by its first target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryMode {
    MetadataSuggestion(MetricFindQuery),
    Annotation,
    LogTable,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModeProbe {
    #[serde(default, deserialize_with = "lenient_string")]
    query_type: String,
}

impl QueryMode {
    pub fn decode(model_json: &str) -> Result<Self, DatasourceError> {
        let probe: ModeProbe = serde_json::from_str(model_json)?;
        match probe.query_type.as_str() {
            "" => Ok(QueryMode::LogTable),
            ANNOTATION_QUERY => Ok(QueryMode::Annotation),
            METRIC_FIND_QUERY => {
                let raw: RawMetricFind = serde_json::from_str(model_json)?;
                Ok(QueryMode::MetadataSuggestion(raw.into()))
            }
            other => Err(DatasourceError::UnknownQueryType(other.to_string())),
        }
    }
}
