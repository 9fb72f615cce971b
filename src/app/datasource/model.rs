//! Host-facing request and response envelopes.
//!
//! A request carries one time range shared by an ordered list of queries, each
//! with an opaque JSON model. A response carries one result per answered query:
//! tables for log and suggestion lookups, a metadata JSON string for
//! annotations, or an error message.

#![warn(clippy::all, rust_2018_idioms)]

use serde::{Deserialize, Serialize};

use super::error::DatasourceError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasourceRequest {
    pub time_range: RawTimeRange,
    #[serde(default)]
    pub queries: Vec<Query>,
}

/// Time range bounds as decimal epoch-millisecond strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTimeRange {
    pub from_raw: String,
    pub to_raw: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    #[serde(default)]
    pub ref_id: String,
    /// Panel query model, passed through as a JSON document
    pub model_json: String,
}

impl DatasourceRequest {
    pub fn new(from_raw: impl Into<String>, to_raw: impl Into<String>) -> Self {
        Self {
            time_range: RawTimeRange {
                from_raw: from_raw.into(),
                to_raw: to_raw.into(),
            },
            queries: Vec::new(),
        }
    }

    pub fn with_query(mut self, ref_id: impl Into<String>, model: &serde_json::Value) -> Self {
        self.queries.push(Query {
            ref_id: ref_id.into(),
            model_json: model.to_string(),
        });
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasourceResponse {
    pub results: Vec<QueryResult>,
}

impl DatasourceResponse {
    pub fn single(result: QueryResult) -> Self {
        Self {
            results: vec![result],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ref_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<Table>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_json: Option<String>,
}

impl QueryResult {
    pub fn table(ref_id: impl Into<String>, table: Table) -> Self {
        Self {
            ref_id: ref_id.into(),
            tables: vec![table],
            ..Self::default()
        }
    }

    pub fn error(ref_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            ref_id: ref_id.into(),
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn meta(meta_json: String) -> Self {
        Self {
            meta_json: Some(meta_json),
            ..Self::default()
        }
    }
}

/// Column-ordered table; every row holds one value per column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<TableRow>,
}

impl Table {
    pub fn with_columns<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: names
                .into_iter()
                .map(|name| TableColumn { name: name.into() })
                .collect(),
            rows: Vec::new(),
        }
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Append a row. Rows whose width differs from the column count are
    /// rejected.
    pub fn push_row(&mut self, values: Vec<RowValue>) -> Result<(), DatasourceError> {
        if values.len() != self.columns.len() {
            return Err(DatasourceError::RowWidthMismatch {
                expected: self.columns.len(),
                actual: values.len(),
            });
        }
        self.rows.push(TableRow { values });
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumn {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub values: Vec<RowValue>,
}

/// Typed table cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RowValue {
    Null,
    String(String),
    Int64(i64),
    Double(f64),
    Bool(bool),
}

impl RowValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RowValue::String(value) => Some(value),
            _ => None,
        }
    }
}

impl From<String> for RowValue {
    fn from(value: String) -> Self {
        RowValue::String(value)
    }
}

impl From<&str> for RowValue {
    fn from(value: &str) -> Self {
        RowValue::String(value.to_string())
    }
}
