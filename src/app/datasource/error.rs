/// Errors raised while answering a datasource request
#[derive(Debug, thiserror::Error)]
pub enum DatasourceError {
    #[error("request contains no queries")]
    NoQueries,

    #[error("invalid time range bound {value:?}: {source}")]
    MalformedTimeRange {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("invalid query model: {0}")]
    InvalidQueryModel(#[from] serde_json::Error),

    #[error("unknown query type: {0}")]
    UnknownQueryType(String),

    #[error("no region given and no default region configured")]
    MissingRegion,

    #[error("failed to create CloudWatch Logs client: {0:#}")]
    Client(#[source] anyhow::Error),

    #[error("{0:#}")]
    Provider(#[source] anyhow::Error),

    #[error("not supported")]
    UnsupportedFormat,

    #[error("log record {index} has no {field}")]
    IncompleteRecord { index: usize, field: &'static str },

    #[error("log record {index} has {field} out of range: {value}")]
    TimestampOutOfRange {
        index: usize,
        field: &'static str,
        value: i64,
    },

    #[error("row has {actual} values but the table has {expected} columns")]
    RowWidthMismatch { expected: usize, actual: usize },

    #[error("failed to serialize result: {0}")]
    Serialization(#[source] serde_json::Error),
}
