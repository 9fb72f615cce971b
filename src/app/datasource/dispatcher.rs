//! Request entry point for the CloudWatch Logs datasource.
//!
//! The first target's model selects the mode for the whole request:
//!
//! - `metricFindQuery` lists log group or log stream names for pick-lists.
//!   Failures come back as a single `metricFindQuery` result carrying the error.
//! - `annotationQuery` searches the first target's log group and returns the raw
//!   events as JSON metadata. Failures are returned as `Err` to the transport.
//! - anything else is a bulk log query: every target is searched in order and
//!   shaped into a log table. Failures replace the whole response with a single
//!   error result; no partial results are returned.

#![warn(clippy::all, rust_2018_idioms)]

use std::cmp::Reverse;

use super::error::DatasourceError;
use super::model::{DatasourceRequest, DatasourceResponse, QueryResult};
use super::query::{
    Format, MetricFindQuery, QueryMode, QueryTarget, Subtype, TimeRange, METRIC_FIND_QUERY,
};
use super::shaping::{logs_to_table, suggestions_to_table, Suggestion};
use crate::app::config::DatasourceConfig;
use crate::app::data_plane::cloudwatch_logs::{
    describe_all_log_groups, describe_all_log_streams, filter_all_log_events, AwsClientFactory,
    ClientFactory, ClientRegistry, FilteredEvents, LogsProvider, PaginationLimits,
};

/// CloudWatch Logs datasource answering host query requests
pub struct CloudWatchLogsDatasource<F> {
    registry: ClientRegistry<F>,
    limits: PaginationLimits,
}

impl CloudWatchLogsDatasource<AwsClientFactory> {
    /// Datasource backed by real AWS clients
    pub fn from_config(config: &DatasourceConfig) -> Self {
        Self::new(AwsClientFactory, config)
    }
}

impl<F: ClientFactory> CloudWatchLogsDatasource<F> {
    pub fn new(factory: F, config: &DatasourceConfig) -> Self {
        Self {
            registry: ClientRegistry::new(factory)
                .with_default_region(config.default_region.clone()),
            limits: config.pagination,
        }
    }

    pub fn registry(&self) -> &ClientRegistry<F> {
        &self.registry
    }

    /// Answer a host request.
    ///
    /// Returns `Err` only when the mode cannot be determined or an annotation
    /// query fails; every other failure is reported inside the response.
    pub async fn query(
        &self,
        request: &DatasourceRequest,
    ) -> Result<DatasourceResponse, DatasourceError> {
        let first = request.queries.first().ok_or(DatasourceError::NoQueries)?;

        match QueryMode::decode(&first.model_json) {
            Ok(QueryMode::MetadataSuggestion(query)) => {
                log_debug!("Dispatching metricFindQuery ({:?})", query.subtype);
                Ok(self.metric_find_query(&query).await.unwrap_or_else(|e| {
                    log_error!("metricFindQuery failed: {}", e);
                    DatasourceResponse::single(QueryResult::error(METRIC_FIND_QUERY, e.to_string()))
                }))
            }
            Ok(QueryMode::Annotation) => {
                log_debug!("Dispatching annotationQuery");
                self.annotation_query(request).await
            }
            Ok(QueryMode::LogTable) => {
                log_debug!("Dispatching log query for {} targets", request.queries.len());
                Ok(self.inline_error(self.log_table_query(request).await))
            }
            Err(e @ DatasourceError::UnknownQueryType(_)) => Ok(self.inline_error(Err(e))),
            Err(e) => Err(e),
        }
    }

    fn inline_error(
        &self,
        result: Result<DatasourceResponse, DatasourceError>,
    ) -> DatasourceResponse {
        result.unwrap_or_else(|e| {
            log_error!("Query failed: {}", e);
            DatasourceResponse::single(QueryResult::error("", e.to_string()))
        })
    }

    /// Search every target and shape each into a log table
    pub async fn log_table_query(
        &self,
        request: &DatasourceRequest,
    ) -> Result<DatasourceResponse, DatasourceError> {
        let range = TimeRange::parse(&request.time_range)?;
        let targets = request
            .queries
            .iter()
            .map(|query| QueryTarget::decode_in_range(&query.model_json, range))
            .collect::<Result<Vec<_>, _>>()?;

        let mut response = DatasourceResponse::default();
        for target in &targets {
            match &target.format {
                Format::TimeSeries => return Err(DatasourceError::UnsupportedFormat),
                Format::Unrecognized(format) => {
                    log_warn!(
                        "Skipping target {} with unrecognized format {:?}",
                        target.ref_id,
                        format
                    );
                    continue;
                }
                Format::Table => {}
            }

            let events = self.fetch_events(target).await?;
            let table = logs_to_table(&events.events)?;
            trace_debug!(
                "Target {} produced {} rows",
                target.ref_id,
                table.rows.len()
            );
            response
                .results
                .push(QueryResult::table(target.ref_id.clone(), table));
        }

        log_info!(
            "Log query answered {} of {} targets",
            response.results.len(),
            targets.len()
        );
        Ok(response)
    }

    /// Search the first target and return the raw events as metadata JSON
    pub async fn annotation_query(
        &self,
        request: &DatasourceRequest,
    ) -> Result<DatasourceResponse, DatasourceError> {
        let first = request.queries.first().ok_or(DatasourceError::NoQueries)?;
        let range = TimeRange::parse(&request.time_range)?;
        let target = QueryTarget::decode_in_range(&first.model_json, range)?;

        let events = self.fetch_events(&target).await?;
        let meta_json = serde_json::to_string(&events).map_err(DatasourceError::Serialization)?;

        log_info!("Annotation query returned {} events", events.events.len());
        Ok(DatasourceResponse::single(QueryResult::meta(meta_json)))
    }

    /// Answer a pick-list lookup with a two-column suggestion table
    pub async fn metric_find_query(
        &self,
        query: &MetricFindQuery,
    ) -> Result<DatasourceResponse, DatasourceError> {
        let client = self.registry.get_client(&query.region).await?;

        let suggestions = match &query.subtype {
            Subtype::LogGroupNames { prefix } => {
                self.log_group_suggestions(client.as_ref(), prefix.as_deref())
                    .await?
            }
            Subtype::LogStreamNames { log_group_name } => {
                self.log_stream_suggestions(client.as_ref(), log_group_name)
                    .await?
            }
            Subtype::Unsupported(subtype) => {
                trace_debug!("No suggestions for subtype {:?}", subtype);
                Vec::new()
            }
        };

        Ok(DatasourceResponse::single(QueryResult::table(
            METRIC_FIND_QUERY,
            suggestions_to_table(&suggestions)?,
        )))
    }

    async fn fetch_events(&self, target: &QueryTarget) -> Result<FilteredEvents, DatasourceError> {
        let client = self.registry.get_client(&target.region).await?;
        let collected = filter_all_log_events(client.as_ref(), &target.filter, self.limits)
            .await
            .map_err(DatasourceError::Provider)?;

        Ok(FilteredEvents {
            events: collected.items,
            truncated: collected.truncated,
        })
    }

    async fn log_group_suggestions(
        &self,
        client: &dyn LogsProvider,
        prefix: Option<&str>,
    ) -> Result<Vec<Suggestion>, DatasourceError> {
        let mut groups = describe_all_log_groups(client, prefix, self.limits)
            .await
            .map_err(DatasourceError::Provider)?
            .items;
        groups.sort_by_key(|group| Reverse(group.creation_time));

        groups
            .into_iter()
            .enumerate()
            .map(|(index, group)| {
                group
                    .log_group_name
                    .map(Suggestion::named)
                    .ok_or(DatasourceError::IncompleteRecord {
                        index,
                        field: "LogGroupName",
                    })
            })
            .collect()
    }

    async fn log_stream_suggestions(
        &self,
        client: &dyn LogsProvider,
        log_group_name: &str,
    ) -> Result<Vec<Suggestion>, DatasourceError> {
        let mut streams = describe_all_log_streams(client, log_group_name, self.limits)
            .await
            .map_err(DatasourceError::Provider)?
            .items;
        streams.sort_by_key(|stream| Reverse(stream.creation_time));

        streams
            .into_iter()
            .enumerate()
            .map(|(index, stream)| {
                stream
                    .log_stream_name
                    .map(Suggestion::named)
                    .ok_or(DatasourceError::IncompleteRecord {
                        index,
                        field: "LogStreamName",
                    })
            })
            .collect()
    }
}
