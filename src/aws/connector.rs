//! CloudWatch backend
//!
//! Production implementation of the metrics backend traits over
//! `aws-sdk-cloudwatch`.

use super::session::{load_sdk_config, SessionParams};
use crate::monitoring::{
    Dimension, MetricData, MetricDataRequest, MetricInfo, MetricsBackend, MetricsInfo,
    MetricsSession, Options, SecretData,
};
use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_cloudwatch::error::DisplayErrorContext;
use aws_sdk_cloudwatch::types::{
    Dimension as CwDimension, DimensionFilter, Metric, MetricDataQuery, MetricStat, ScanBy,
};
use aws_sdk_cloudwatch::Client;
use aws_smithy_types::DateTime as SmithyDateTime;
use chrono::{TimeZone, Utc};
use std::collections::BTreeMap;

/// Query id used for the single metric requested per call
const QUERY_ID: &str = "m1";

/// Creates CloudWatch sessions
#[derive(Debug, Clone, Default)]
pub struct CloudWatchBackend;

impl CloudWatchBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MetricsBackend for CloudWatchBackend {
    type Session = CloudWatchSession;

    async fn create_session(
        &self,
        options: &Options,
        secret_data: &SecretData,
    ) -> Result<CloudWatchSession> {
        let params = SessionParams::from_maps(options, secret_data)?;
        let config = load_sdk_config(&params).await?;

        Ok(CloudWatchSession {
            client: Client::new(&config),
        })
    }
}

/// An authenticated CloudWatch client
#[derive(Clone)]
pub struct CloudWatchSession {
    client: Client,
}

#[async_trait]
impl MetricsSession for CloudWatchSession {
    async fn list_metrics(&self, namespace: &str, dimensions: &[Dimension]) -> Result<MetricsInfo> {
        tracing::debug!("ListMetrics namespace={} dimensions={:?}", namespace, dimensions);

        let filters = dimension_filters(dimensions);
        let mut by_name: BTreeMap<String, MetricInfo> = BTreeMap::new();
        let mut next_token: Option<String> = None;

        loop {
            let output = self
                .client
                .list_metrics()
                .namespace(namespace)
                .set_dimensions(Some(filters.clone()))
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| {
                    tracing::error!("ListMetrics failed: {}", DisplayErrorContext(&e));
                    anyhow::Error::new(e)
                })?;

            for metric in output.metrics() {
                let Some(name) = metric.metric_name() else {
                    continue;
                };
                by_name.entry(name.to_string()).or_insert_with(|| MetricInfo {
                    key: name.to_string(),
                    name: name.to_string(),
                    namespace: namespace.to_string(),
                    dimensions: dimensions.to_vec(),
                });
            }

            match output.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }

        tracing::debug!("ListMetrics found {} metrics", by_name.len());

        Ok(MetricsInfo {
            metrics: by_name.into_values().collect(),
        })
    }

    async fn get_metric_data(&self, request: &MetricDataRequest<'_>) -> Result<MetricData> {
        tracing::debug!(
            "GetMetricData namespace={} metric={} period={} stat={}",
            request.namespace,
            request.metric,
            request.period,
            request.stat
        );

        let query = build_metric_query(request);
        let mut data = MetricData::default();
        let mut next_token: Option<String> = None;

        loop {
            let output = self
                .client
                .get_metric_data()
                .metric_data_queries(query.clone())
                .start_time(SmithyDateTime::from_secs(request.start.timestamp()))
                .end_time(SmithyDateTime::from_secs(request.end.timestamp()))
                .scan_by(ScanBy::TimestampAscending)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| {
                    tracing::error!("GetMetricData failed: {}", DisplayErrorContext(&e));
                    anyhow::Error::new(e)
                })?;

            for result in output.metric_data_results() {
                for (timestamp, value) in result.timestamps().iter().zip(result.values()) {
                    let Some(label) = Utc
                        .timestamp_opt(timestamp.secs(), timestamp.subsec_nanos())
                        .single()
                    else {
                        continue;
                    };
                    data.labels.push(label);
                    data.values.push(*value);
                }
            }

            match output.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }

        Ok(data)
    }
}

/// ListMetrics filters matching every dimension exactly
fn dimension_filters(dimensions: &[Dimension]) -> Vec<DimensionFilter> {
    dimensions
        .iter()
        .map(|d| DimensionFilter::builder().name(&d.name).value(&d.value).build())
        .collect()
}

/// The single GetMetricData query for a request
fn build_metric_query(request: &MetricDataRequest<'_>) -> MetricDataQuery {
    let dimensions = request
        .dimensions
        .iter()
        .map(|d| CwDimension::builder().name(&d.name).value(&d.value).build())
        .collect();

    let metric = Metric::builder()
        .namespace(request.namespace)
        .metric_name(request.metric)
        .set_dimensions(Some(dimensions))
        .build();

    let metric_stat = MetricStat::builder()
        .metric(metric)
        .period(request.period)
        .stat(request.stat)
        .build();

    MetricDataQuery::builder()
        .id(QUERY_ID)
        .metric_stat(metric_stat)
        .return_data(true)
        .build()
}
