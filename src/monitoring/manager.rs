//! Monitoring Manager
//!
//! Entry points used by callers: resolve the resource, normalize the request,
//! open a backend session and hand the query over.

use super::backend::{
    MetricData, MetricDataRequest, MetricsBackend, MetricsInfo, MetricsSession, Options,
    SecretData,
};
use super::period::select_period;
use super::query::{self, CloudWatchQuery};
use super::stat::normalize;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Key under which the session region is passed to the backend
pub const REGION_KEY: &str = "region_name";

pub struct MonitoringManager<B: MetricsBackend> {
    backend: B,
}

impl<B: MetricsBackend> MonitoringManager<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Check that a session can be established with the given credentials
    pub async fn verify(&self, options: &Options, secret_data: &SecretData) -> Result<()> {
        self.backend.create_session(options, secret_data).await?;
        tracing::info!("Session verified");
        Ok(())
    }

    /// List the metrics CloudWatch has for a resource
    pub async fn list_metrics(
        &self,
        options: &Options,
        secret_data: &SecretData,
        resource: &str,
    ) -> Result<MetricsInfo> {
        let query = query::resolve(resource)?;
        let secret_data = with_region(secret_data, &query);

        let session = self.backend.create_session(options, &secret_data).await?;
        session.list_metrics(&query.namespace, &query.dimensions).await
    }

    /// Fetch data points of one metric for a resource
    #[allow(clippy::too_many_arguments)]
    pub async fn get_metric_data(
        &self,
        options: &Options,
        secret_data: &SecretData,
        resource: &str,
        metric: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        period: Option<i32>,
        stat: Option<&str>,
    ) -> Result<MetricData> {
        let query = query::resolve(resource)?;
        let secret_data = with_region(secret_data, &query);

        let period = period.unwrap_or_else(|| select_period(&start, &end));
        let stat = normalize(stat)?;

        tracing::debug!(
            "get_metric_data: resource={}, metric={}, period={}, stat={}",
            resource,
            metric,
            period,
            stat
        );

        let session = self.backend.create_session(options, &secret_data).await?;
        session
            .get_metric_data(&MetricDataRequest {
                namespace: &query.namespace,
                dimensions: &query.dimensions,
                metric,
                start,
                end,
                period,
                stat,
            })
            .await
    }
}

/// Copy of `secret_data` carrying the region named by the resource
fn with_region(secret_data: &SecretData, query: &CloudWatchQuery) -> SecretData {
    let mut merged = secret_data.clone();
    match &query.region {
        Some(region) => {
            merged.insert(REGION_KEY.to_string(), Value::String(region.clone()));
        }
        None => {
            merged.insert(REGION_KEY.to_string(), Value::Null);
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::query::Dimension;

    fn query(region: Option<&str>) -> CloudWatchQuery {
        CloudWatchQuery {
            namespace: "AWS/EC2".to_string(),
            dimensions: vec![Dimension::new("InstanceId", "i-0abc")],
            region: region.map(str::to_string),
        }
    }

    #[test]
    fn test_with_region_sets_region_name() {
        let mut secret = SecretData::new();
        secret.insert("aws_access_key_id".to_string(), Value::from("AKIA"));

        let merged = with_region(&secret, &query(Some("us-east-1")));
        assert_eq!(merged[REGION_KEY], "us-east-1");
        assert_eq!(merged["aws_access_key_id"], "AKIA");
        assert!(!secret.contains_key(REGION_KEY));
    }

    #[test]
    fn test_with_region_overrides_existing_region() {
        let mut secret = SecretData::new();
        secret.insert(REGION_KEY.to_string(), Value::from("eu-west-1"));

        let merged = with_region(&secret, &query(Some("us-west-2")));
        assert_eq!(merged[REGION_KEY], "us-west-2");
    }

    #[test]
    fn test_with_region_clears_region_for_global_arn() {
        let mut secret = SecretData::new();
        secret.insert(REGION_KEY.to_string(), Value::from("eu-west-1"));

        let merged = with_region(&secret, &query(None));
        assert_eq!(merged[REGION_KEY], Value::Null);
    }
}
