//! Backend seam
//!
//! The manager talks to the metrics service only through these traits, so the
//! production CloudWatch backend and test doubles are interchangeable.

use super::query::Dimension;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form plugin options
pub type Options = Map<String, Value>;

/// Credential and session parameters
pub type SecretData = Map<String, Value>;

/// A metric available for a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricInfo {
    pub key: String,
    pub name: String,
    pub namespace: String,
    pub dimensions: Vec<Dimension>,
}

/// Result of listing metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsInfo {
    pub metrics: Vec<MetricInfo>,
}

/// Time series returned for one metric
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricData {
    pub labels: Vec<DateTime<Utc>>,
    pub values: Vec<f64>,
}

/// A CloudWatch data request after normalization
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDataRequest<'a> {
    pub namespace: &'a str,
    pub dimensions: &'a [Dimension],
    pub metric: &'a str,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub period: i32,
    pub stat: &'a str,
}

/// Opens authenticated sessions against the metrics service
#[async_trait]
pub trait MetricsBackend: Send + Sync {
    type Session: MetricsSession;

    async fn create_session(
        &self,
        options: &Options,
        secret_data: &SecretData,
    ) -> Result<Self::Session>;
}

/// An authenticated session
#[async_trait]
pub trait MetricsSession: Send + Sync {
    async fn list_metrics(&self, namespace: &str, dimensions: &[Dimension]) -> Result<MetricsInfo>;

    async fn get_metric_data(&self, request: &MetricDataRequest<'_>) -> Result<MetricData>;
}
