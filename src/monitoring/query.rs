//! Resource Query Resolver - map an ARN onto a CloudWatch namespace and dimensions
//!
//! The mapping table is loaded from embedded JSON on first access and never
//! changes afterwards.

use super::error::MonitoringError;
use crate::aws::arn::Arn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Embedded query mapping (compiled into the binary)
const QUERY_FILE: &str = include_str!("../resources/cloudwatch.json");

/// Mapping entry for a `{service}/{resource_type}` key
#[derive(Debug, Clone, Deserialize)]
pub struct QueryDef {
    pub namespace: String,
    pub dimension_key: String,
}

/// Root structure of resources/cloudwatch.json
#[derive(Debug, Clone, Deserialize)]
struct QueryConfig {
    #[serde(default)]
    queries: HashMap<String, QueryDef>,
}

static QUERIES: OnceLock<HashMap<String, QueryDef>> = OnceLock::new();

/// Get the query mapping table (loads from embedded JSON on first access)
pub fn get_query_table() -> &'static HashMap<String, QueryDef> {
    QUERIES.get_or_init(|| {
        let config: QueryConfig = serde_json::from_str(QUERY_FILE)
            .unwrap_or_else(|e| panic!("Failed to parse embedded query JSON: {}", e));
        config.queries
    })
}

/// Get a mapping entry by `{service}/{resource_type}` key
pub fn get_query_def(key: &str) -> Option<&'static QueryDef> {
    get_query_table().get(key)
}

/// A CloudWatch dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub value: String,
}

impl Dimension {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// Result of resolving a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudWatchQuery {
    pub namespace: String,
    pub dimensions: Vec<Dimension>,
    /// Region named by the ARN; callers feed it into their session parameters
    pub region: Option<String>,
}

/// Resolve a resource ARN into a CloudWatch query
pub fn resolve(resource: &str) -> Result<CloudWatchQuery, MonitoringError> {
    let arn = Arn::parse(resource).map_err(|e| {
        tracing::debug!("Failed to parse resource {:?}: {}", resource, e);
        MonitoringError::InvalidResourceFormat
    })?;

    resolve_arn(&arn, resource)
}

/// Resolve an already-parsed ARN; `resource` is the raw string used in errors
pub fn resolve_arn(arn: &Arn, resource: &str) -> Result<CloudWatchQuery, MonitoringError> {
    let resource_key = format!(
        "{}/{}",
        arn.service,
        arn.resource_type.as_deref().unwrap_or("")
    );

    let Some(query_def) = get_query_def(&resource_key) else {
        return Err(MonitoringError::UnsupportedResource {
            resource: resource.to_string(),
        });
    };

    if arn.resource.is_empty() {
        return Err(MonitoringError::InvalidResourceFormat);
    }

    tracing::debug!(
        "Resolved {} -> namespace={}, {}={}",
        resource_key,
        query_def.namespace,
        query_def.dimension_key,
        arn.resource
    );

    Ok(CloudWatchQuery {
        namespace: query_def.namespace.clone(),
        dimensions: vec![Dimension::new(&query_def.dimension_key, &arn.resource)],
        region: arn.region.clone(),
    })
}
