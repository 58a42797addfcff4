//! Errors raised while turning a request into a CloudWatch query

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitoringError {
    /// The resource is not a well-formed ARN, or names no concrete resource
    #[error("Invalid resource format")]
    InvalidResourceFormat,

    #[error("Resource is not supported: {resource}")]
    UnsupportedResource { resource: String },

    #[error("Stat is not supported (supported stat = {supported_stat})")]
    UnsupportedStat { supported_stat: String },
}
