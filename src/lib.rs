//! Resolve AWS resource ARNs into CloudWatch queries and fetch their metrics.
//!
//! - [`monitoring`] - query resolution, request normalization and the manager
//! - [`aws`] - ARN parsing and the CloudWatch backend
//! - [`config`] - persistent configuration and parameter files

pub mod aws;
pub mod config;
pub mod monitoring;

/// Version injected at compile time via CWMETRICS_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("CWMETRICS_VERSION") {
    Some(v) => v,
    None => "dev",
};
