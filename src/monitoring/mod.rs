//! Monitoring module
//!
//! Turns a resource ARN plus request parameters into a CloudWatch query and
//! dispatches it to a metrics backend.
//!
//! # Module Structure
//!
//! - [`query`] - ARN -> namespace/dimensions mapping
//! - [`stat`] - stat token translation
//! - [`period`] - period selection from a time range
//! - [`backend`] - traits and result types the backend implements
//! - [`manager`] - the `verify` / `list_metrics` / `get_metric_data` entry points
//!
//! # Example
//!
//! ```ignore
//! use cwmetrics::aws::CloudWatchBackend;
//! use cwmetrics::monitoring::{MonitoringManager, Options, SecretData};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let manager = MonitoringManager::new(CloudWatchBackend::new());
//!     let metrics = manager
//!         .list_metrics(
//!             &Options::new(),
//!             &SecretData::new(),
//!             "arn:aws:ec2:us-east-1:123456789012:instance/i-0abc",
//!         )
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod error;
pub mod manager;
pub mod period;
pub mod query;
pub mod stat;

pub use backend::{
    MetricData, MetricDataRequest, MetricInfo, MetricsBackend, MetricsInfo, MetricsSession,
    Options, SecretData,
};
pub use error::MonitoringError;
pub use manager::{MonitoringManager, REGION_KEY};
pub use query::{CloudWatchQuery, Dimension};
