//! AWS interaction module
//!
//! # Module Structure
//!
//! - [`arn`] - ARN parsing
//! - [`session`] - SDK configuration from plugin options and secret data
//! - [`connector`] - CloudWatch implementation of the metrics backend

pub mod arn;
pub mod connector;
pub mod session;

pub use arn::{Arn, ArnError};
pub use connector::{CloudWatchBackend, CloudWatchSession};
pub use session::SessionParams;

/// Format an AWS error for display
/// Security: Maps well-known failures to generic messages instead of raw service output
pub fn format_aws_error(error: &anyhow::Error) -> String {
    if let Some(err) = error.downcast_ref::<crate::monitoring::MonitoringError>() {
        return err.to_string();
    }

    let error_str = format!("{:#}", error);

    if error_str.contains("InvalidClientTokenId") || error_str.contains("SignatureDoesNotMatch") {
        return "Authentication failed. Check aws_access_key_id and aws_secret_access_key."
            .to_string();
    }
    if error_str.contains("ExpiredToken") {
        return "Credentials have expired. Refresh the session token.".to_string();
    }
    if error_str.contains("AccessDenied") || error_str.contains("UnauthorizedOperation") {
        return "Permission denied. Check the IAM permissions for CloudWatch.".to_string();
    }
    if error_str.contains("Throttling") || error_str.contains("RequestLimitExceeded") {
        return "Rate limit exceeded. Please try again later.".to_string();
    }
    if error_str.contains("InvalidParameter") || error_str.contains("MissingParameter") {
        return "Invalid request. Check your parameters.".to_string();
    }
    if error_str.contains("InternalServiceError") || error_str.contains("ServiceUnavailable") {
        return "CloudWatch temporarily unavailable. Please try again.".to_string();
    }
    if error_str.contains("dispatch failure") {
        return "Request failed. Check your network connection and try again.".to_string();
    }

    // Truncate long error messages and remove potential sensitive data
    let sanitized = error_str
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .take(120)
        .collect::<String>();

    if sanitized.len() < error_str.len() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}
