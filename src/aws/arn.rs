//! ARN parsing
//!
//! Splits an Amazon Resource Name into its components:
//! `arn:partition:service:region:account-id:resource`, where the resource part
//! may carry a type prefix (`instance/i-0abc`, `function:my-fn`).

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Services whose resource part never carries a type prefix
const UNTYPED_SERVICES: &[&str] = &["s3", "sns", "apigateway", "execute-api"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArnError {
    #[error("ARN must start with 'arn:'")]
    MissingPrefix,
    #[error("ARN must have 6 ':'-separated fields, found {0}")]
    TooFewFields(usize),
}

/// A parsed ARN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arn {
    pub partition: String,
    pub service: String,
    pub region: Option<String>,
    pub account: Option<String>,
    pub resource_type: Option<String>,
    /// `/` or `:`, whichever followed the resource type
    pub resource_separator: Option<char>,
    pub resource: String,
}

impl Arn {
    pub fn parse(input: &str) -> Result<Self, ArnError> {
        if !input.starts_with("arn:") {
            return Err(ArnError::MissingPrefix);
        }

        let fields: Vec<&str> = input.splitn(6, ':').collect();
        if fields.len() < 6 {
            return Err(ArnError::TooFewFields(fields.len()));
        }

        let service = fields[2].to_string();
        let untyped = UNTYPED_SERVICES.contains(&fields[2]);
        let (resource_type, resource_separator, resource) = if untyped {
            (None, None, fields[5].to_string())
        } else {
            split_resource(fields[5])
        };

        Ok(Self {
            partition: fields[1].to_string(),
            service,
            region: non_empty(fields[3]),
            account: non_empty(fields[4]),
            resource_type,
            resource_separator,
            resource,
        })
    }
}

impl FromStr for Arn {
    type Err = ArnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Arn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:{}:{}:{}:",
            self.partition,
            self.service,
            self.region.as_deref().unwrap_or(""),
            self.account.as_deref().unwrap_or("")
        )?;
        match &self.resource_type {
            Some(resource_type) => write!(
                f,
                "{}{}{}",
                resource_type,
                self.resource_separator.unwrap_or('/'),
                self.resource
            ),
            None => f.write_str(&self.resource),
        }
    }
}

/// Split `type/value` or `type:value` at the first separator
fn split_resource(resource: &str) -> (Option<String>, Option<char>, String) {
    match resource.char_indices().find(|&(_, c)| c == '/' || c == ':') {
        Some((idx, separator)) => (
            Some(resource[..idx].to_string()),
            Some(separator),
            resource[idx + 1..].to_string(),
        ),
        None => (None, None, resource.to_string()),
    }
}

fn non_empty(field: &str) -> Option<String> {
    if field.is_empty() {
        None
    } else {
        Some(field.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ec2_instance() {
        let arn = Arn::parse("arn:aws:ec2:us-east-1:123456789012:instance/i-0abc").unwrap();
        assert_eq!(arn.partition, "aws");
        assert_eq!(arn.service, "ec2");
        assert_eq!(arn.region.as_deref(), Some("us-east-1"));
        assert_eq!(arn.account.as_deref(), Some("123456789012"));
        assert_eq!(arn.resource_type.as_deref(), Some("instance"));
        assert_eq!(arn.resource, "i-0abc");
    }

    #[test]
    fn test_parse_colon_separated_resource() {
        let arn = Arn::parse("arn:aws:lambda:eu-west-1:123456789012:function:my-fn:prod").unwrap();
        assert_eq!(arn.resource_type.as_deref(), Some("function"));
        assert_eq!(arn.resource_separator, Some(':'));
        assert_eq!(arn.resource, "my-fn:prod");
    }

    #[test]
    fn test_parse_untyped_service() {
        let arn = Arn::parse("arn:aws:s3:::my-bucket/key/path").unwrap();
        assert_eq!(arn.region, None);
        assert_eq!(arn.account, None);
        assert_eq!(arn.resource_type, None);
        assert_eq!(arn.resource, "my-bucket/key/path");
    }

    #[test]
    fn test_parse_without_separator() {
        let arn = Arn::parse("arn:aws:iam::123456789012:root").unwrap();
        assert_eq!(arn.resource_type, None);
        assert_eq!(arn.resource, "root");
    }

    #[test]
    fn test_parse_empty_resource_value() {
        let arn = Arn::parse("arn:aws:ec2:us-east-1:123456789012:instance/").unwrap();
        assert_eq!(arn.resource_type.as_deref(), Some("instance"));
        assert!(arn.resource.is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(Arn::parse("i-0abc"), Err(ArnError::MissingPrefix));
        assert_eq!(
            Arn::parse("arn:aws:ec2:us-east-1"),
            Err(ArnError::TooFewFields(4))
        );
    }

    #[test]
    fn test_display_round_trips_typed_arn() {
        let raw = "arn:aws:ec2:us-east-1:123456789012:volume/vol-1";
        let arn: Arn = raw.parse().unwrap();
        assert_eq!(arn.to_string(), raw);
    }

    #[test]
    fn test_display_keeps_colon_separator() {
        let raw = "arn:aws:lambda:eu-west-1:123456789012:function:my-fn";
        let arn: Arn = raw.parse().unwrap();
        assert_eq!(arn.to_string(), raw);
    }

    #[test]
    fn test_display_untyped_resource() {
        let raw = "arn:aws:s3:::my-bucket/key/path";
        let arn: Arn = raw.parse().unwrap();
        assert_eq!(arn.to_string(), raw);
    }
}
