//! AWS session setup
//!
//! Builds an SDK configuration from the plugin's option and secret maps:
//! static access keys, an optional assumed role, and the session region.

use anyhow::{Context, Result};
use aws_config::sts::AssumeRoleProvider;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_credential_types::Credentials;
use serde_json::{Map, Value};

/// Region used when neither the secret data nor the environment names one
pub const DEFAULT_REGION: &str = "us-east-1";

/// Session name used when assuming a role
const DEFAULT_SESSION_NAME: &str = "cwmetrics";

/// Provider name attached to credentials taken from secret data
const SECRET_PROVIDER_NAME: &str = "SecretData";

/// Parameters for one AWS session
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionParams {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    pub role_arn: Option<String>,
    pub external_id: Option<String>,
    pub region: String,
    pub endpoint_url: Option<String>,
    pub session_name: String,
}

// Keep keys out of logs
impl std::fmt::Debug for SessionParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionParams")
            .field("access_key_id", &self.access_key_id.as_ref().map(|_| "***"))
            .field("role_arn", &self.role_arn)
            .field("region", &self.region)
            .field("endpoint_url", &self.endpoint_url)
            .field("session_name", &self.session_name)
            .finish_non_exhaustive()
    }
}

impl SessionParams {
    /// Read session parameters from plugin options and secret data
    pub fn from_maps(
        options: &Map<String, Value>,
        secret_data: &Map<String, Value>,
    ) -> Result<Self> {
        let access_key_id = get_string(secret_data, "aws_access_key_id")?;
        let secret_access_key = get_string(secret_data, "aws_secret_access_key")?;

        if access_key_id.is_some() != secret_access_key.is_some() {
            return Err(anyhow::anyhow!(
                "aws_access_key_id and aws_secret_access_key must be given together"
            ));
        }

        // secret data > options > environment > built-in default
        let region = match get_string(secret_data, "region_name")? {
            Some(region) => region,
            None => get_string(options, "default_region")?
                .or_else(get_default_region)
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
        };

        Ok(Self {
            access_key_id,
            secret_access_key,
            session_token: get_string(secret_data, "aws_session_token")?,
            role_arn: get_string(secret_data, "role_arn")?,
            external_id: get_string(secret_data, "external_id")?,
            region,
            endpoint_url: get_string(options, "endpoint_url")?,
            session_name: get_string(options, "session_name")?
                .unwrap_or_else(|| DEFAULT_SESSION_NAME.to_string()),
        })
    }

    /// Static credentials, when access keys were supplied
    fn static_credentials(&self) -> Option<Credentials> {
        let (Some(access_key_id), Some(secret_access_key)) =
            (&self.access_key_id, &self.secret_access_key)
        else {
            return None;
        };

        Some(Credentials::new(
            access_key_id,
            secret_access_key,
            self.session_token.clone(),
            None,
            SECRET_PROVIDER_NAME,
        ))
    }
}

/// String value of `key`; null and empty strings count as absent
fn get_string(map: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(anyhow::anyhow!("'{}' must be a string", key)),
    }
}

/// Validate an AWS region name (e.g. `us-east-1`, `us-gov-west-1`)
fn validate_region(region: &str) -> bool {
    if region.len() < 4 || region.len() > 32 {
        return false;
    }

    match region.chars().next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }

    if region.ends_with('-') {
        return false;
    }

    region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Read the default region from the environment
pub fn get_default_region() -> Option<String> {
    for var in ["AWS_REGION", "AWS_DEFAULT_REGION"] {
        if let Ok(region) = std::env::var(var) {
            if validate_region(&region) {
                return Some(region);
            }
            tracing::warn!("Invalid region format in {}", var);
        }
    }
    None
}

/// Build an SDK configuration and make sure its credentials resolve
pub async fn load_sdk_config(params: &SessionParams) -> Result<SdkConfig> {
    tracing::debug!("Creating AWS session: {:?}", params);

    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(params.region.clone()));

    if let Some(credentials) = params.static_credentials() {
        loader = loader.credentials_provider(credentials);
    }
    if let Some(endpoint_url) = &params.endpoint_url {
        loader = loader.endpoint_url(endpoint_url);
    }

    let mut config = loader.load().await;

    if let Some(role_arn) = &params.role_arn {
        tracing::debug!("Assuming role {}", role_arn);

        let mut builder = AssumeRoleProvider::builder(role_arn)
            .session_name(&params.session_name)
            .configure(&config);
        if let Some(external_id) = &params.external_id {
            builder = builder.external_id(external_id);
        }
        let provider = builder.build().await;

        config = config
            .into_builder()
            .credentials_provider(SharedCredentialsProvider::new(provider))
            .build();
    }

    let provider = config
        .credentials_provider()
        .context("No AWS credentials provider available")?;
    provider
        .provide_credentials()
        .await
        .context("Failed to resolve AWS credentials")?;

    Ok(config)
}
