//! Shared AWS SDK configuration loading
//!
//! SES and S3 clients are built from the same `SdkConfig`, loaded once at
//! startup and passed to the components that need them.

use crate::config::AwsConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Load an `SdkConfig` from application configuration.
///
/// Explicit access keys win; otherwise a named profile, otherwise the default
/// credential chain (environment, IAM role, ...).
pub async fn load_sdk_config(config: &AwsConfig) -> SdkConfig {
    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));

    if let Some(endpoint) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    if let (Some(access_key), Some(secret_key)) =
        (&config.access_key_id, &config.secret_access_key)
    {
        let credentials = aws_sdk_sesv2::config::Credentials::new(
            access_key.clone(),
            secret_key.clone(),
            None, // session token
            None, // expiration
            "courier-static",
        );
        loader = loader.credentials_provider(credentials);
    } else if let Some(profile) = &config.profile {
        loader = loader.profile_name(profile);
    }

    loader.load().await
}
