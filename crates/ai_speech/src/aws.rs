//! Shared AWS SDK setup and error mapping

use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use tracing::info;

use crate::config::SpeechConfig;
use crate::error::SpeechError;

/// Region used when neither configuration nor environment names one
pub const FALLBACK_REGION: &str = "us-east-1";

/// Load the shared SDK configuration
///
/// Credentials come from the default provider chain. The configured region
/// wins over the environment.
pub async fn load_sdk_config(config: &SpeechConfig) -> SdkConfig {
    let region_provider = RegionProviderChain::first_try(config.aws_region.clone().map(Region::new))
        .or_default_provider()
        .or_else(Region::new(FALLBACK_REGION));

    let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);
    if let Some(endpoint) = &config.aws_endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    let sdk_config = loader.load().await;
    info!(
        region = ?sdk_config.region(),
        custom_endpoint = config.aws_endpoint_url.is_some(),
        "Loaded AWS configuration"
    );
    sdk_config
}

const THROTTLING_CODES: &[&str] = &[
    "ThrottlingException",
    "Throttling",
    "TooManyRequestsException",
    "LimitExceededException",
    "SlowDown",
];

/// Map an SDK error onto the speech error taxonomy
///
/// Throttling, timeouts and dispatch failures get their own variants;
/// everything else is wrapped by `otherwise`.
pub(crate) fn map_sdk_error<E>(
    err: &SdkError<E, HttpResponse>,
    otherwise: impl FnOnce(String) -> SpeechError,
) -> SpeechError
where
    E: std::error::Error + ProvideErrorMetadata + Send + Sync + 'static,
{
    if err.code().is_some_and(|code| THROTTLING_CODES.contains(&code)) {
        return SpeechError::RateLimited;
    }

    match err {
        SdkError::TimeoutError(_) => {
            SpeechError::ServiceUnavailable(format!("request timed out: {}", DisplayErrorContext(err)))
        },
        SdkError::DispatchFailure(_) => {
            SpeechError::ConnectionFailed(DisplayErrorContext(err).to_string())
        },
        _ => otherwise(DisplayErrorContext(err).to_string()),
    }
}
