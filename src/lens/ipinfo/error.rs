use thiserror::Error;

/// Failure to obtain geolocation data from the provider.
///
/// Transport and decoding failures share this one type; callers print the
/// message and stop without inspecting which stage failed.
#[derive(Debug, Error)]
pub enum FetchOrParseError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: ureq::Error,
    },

    #[error("unable to decode geolocation response: {0}")]
    Decode(#[from] serde_json::Error),
}
