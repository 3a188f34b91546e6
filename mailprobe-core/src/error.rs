use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailProbeError {
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("invalid proxy configuration: {0}")]
    InvalidProxy(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("amsc cookie missing from signup response")]
    AmscCookieMissing,

    #[error("canary token missing or unparseable")]
    CanaryMissing,

    #[error("no cookie detected on account page")]
    SessionCookieMissing,

    #[error("could not detect value for {0}")]
    FormFieldMissing(String),

    #[error("unexpected response shape: {0}")]
    UnexpectedResponse(String),

    #[error("invalid status id: {0}")]
    InvalidStatusId(u8),
}

pub type Result<T> = std::result::Result<T, MailProbeError>;
