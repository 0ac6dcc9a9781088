//! Cloudflare client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CloudflareError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Cloudflare API error: {0}")]
    ApiError(String),

    #[error(
        "Could not determine the Cloudflare account id. Add the \"Account:Read\" \
         permission to the API token or set CLOUDFLARE_ACCOUNT_ID explicitly"
    )]
    AccountNotFound,

    #[error("Could not find a Cloudflare zone for domain: {0}")]
    ZoneNotFound(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, CloudflareError>;
