//! Environment configuration
//!
//! All settings come from `CLOUDFLARE_*` environment variables, read once at
//! startup. Missing required variables fail before any network call.

use crate::error::{CloudflareError, Result};

/// Provisioner configuration
#[derive(Debug, Clone)]
pub struct TunnelConfig {
    pub api_token: String,
    pub domain: String,
    pub tunnel_name: String,
    pub account_id: Option<String>,
}

impl TunnelConfig {
    /// Create TunnelConfig from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_token: required("CLOUDFLARE_API_TOKEN")?,
            domain: required("CLOUDFLARE_DOMAIN")?,
            tunnel_name: required("CLOUDFLARE_TUNNEL_NAME")?,
            account_id: optional("CLOUDFLARE_ACCOUNT_ID"),
        })
    }

    /// Loggable hint about the token without revealing it.
    pub fn token_hint(&self) -> String {
        let prefix: String = self.api_token.chars().take(4).collect();
        format!("length {}, starts with {}...", self.api_token.len(), prefix)
    }
}

fn required(name: &str) -> Result<String> {
    optional(name).ok_or_else(|| CloudflareError::MissingEnvVar(name.to_string()))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 4] = [
        "CLOUDFLARE_API_TOKEN",
        "CLOUDFLARE_DOMAIN",
        "CLOUDFLARE_TUNNEL_NAME",
        "CLOUDFLARE_ACCOUNT_ID",
    ];

    #[test]
    fn fails_without_required_vars() {
        temp_env::with_vars_unset(VARS, || {
            let err = TunnelConfig::from_env().unwrap_err();
            assert!(matches!(err, CloudflareError::MissingEnvVar(_)));
        });
    }

    #[test]
    fn loads_and_trims_values() {
        temp_env::with_vars(
            [
                ("CLOUDFLARE_API_TOKEN", Some(" token-value \n")),
                ("CLOUDFLARE_DOMAIN", Some("app.example.com")),
                ("CLOUDFLARE_TUNNEL_NAME", Some("mytunnel")),
                ("CLOUDFLARE_ACCOUNT_ID", None),
            ],
            || {
                let config = TunnelConfig::from_env().unwrap();
                assert_eq!(config.api_token, "token-value");
                assert_eq!(config.domain, "app.example.com");
                assert_eq!(config.tunnel_name, "mytunnel");
                assert!(config.account_id.is_none());
            },
        );
    }

    #[test]
    fn empty_account_id_counts_as_unset() {
        temp_env::with_vars(
            [
                ("CLOUDFLARE_API_TOKEN", Some("t")),
                ("CLOUDFLARE_DOMAIN", Some("app.example.com")),
                ("CLOUDFLARE_TUNNEL_NAME", Some("mytunnel")),
                ("CLOUDFLARE_ACCOUNT_ID", Some("  ")),
            ],
            || {
                let config = TunnelConfig::from_env().unwrap();
                assert!(config.account_id.is_none());
            },
        );
    }

    #[test]
    fn token_hint_never_contains_full_token() {
        let config = TunnelConfig {
            api_token: "super-secret-token".to_string(),
            domain: "app.example.com".to_string(),
            tunnel_name: "mytunnel".to_string(),
            account_id: None,
        };
        let hint = config.token_hint();
        assert!(hint.contains("supe"));
        assert!(!hint.contains("super-secret-token"));
    }
}
