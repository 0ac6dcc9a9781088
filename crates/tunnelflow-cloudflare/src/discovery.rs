//! Account and zone discovery
//!
//! Works out which Cloudflare account and zone a domain belongs to when the
//! operator has not configured them explicitly. Tokens are often scoped to a
//! single zone, so discovery tolerates permission errors and falls through
//! to the next strategy instead of aborting.

use crate::api::ApiClient;
use crate::error::{CloudflareError, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub account: Option<ZoneAccount>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ZoneAccount {
    #[serde(default)]
    pub id: Option<String>,
}

/// Zone-name candidates for a domain, most specific first.
///
/// `app.dev.example.com` yields `app.dev.example.com`, `dev.example.com`
/// and `example.com`. The bare TLD is never a candidate.
pub fn zone_candidates(domain: &str) -> Vec<String> {
    let parts: Vec<&str> = domain.split('.').collect();
    (0..parts.len().saturating_sub(1))
        .map(|i| parts[i..].join("."))
        .collect()
}

/// Resolve the account id owning the domain.
///
/// Strategies, in order: the configured id, listing accounts (requires
/// Account:Read), and deriving from the zone that hosts the domain or one of
/// its parent domains. Only exhausting all three is fatal.
pub async fn resolve_account_id(
    api: &ApiClient,
    domain: &str,
    configured: Option<&str>,
) -> Result<String> {
    if let Some(id) = configured {
        return Ok(id.to_string());
    }

    match api.get::<Vec<Account>>("/accounts").await {
        Ok(accounts) => {
            tracing::debug!("/accounts returned {} accounts", accounts.len());
            if let Some(first) = accounts.first() {
                tracing::info!("Resolved account {} by listing accounts", first.id);
                return Ok(first.id.clone());
            }
        }
        Err(e) => {
            tracing::info!(
                "Could not list accounts (likely missing \"Account:Read\" permission), \
                 deriving from zone instead: {}",
                e
            );
        }
    }

    for candidate in zone_candidates(domain) {
        match api
            .get_query::<Vec<Zone>>("/zones", &[("name", candidate.as_str())])
            .await
        {
            Ok(zones) => {
                let account_id = zones
                    .iter()
                    .find(|z| z.name == candidate)
                    .and_then(|z| z.account.as_ref())
                    .and_then(|a| a.id.clone());
                if let Some(id) = account_id {
                    tracing::info!("Resolved account {} via zone {}", id, candidate);
                    return Ok(id);
                }
            }
            Err(e) => {
                tracing::warn!("Zone lookup for {} failed: {}", candidate, e);
            }
        }
    }

    Err(CloudflareError::AccountNotFound)
}

/// Resolve the id of the zone that must host the DNS record.
///
/// The domain may be `sub.example.com` while the zone is `example.com`, so
/// this walks the same suffix candidates, scoped to the known account.
pub async fn resolve_zone_id(api: &ApiClient, domain: &str, account_id: &str) -> Result<String> {
    for candidate in zone_candidates(domain) {
        match api
            .get_query::<Vec<Zone>>(
                "/zones",
                &[("name", candidate.as_str()), ("account.id", account_id)],
            )
            .await
        {
            Ok(zones) => {
                if let Some(zone) = zones.iter().find(|z| z.name == candidate) {
                    return Ok(zone.id.clone());
                }
            }
            Err(e) => {
                tracing::warn!("Zone lookup for {} failed: {}", candidate, e);
            }
        }
    }

    Err(CloudflareError::ZoneNotFound(domain.to_string()))
}
