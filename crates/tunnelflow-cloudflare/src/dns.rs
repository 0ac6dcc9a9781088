//! Cloudflare DNS record reconciliation
//!
//! Points the configured hostname at `<tunnel_id>.cfargotunnel.com` via a
//! proxied CNAME record, with at most one write per run: nothing when the
//! record is already correct, an in-place update when it is wrong, a create
//! when it is missing.

use crate::api::ApiClient;
use crate::error::Result;
use serde::{Deserialize, Serialize};

const TUNNEL_CNAME_SUFFIX: &str = "cfargotunnel.com";

/// CNAME target for a tunnel id.
pub fn tunnel_cname(tunnel_id: &str) -> String {
    format!("{}.{}", tunnel_id, TUNNEL_CNAME_SUFFIX)
}

/// DNS record as returned by the API
#[derive(Debug, Clone, Deserialize)]
pub struct DnsRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub content: String,
    pub ttl: u32,
    pub proxied: bool,
}

#[derive(Debug, Serialize)]
struct DnsRecordBody {
    #[serde(rename = "type")]
    record_type: String,
    name: String,
    content: String,
    proxied: bool,
    ttl: u32, // 1 = automatic
}

impl DnsRecordBody {
    fn cname(name: &str, target: &str) -> Self {
        Self {
            record_type: "CNAME".to_string(),
            name: name.to_string(),
            content: target.to_string(),
            proxied: true,
            ttl: 1,
        }
    }
}

/// The single write (or no-op) that reconciles a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DnsAction {
    /// Record already points at the target.
    Keep,
    /// Record exists with the wrong target; update it in place.
    Update { record_id: String },
    /// No record yet; create one.
    Create,
}

/// Decide how to reconcile `existing` towards `target`.
pub fn plan_record(existing: Option<&DnsRecord>, target: &str) -> DnsAction {
    match existing {
        Some(record) if record.content == target => DnsAction::Keep,
        Some(record) => DnsAction::Update {
            record_id: record.id.clone(),
        },
        None => DnsAction::Create,
    }
}

/// DNS operations scoped to one zone
pub struct DnsManager<'a> {
    api: &'a ApiClient,
    zone_id: String,
}

impl<'a> DnsManager<'a> {
    pub fn new(api: &'a ApiClient, zone_id: impl Into<String>) -> Self {
        Self {
            api,
            zone_id: zone_id.into(),
        }
    }

    /// Find the CNAME record for an exact hostname.
    pub async fn find_cname(&self, name: &str) -> Result<Option<DnsRecord>> {
        let records: Vec<DnsRecord> = self
            .api
            .get_query(
                &format!("/zones/{}/dns_records", self.zone_id),
                &[("type", "CNAME"), ("name", name)],
            )
            .await?;
        Ok(records.into_iter().find(|r| r.name == name))
    }

    /// Ensure a proxied CNAME for `name` points at `target`.
    pub async fn ensure_cname(&self, name: &str, target: &str) -> Result<()> {
        let existing = self.find_cname(name).await?;

        match plan_record(existing.as_ref(), target) {
            DnsAction::Keep => {
                tracing::info!("DNS record for {} already points at {}", name, target);
            }
            DnsAction::Update { record_id } => {
                tracing::info!("Updating DNS record for {} -> {}", name, target);
                let _: DnsRecord = self
                    .api
                    .put(
                        &format!("/zones/{}/dns_records/{}", self.zone_id, record_id),
                        &DnsRecordBody::cname(name, target),
                    )
                    .await?;
            }
            DnsAction::Create => {
                tracing::info!("Creating DNS record for {} -> {}", name, target);
                let _: DnsRecord = self
                    .api
                    .post(
                        &format!("/zones/{}/dns_records", self.zone_id),
                        &DnsRecordBody::cname(name, target),
                    )
                    .await?;
            }
        }

        Ok(())
    }
}
