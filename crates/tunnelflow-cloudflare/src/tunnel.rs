//! Tunnel lifecycle
//!
//! Cloudflare never returns an existing tunnel's secret, so a tunnel that
//! already carries the configured name is deleted and recreated. The bearer
//! token in the creation response is the only way to run the tunnel daemon
//! and must be captured immediately.

use crate::api::ApiClient;
use crate::error::Result;
use base64::Engine;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Tunnel as listed by the API
#[derive(Debug, Clone, Deserialize)]
pub struct Tunnel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub deleted_at: Option<String>,
}

/// Creation response; `token` is only issued here.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedTunnel {
    pub id: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
struct CreateTunnelRequest {
    name: String,
    tunnel_secret: String,
}

/// Tunnel operations scoped to one account
pub struct TunnelManager<'a> {
    api: &'a ApiClient,
    account_id: String,
}

impl<'a> TunnelManager<'a> {
    pub fn new(api: &'a ApiClient, account_id: impl Into<String>) -> Self {
        Self {
            api,
            account_id: account_id.into(),
        }
    }

    /// Ensure exactly one tunnel with this name exists and return its id and
    /// run token. Any existing same-named tunnel is deleted first; its old
    /// token stops working.
    pub async fn recreate(&self, name: &str) -> Result<CreatedTunnel> {
        if let Some(existing) = self.find_by_name(name).await? {
            tracing::info!(
                "Tunnel '{}' already exists, deleting to recreate (credentials are only issued at creation)",
                name
            );
            self.delete(&existing.id).await?;
        }
        self.create(name).await
    }

    /// Find a live tunnel by name. Lists with a bounded page size and filters
    /// in memory; name filtering via query params has permission quirks on
    /// some token scopes.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Tunnel>> {
        let tunnels: Vec<Tunnel> = self
            .api
            .get_query(
                &format!("/accounts/{}/tunnels", self.account_id),
                &[("per_page", "50")],
            )
            .await?;
        Ok(tunnels
            .into_iter()
            .find(|t| t.name == name && t.deleted_at.is_none()))
    }

    /// Delete a tunnel. Open connections block deletion, so they are dropped
    /// first, best-effort; a failed tunnel deletion itself is an error.
    pub async fn delete(&self, tunnel_id: &str) -> Result<()> {
        if let Err(e) = self
            .api
            .delete(&format!(
                "/accounts/{}/tunnels/{}/connections",
                self.account_id, tunnel_id
            ))
            .await
        {
            tracing::debug!("Clearing tunnel connections failed: {}", e);
        }

        self.api
            .delete(&format!(
                "/accounts/{}/tunnels/{}",
                self.account_id, tunnel_id
            ))
            .await
    }

    async fn create(&self, name: &str) -> Result<CreatedTunnel> {
        tracing::info!("Creating tunnel '{}'", name);
        let request = CreateTunnelRequest {
            name: name.to_string(),
            tunnel_secret: generate_secret(),
        };
        let created: CreatedTunnel = self
            .api
            .post(&format!("/accounts/{}/tunnels", self.account_id), &request)
            .await?;
        tracing::info!("Tunnel created with id {}", created.id);
        Ok(created)
    }
}

/// Fresh 32-byte tunnel secret, standard base64.
fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
