//! Cloudflare API client for tunnelflow
//!
//! This crate wraps the parts of the Cloudflare v4 REST API that tunnelflow
//! needs to provision a named tunnel and route DNS to it:
//!
//! - account and zone discovery for tokens without explicit configuration
//! - tunnel lifecycle (list, delete, create with a fresh secret)
//! - CNAME record reconciliation towards `<tunnel_id>.cfargotunnel.com`
//!
//! # Requirements
//!
//! - `CLOUDFLARE_API_TOKEN`, `CLOUDFLARE_DOMAIN`, `CLOUDFLARE_TUNNEL_NAME`
//!   env vars; `CLOUDFLARE_ACCOUNT_ID` optional (discovered when absent)
//!
//! # Example
//!
//! ```ignore
//! use tunnelflow_cloudflare::{ApiClient, TunnelConfig, TunnelManager};
//!
//! let config = TunnelConfig::from_env()?;
//! let api = ApiClient::new(&config.api_token);
//!
//! let account_id =
//!     tunnelflow_cloudflare::resolve_account_id(&api, &config.domain, None).await?;
//! let tunnels = TunnelManager::new(&api, account_id);
//! let created = tunnels.recreate(&config.tunnel_name).await?;
//! ```

pub mod api;
pub mod config;
pub mod discovery;
pub mod dns;
pub mod error;
pub mod tunnel;

pub use api::ApiClient;
pub use config::TunnelConfig;
pub use discovery::{resolve_account_id, resolve_zone_id, zone_candidates};
pub use dns::{plan_record, tunnel_cname, DnsAction, DnsManager, DnsRecord};
pub use error::{CloudflareError, Result};
pub use tunnel::{CreatedTunnel, Tunnel, TunnelManager};
