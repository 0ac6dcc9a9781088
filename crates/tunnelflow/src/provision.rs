//! Two-phase provisioning run
//!
//! Phase 1 talks to the Cloudflare API and either yields a runnable tunnel
//! or an error. Phase 2 always launches processes: on success the tunnel
//! daemon plus the app dev server, on failure the app alone, so a broken
//! token or permission set leaves the container debuggable instead of
//! crash-looping.

use colored::Colorize;
use tunnelflow_cloudflare::{
    resolve_account_id, resolve_zone_id, tunnel_cname, ApiClient, DnsManager, Result,
    TunnelConfig, TunnelManager,
};

use crate::supervisor::{self, Supervisor};

/// Launch settings for phase 2
pub struct LaunchOptions {
    pub cloudflared_bin: String,
    pub origin_url: String,
    pub app_command: String,
}

/// What phase 2 needs to run the tunnel daemon.
struct Provisioned {
    tunnel_id: String,
    tunnel_token: String,
}

/// One process phase 2 will spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Launch {
    name: &'static str,
    program: String,
    args: Vec<String>,
}

pub async fn run(config: TunnelConfig, options: LaunchOptions) -> anyhow::Result<()> {
    println!("{}", "Starting Cloudflare Tunnel setup...".bold());
    tracing::info!("Token provided ({})", config.token_hint());

    let outcome = provision(&config).await;
    match &outcome {
        Ok(provisioned) => {
            tracing::info!(
                "Tunnel {} provisioned for {}",
                provisioned.tunnel_id,
                config.domain
            );
        }
        Err(e) => {
            tracing::error!("Tunnel setup failed: {}", e);
            println!(
                "{}",
                "Falling back to running the app without a tunnel...".yellow()
            );
        }
    }

    let mut supervisor = Supervisor::new();
    for launch in launch_plan(outcome, &options) {
        supervisor.spawn(launch.name, &launch.program, &launch.args);
    }
    supervisor.supervise().await
}

/// Decide what phase 2 spawns: the tunnel daemon plus the app on success,
/// the app alone when provisioning failed.
fn launch_plan(outcome: Result<Provisioned>, options: &LaunchOptions) -> Vec<Launch> {
    let mut launches = Vec::new();

    if let Ok(provisioned) = outcome {
        launches.push(Launch {
            name: "cloudflared",
            program: options.cloudflared_bin.clone(),
            args: vec![
                "tunnel".to_string(),
                "run".to_string(),
                "--token".to_string(),
                provisioned.tunnel_token,
                "--url".to_string(),
                options.origin_url.clone(),
            ],
        });
    }

    match supervisor::parse_command(&options.app_command) {
        Some((program, args)) => launches.push(Launch {
            name: "app",
            program,
            args,
        }),
        None => tracing::error!("App command is empty, nothing to start"),
    }

    launches
}

async fn provision(config: &TunnelConfig) -> Result<Provisioned> {
    let api = ApiClient::new(&config.api_token);

    preflight(&api).await;

    let account_id =
        resolve_account_id(&api, &config.domain, config.account_id.as_deref()).await?;
    tracing::info!("Using account id {}", account_id);

    // Zone lookup runs before tunnel creation so missing Zone permissions
    // surface early; failure here only skips DNS reconciliation.
    let zone_id = match resolve_zone_id(&api, &config.domain, &account_id).await {
        Ok(id) => {
            tracing::info!("Using zone id {}", id);
            Some(id)
        }
        Err(e) => {
            tracing::warn!("Zone lookup failed, DNS will not be reconciled: {}", e);
            None
        }
    };

    let tunnels = TunnelManager::new(&api, account_id);
    let created = tunnels.recreate(&config.tunnel_name).await?;

    if let Some(zone_id) = zone_id {
        DnsManager::new(&api, zone_id)
            .ensure_cname(&config.domain, &tunnel_cname(&created.id))
            .await?;
    }

    Ok(Provisioned {
        tunnel_id: created.id,
        tunnel_token: created.token,
    })
}

/// Best-effort token diagnostics; scoped tokens often cannot see /user.
async fn preflight(api: &ApiClient) {
    match api.get::<serde_json::Value>("/user/tokens/verify").await {
        Ok(v) => tracing::debug!("Token verification: {}", v),
        Err(e) => tracing::debug!("Token verification request failed: {}", e),
    }
    match api.get::<serde_json::Value>("/user").await {
        Ok(user) => tracing::debug!(
            "Authenticated as {}",
            user.get("email").and_then(|e| e.as_str()).unwrap_or("unknown")
        ),
        Err(_) => {
            tracing::debug!("Could not fetch /user details (token may be account/zone scoped)")
        }
    }
}
