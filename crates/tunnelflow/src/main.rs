mod provision;
mod supervisor;

use clap::Parser;
use colored::Colorize;
use tunnelflow_cloudflare::TunnelConfig;

#[derive(Parser)]
#[command(name = "tunnelflow")]
#[command(version)]
#[command(
    about = "Provision a Cloudflare Tunnel and run the trail-log dev environment behind it",
    long_about = None
)]
struct Cli {
    /// Local origin URL the tunnel forwards to
    #[arg(
        long,
        env = "TUNNEL_ORIGIN_URL",
        default_value = "http://localhost:5173"
    )]
    origin_url: String,

    /// Path to the cloudflared binary
    #[arg(
        long,
        env = "CLOUDFLARED_BIN",
        default_value = "/usr/local/bin/cloudflared"
    )]
    cloudflared_bin: String,

    /// Command that starts the application dev server
    #[arg(
        long,
        env = "APP_COMMAND",
        default_value = "npm run dev -- --host 0.0.0.0"
    )]
    app_command: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Missing required configuration is the only error that aborts before
    // phase 2; everything later degrades to running the app alone.
    let config = match TunnelConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    let options = provision::LaunchOptions {
        cloudflared_bin: cli.cloudflared_bin,
        origin_url: cli.origin_url,
        app_command: cli.app_command,
    };

    provision::run(config, options).await
}
