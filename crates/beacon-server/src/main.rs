//! Beacon — landing-page chat relay and static host.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use beacon_core::config::CHAT_PATH;
use beacon_core::BeaconConfig;
use beacon_relay::{RelayOutcome, SinkDelivery};
use beacon_server::{build_router, commands, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    // Handle CLI subcommands
    if args.len() > 1 {
        match args[1].as_str() {
            "chat" => {
                if args.len() < 3 {
                    eprintln!("Usage: beacon chat <message>");
                    std::process::exit(1);
                }
                let config = BeaconConfig::from_env();
                let outcome = commands::chat(&config, &args[2..].join(" ")).await?;
                println!("{}", outcome.text());
                std::process::exit(if outcome == RelayOutcome::Unreachable { 1 } else { 0 });
            }
            "track" => {
                let action = args.get(2).map(String::as_str).unwrap_or("Visit");
                let config = BeaconConfig::from_env();
                match commands::track(&config, action).await? {
                    Some(SinkDelivery::Confirmed) => println!("Record '{}' stored", action),
                    Some(SinkDelivery::Attempted) => {
                        println!("Record '{}' sent, unverified", action)
                    }
                    Some(SinkDelivery::Lost) => {
                        eprintln!("Record '{}' could not be delivered", action);
                        std::process::exit(1);
                    }
                    None => {
                        eprintln!("GOOGLE_SCRIPT_URL is not set");
                        std::process::exit(1);
                    }
                }
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("Beacon — landing-page chat relay");
                println!();
                println!("Usage: beacon [command]");
                println!();
                println!("Commands:");
                println!("  (none)               Start the server");
                println!("  chat <message>       Send one chat message through the relay chain");
                println!("  track [action]       Post a telemetry record to the sink");
                println!();
                println!("Environment:");
                println!("  PORT                 Listen port (default 3000)");
                println!("  N8N_WEBHOOK_URL      Webhook that {} is forwarded to", CHAT_PATH);
                println!("  ALLOWED_ORIGIN       Allowed CORS origin (default *)");
                println!("  STATIC_DIR           Front-end root (default public)");
                println!("  GOOGLE_SCRIPT_URL    Spreadsheet sink (unset disables telemetry)");
                println!(
                    "  RELAY_PRIMARY_URL    First relay endpoint (default this server's {})",
                    CHAT_PATH
                );
                println!("  RELAY_TIMEOUT_SECS   Outbound request timeout (default 30)");
                return Ok(());
            }
            other => {
                eprintln!("Unknown command: {}. Use 'beacon help' for usage.", other);
                std::process::exit(1);
            }
        }
    }

    let config = BeaconConfig::from_env();
    let port = config.port;
    let webhook_url = config.webhook_url.clone();
    let allowed_origin = config.allowed_origin.clone();
    info!("Static root: {}", config.static_dir.display());
    match &config.sheets_url {
        Some(url) => info!("Telemetry sink: {}", url),
        None => info!("Telemetry sink disabled"),
    }

    let state = Arc::new(AppState::new(config)?);
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Proxy listening on {}", addr);
    info!("Forwarding {} -> {}", CHAT_PATH, webhook_url);
    info!("CORS allowed origin: {}", allowed_origin);

    axum::serve(listener, app).await?;

    Ok(())
}
