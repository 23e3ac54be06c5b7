use std::net::SocketAddr;

use serde::Deserialize;
use tracing::{info, warn};

use ride_server::config::CoreConfig;
use ride_server::domain::{Gender, User, UserId};
use ride_server::sweep;
use ride_server::web::{AppState, create_router};

/// A user record in the seed file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedUser {
    id: Option<UserId>,
    name: String,
    declared_gender: Option<Gender>,
}

#[tokio::main]
async fn main() {
    init_logging();

    let mut config = CoreConfig::default();
    config.cron_secret = std::env::var("CRON_SECRET").ok().filter(|s| !s.is_empty());
    if config.cron_secret.is_none() {
        warn!("CRON_SECRET not set; the cron completion endpoint is disabled");
    }

    let state = AppState::new(config);

    // Optionally pre-load user accounts from a JSON file.
    if let Ok(path) = std::env::var("RIDE_USERS_FILE") {
        match load_seed_users(&path) {
            Ok(users) => {
                let count = users.len();
                for user in users {
                    info!(id = %user.id, name = %user.name, "seeded user");
                    state.users.insert(user).await;
                }
                info!(count, path, "loaded seed users");
            }
            Err(err) => {
                eprintln!("Failed to load seed users from {path}: {err}");
                std::process::exit(1);
            }
        }
    }

    // Background auto-completion sweep.
    sweep::spawn(state.sweeper(), state.config.sweep_interval_secs);

    let app = create_router(state);

    let addr: SocketAddr = std::env::var("RIDE_LISTEN_ADDR")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));
    info!(%addr, "ride server listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listen address");
    axum::serve(listener, app).await.expect("server error");
}

fn load_seed_users(path: &str) -> Result<Vec<User>, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    let seeds: Vec<SeedUser> = serde_json::from_str(&raw)?;
    Ok(seeds
        .into_iter()
        .map(|s| User::new(s.id.unwrap_or_default(), s.name, s.declared_gender))
        .collect())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,ride_server=debug".into());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
