mod auth;
mod error;
mod handlers;
mod models;
mod router;
mod state;

use ledger::{Ledger, LedgerConfig, RegisterRequest};
use router::create_router;
use state::AppState;
use std::net::SocketAddr;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    tracing::info!("Starting ledger gateway service");

    let db_path = std::env::var("LEDGER_DB").unwrap_or_else(|_| "database.json".to_string());
    let port: u16 = std::env::var("LEDGER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let ledger = Ledger::open(&db_path, LedgerConfig::default());

    // Seed the admin account on first run; admin is an ordinary
    // account with a privileged role.
    let admin_email =
        std::env::var("LEDGER_ADMIN_EMAIL").unwrap_or_else(|_| "admin@bank.com".to_string());
    let admin_pin = std::env::var("LEDGER_ADMIN_PIN").unwrap_or_else(|_| "9999".to_string());
    if ledger.ensure_admin(RegisterRequest {
        name: "Admin".to_string(),
        age: 30,
        email: admin_email.clone(),
        credential: admin_pin,
    })? {
        tracing::info!(email = %admin_email, "admin account seeded");
    }

    let state = AppState::new(ledger);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
