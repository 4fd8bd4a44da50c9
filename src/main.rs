use anyhow::{anyhow, Context};
use carelink_client::handlers::guard;
use carelink_client::handlers::session::SessionState;
use carelink_client::storage::FileStorage;
use carelink_client::{ApiClient, EntityCache, NotificationStore, SessionStore};
use dotenvy::dotenv;
use log::{info, warn};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    info!("=== CareLink client demo starting ===");

    let base_url =
        env::var("CARELINK_API_URL").unwrap_or_else(|_| "http://localhost:5000/api".to_string());
    let session_file = env::var("CARELINK_SESSION_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(".carelink-session.json"));

    let notifications = NotificationStore::new();
    let storage = Arc::new(FileStorage::new(session_file).context("opening session storage")?);
    let session = SessionStore::new(storage, notifications.clone());
    info!("Using CareLink API at {}", base_url);
    let api = ApiClient::new(base_url, session.clone(), notifications.clone())?;

    session.hydrate()?;

    if matches!(session.state(), SessionState::Anonymous) {
        let email = env::var("CARELINK_DEMO_EMAIL")
            .map_err(|_| anyhow!("CARELINK_DEMO_EMAIL must be set when no session is stored"))?;
        let password = env::var("CARELINK_DEMO_PASSWORD")
            .map_err(|_| anyhow!("CARELINK_DEMO_PASSWORD must be set when no session is stored"))?;

        info!("No stored session, logging in as {}", email);
        api.login(&email, &password).await?;
    }

    let identity = session
        .current()
        .ok_or_else(|| anyhow!("No active session after login"))?;
    info!("Acting as {} ({})", identity.name, identity.role);

    match guard::evaluate_path(&session.state(), "/appointments") {
        guard::RouteOutcome::Allowed => {
            let cache = EntityCache::new();
            let appointments = api.list_appointments(&cache).await?;
            println!("{} appointment(s):", appointments.len());
            for appointment in appointments {
                println!(
                    "  {}  {}  {} with {}  [{}]",
                    appointment.date,
                    appointment.time_slot,
                    appointment.patient_name,
                    appointment.doctor_name,
                    appointment.status
                );
            }
        }
        outcome => warn!("Appointments screen not available: {:?}", outcome),
    }

    println!("\nNotification feed for {}:", identity.role);
    for notice in notifications.visible(Some(identity.role)) {
        println!("  [{}] {}: {}", notice.kind, notice.title, notice.message);
    }

    Ok(())
}
