use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tropa_api::{BookingApiClient, BookingService};
use tropa_store::{FileSessionStore, Session, SessionStore};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tropa_api=debug,tropa_store=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = tropa_store::Config::load().context("Failed to load config")?;
    tracing::info!("Booking client for {}", config.api.base_url);

    let store = FileSessionStore::new(&config.session.storage_path);
    let session = match store.load().await? {
        Some(session) => session,
        None => Session::visitor(),
    };

    let excursion_id: Uuid = std::env::args()
        .nth(1)
        .context("Usage: tropa-api <excursion-id>")?
        .parse()
        .context("Excursion id must be a UUID")?;

    let client = BookingApiClient::from_config(&config.api)?.with_session(&session);
    let mut service = BookingService::new(client, session, config.booking_rules.clone());

    let excursion = service.load(excursion_id).await?;
    println!("{} ({})", excursion.title, excursion.city);

    for date in service.selectable_dates() {
        for category in service.categories_for(date) {
            let available = service.max_quantity(date, &category);
            println!("  {} / {}: {} tickets", date, category, available);
        }
    }

    Ok(())
}
