use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use checkout_server::config::Config;
use checkout_server::handlers::AppState;
use checkout_server::partners::PartnerResolver;
use checkout_server::repository::{EventRepository, PgEventRepository};
use checkout_server::routes::create_routes;
use checkout_server::services::CheckoutService;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().expect("Invalid configuration");

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Successfully connected to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    tracing::info!("Migrations run successfully");

    let repository: Arc<dyn EventRepository> = Arc::new(PgEventRepository::new(pool));
    let partners =
        PartnerResolver::from_config(&config.partners).expect("Failed to build partner clients");
    tracing::info!(partners = ?partners.partner_ids(), "Partners configured");

    let checkout = Arc::new(CheckoutService::new(
        repository.clone(),
        partners,
        config.pricing,
    ));

    match checkout.unfinished_purchases().await {
        Ok(intents) if !intents.is_empty() => {
            for intent in &intents {
                tracing::warn!(
                    intent_id = %intent.id,
                    event_id = %intent.event_id,
                    partner_id = intent.partner_id,
                    status = %intent.status,
                    "Purchase needs reconciliation"
                );
            }
            tracing::warn!(count = intents.len(), "Unfinished purchases found at startup");
        }
        Ok(_) => {}
        Err(e) => tracing::error!(error = ?e, "Failed to list unfinished purchases"),
    }

    let app: Router = create_routes(AppState { repository, checkout }, &config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
