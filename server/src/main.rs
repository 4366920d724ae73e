use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use guestlist_server::config::{Config, StoreBackend};
use guestlist_server::routes::create_routes;
use guestlist_server::store::{GuestStore, InMemoryGuestStore, PgGuestStore};
use guestlist_server::ticket::TicketCodec;
use guestlist_server::utils::clock::SystemClock;
use guestlist_server::GuestRegistry;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "guestlist_server=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    let store: Arc<dyn GuestStore> = match config.store {
        StoreBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.database_url)
                .await
                .expect("Failed to connect to database");

            tracing::info!("Successfully connected to database");

            let store = PgGuestStore::new(pool);
            store.migrate().await.expect("Failed to run migrations");

            tracing::info!("Migrations run successfully");
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory guest store; guests are lost on restart");
            Arc::new(InMemoryGuestStore::new())
        }
    };

    let registry = GuestRegistry::new(
        store,
        TicketCodec::new(config.qr_render_url.clone()),
        Arc::new(SystemClock),
    );

    let app = create_routes(Arc::new(registry));

    let addr = config.socket_addr().expect("Invalid SERVER_HOST/SERVER_PORT");
    tracing::info!("🚀 Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
