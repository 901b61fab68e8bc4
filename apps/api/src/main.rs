use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use course_review_api::api::{router, AppState, AuthSettings};
use course_review_api::config::Config;
use course_review_api::domain::notifications::Mailer;
use course_review_api::infrastructure::mail::{HttpMailer, LogMailer};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = Config::from_env().expect("Invalid configuration");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    tracing::info!("Database connected successfully");

    let mailer: Arc<dyn Mailer> = match &config.mailer_url {
        Some(url) => {
            tracing::info!(mailer_url = %url, "Delivering mail over HTTP");
            Arc::new(HttpMailer::new(url.clone()).expect("Failed to build mail client"))
        }
        None => {
            tracing::warn!("MAILER_URL not set, verification emails will only be logged");
            Arc::new(LogMailer)
        }
    };

    let auth = AuthSettings {
        jwt_secret: config.jwt_secret.clone(),
        public_base_url: config.public_base_url.clone(),
    };

    let app = router(AppState::postgres(pool, mailer, auth));

    // Start server
    let addr = config.bind_addr();
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
