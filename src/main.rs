use actix_web::{App, HttpServer, web};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod app;
mod model;
mod service;

use app::{AppError, AppState};
use model::Config;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present (ignore if missing)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let (config, state) = match Config::from_env()
        .map_err(AppError::from)
        .and_then(|config| AppState::new(&config).map(|state| (config, state)))
    {
        Ok(initialized) => initialized,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize application");
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    let bind_addr = config.bind_addr();
    let analyze_text = web::Data::from(state.analyze_text);
    let cors_origins = config.cors_origins.clone();

    tracing::info!(?config, "Starting statement contradictions server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(api::cors::cors(&cors_origins))
            .app_data(analyze_text.clone())
            .configure(api::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
