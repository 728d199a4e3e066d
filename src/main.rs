// src/main.rs
use actix_web::{App, HttpServer, middleware, web};
use anyhow::Context;
use archviz::config::AppConfig;
use archviz::services::GeminiClient;
use archviz::{AppState, handlers};
use log::info;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting archviz service...");

    let config = AppConfig::from_env().context("Invalid configuration")?;
    let backend = Arc::new(GeminiClient::new(&config)?);
    let app_state = AppState::new(backend, &config);

    info!(
        "Using image model {} and text model {}",
        config.image_model, config.text_model
    );
    info!("Starting HTTP server on {}", config.bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().limit(32 * 1024 * 1024))
            .wrap(middleware::Logger::default())
            .configure(handlers::configure)
    })
    .bind(&config.bind_addr)
    .with_context(|| format!("Failed to bind {}", config.bind_addr))?
    .run()
    .await?;

    Ok(())
}
