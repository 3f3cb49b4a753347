use axum::Router;
use chrono::Utc;
use dotenvy::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;

use venuebook_server::config::Config;
use venuebook_server::engine::ReservationEngine;
use venuebook_server::routes::create_routes;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    let engine = Arc::new(ReservationEngine::new(config.lock_wait));

    // Completion sweep: promotes confirmed bookings whose end time has
    // passed to completed and awards loyalty points.
    let sweeper = Arc::clone(&engine);
    let sweep_interval = config.sweep_interval;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        loop {
            ticker.tick().await;
            let completed = sweeper.sweep_elapsed(Utc::now()).await;
            if completed > 0 {
                tracing::info!(completed, "Completion sweep finished");
            }
        }
    });

    let app: Router = create_routes(engine);

    tracing::info!("🚀 Server running at http://{}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
