mod settings;
mod status;
mod telegram;

use roastify_app::config::AppConfig;
use roastify_app::infrastructure::db::{create_connection, run_migrations};
use roastify_app::infrastructure::store::{MemoryStore, PgStore, RoastStore};
use roastify_app::AppContext;
use settings::Settings;
use std::sync::Arc;
use std::time::Duration;
use teloxide::Bot;

const SWEEP_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let settings = Settings::from_env();
    let config = AppConfig::from_env();

    let store: Arc<dyn RoastStore> = match &settings.database_url {
        Some(url) => {
            let db = create_connection(url)
                .await
                .expect("Failed to connect to database");
            run_migrations(&db).await.expect("Failed to run migrations");
            tracing::info!("Using PostgreSQL store");
            Arc::new(PgStore::new(db))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, keeping state in memory");
            Arc::new(MemoryStore::new())
        }
    };

    let ctx = AppContext::with_render_service(config, store);
    match ctx.roasts.restore_cooldowns(chrono::Utc::now()).await {
        Ok(restored) => tracing::info!("Restored {} cooldowns", restored),
        Err(e) => tracing::warn!("Could not restore cooldowns: {}", e),
    }

    let listener = tokio::net::TcpListener::bind(settings.status_addr)
        .await
        .expect("Failed to bind status address");
    tracing::info!("Status server listening on http://{}", settings.status_addr);
    let status_app = status::router(ctx.clone());
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, status_app).await {
            tracing::error!("Status server error: {}", e);
        }
    });

    let sweeper = ctx.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            let dropped = sweeper.sweep(chrono::Utc::now());
            tracing::debug!("Sweep dropped {} idle entries", dropped);
        }
    });

    tracing::info!(
        "Cooldown {}s, daily limit {}, vote window {:?}",
        ctx.config.cooldown.window.as_secs(),
        ctx.config.cooldown.daily_limit,
        ctx.config.votes.window.map(|w| w.num_seconds())
    );

    telegram::run(Bot::new(settings.bot_token), ctx).await;
}
