//! Delivery worker binary.
//!
//! Hosts the two background services of the notification subsystem: the
//! push delivery worker (staged-request processing) and the retention
//! sweeper (pruning of old processed requests).

use std::sync::Arc;

use anyhow::Context;
use pawsome_notify::store::pg::PgStores;
use pawsome_notify::{DeliveryJob, DeliveryWorker, HttpPushClient, NotifyBus, RetentionSweeper};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pawsome_worker=debug,pawsome_notify=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let push_url = std::env::var("PUSH_API_URL").context("PUSH_API_URL must be set")?;
    let push_key = std::env::var("PUSH_API_KEY").context("PUSH_API_KEY must be set")?;

    let pool = pawsome_db::connect(&database_url)
        .await
        .context("Failed to connect to database")?;
    pawsome_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    pawsome_db::migrate(&pool)
        .await
        .context("Failed to apply migrations")?;

    let stores = Arc::new(PgStores::new(pool));
    let provider = Arc::new(HttpPushClient::new(push_url, push_key));
    let bus = Arc::new(NotifyBus::default());

    let job = Arc::new(DeliveryJob::new(
        stores.clone(),
        stores.clone(),
        stores.clone(),
        provider,
        bus,
    ));
    let worker = DeliveryWorker::new(job, stores.clone());
    let sweeper = RetentionSweeper::new(stores);

    let cancel = CancellationToken::new();
    let worker_task = tokio::spawn(worker.run(cancel.child_token()));
    let sweeper_task = tokio::spawn(sweeper.run(cancel.child_token()));

    tracing::info!("Delivery worker started");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    tracing::info!("Shutting down");
    cancel.cancel();

    let _ = worker_task.await;
    let _ = sweeper_task.await;
    Ok(())
}
