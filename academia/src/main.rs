use std::sync::Arc;

use academia::{
    config::{BackendKind, Config},
    http::{AppState, router},
    repository::Repository,
    seed,
};
use academia_store::{backend::StoreBackendBuilder, store::DocumentStore};
use academia_store_memory::InMemoryStore;
use academia_store_mongodb::MongoDbStore;
use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    setup_logging(&config);

    let repository = Arc::new(Repository::new(open_store(&config).await?));
    repository
        .ensure_indexes()
        .await
        .context("failed to create the unique index on estudiantes.correo")?;

    if let Some(path) = config.seed_path().cloned() {
        let repository = Arc::clone(&repository);
        tokio::spawn(async move {
            if let Err(err) = seed::load_file(&repository, &path).await {
                tracing::error!("Error al leer el archivo JSON: {err}");
            }
        });
    }

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(backend = ?config.backend, "Servidor ejecutándose en http://{addr}");

    axum::serve(listener, router(AppState::new(Arc::clone(&repository))))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    match Arc::try_unwrap(repository) {
        Ok(repository) => repository
            .into_store()
            .shutdown()
            .await
            .context("failed to shut down the store")?,
        Err(_) => tracing::warn!("store still in use at shutdown, skipping close"),
    }

    Ok(())
}

async fn open_store(config: &Config) -> anyhow::Result<DocumentStore> {
    Ok(match config.backend {
        BackendKind::Memory => DocumentStore::from_backend(InMemoryStore::builder().build().await?),
        BackendKind::Mongodb => DocumentStore::from_backend(
            MongoDbStore::builder(&config.mongo_uri, &config.database)
                .build()
                .await
                .with_context(|| format!("failed to connect to {}", config.mongo_uri))?,
        ),
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "could not listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

fn setup_logging(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = config.log_filter();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_names(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
