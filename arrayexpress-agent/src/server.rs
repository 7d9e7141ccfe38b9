use std::sync::Arc;

use anyhow::Context;
use axum::{Router, routing::get};
use camino::Utf8PathBuf;
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use util::DevContainer;

use crate::{
    agent::{Agent, Settings},
    config::Config,
    publish::{Publisher, ResultsPublisher},
    store::{MongoStore, Store},
};

mod api;
pub mod util;

/// # Errors
pub async fn serve(mut config: Config, log_dir: Option<Utf8PathBuf>) -> anyhow::Result<()> {
    initialize_logging(log_dir);

    config
        .read_secrets()
        .context("failed to read secrets directory")?;

    let store = connect_store(&config.db_url(), config.db_name()).await?;
    let publisher = ResultsPublisher::new(config.results_url().cloned());
    let agent = Agent::new(store, publisher, config.agent_settings());
    tracing::info!("initialized agent");

    run(agent, &config.app_address()).await
}

/// # Errors
pub async fn serve_dev(host: String, port: u16) -> anyhow::Result<()> {
    initialize_logging(None);

    let container = DevContainer::new("arrayexpress-agent_dev")
        .await
        .context("failed to start mongo container instance")?;

    let store = connect_store(&container.db_url().await?, "arrayexpress_agent").await?;
    let agent = Agent::new(store, ResultsPublisher::new(None), Settings::default());
    tracing::info!("initialized dev agent");

    let result = run(agent, &format!("{host}:{port}")).await;
    drop(container);

    result
}

/// # Errors
pub async fn connect_store(db_url: &str, db_name: &str) -> anyhow::Result<MongoStore> {
    let store = MongoStore::connect(db_url, db_name)
        .await
        .context("failed to connect to database")?;

    store
        .ensure_indexes()
        .await
        .context("failed to create database indexes")?;
    tracing::info!("ensured database indexes");

    Ok(store)
}

async fn run<S: Store, P: Publisher>(agent: Agent<S, P>, app_addr: &str) -> anyhow::Result<()> {
    let app = app(Arc::new(agent));

    let listener = TcpListener::bind(app_addr)
        .await
        .context(format!("failed to listen on {app_addr}"))?;
    tracing::info!("arrayexpress-agent listening on {app_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("failed to serve app")?;

    Ok(())
}

pub(crate) fn initialize_logging(log_dir: Option<Utf8PathBuf>) {
    use tracing::Level;
    use tracing_subscriber::{filter::Targets, prelude::*};

    let log_layer = tracing_subscriber::fmt::layer();

    match log_dir {
        None => {
            let dev_test_log_filter = Targets::new()
                .with_target("arrayexpress_agent", Level::DEBUG)
                .with_target("tower_http", Level::TRACE);
            let log_layer = log_layer.pretty().with_filter(dev_test_log_filter);

            tracing_subscriber::registry().with(log_layer).init();
        }
        Some(path) => {
            let log_writer = tracing_appender::rolling::daily(path, "arrayexpress-agent.log");
            let prod_log_filter = Targets::new()
                .with_target("arrayexpress_agent", Level::INFO)
                .with_target("tower_http", Level::INFO);
            let log_layer = log_layer
                .json()
                .with_writer(log_writer)
                .with_filter(prod_log_filter);

            tracing_subscriber::registry().with(log_layer).init();
        }
    }
}

fn app<S: Store, P: Publisher>(agent: Arc<Agent<S, P>>) -> Router {
    api::router()
        .layer(TraceLayer::new_for_http())
        .route("/health", get(async || ()))
        .with_state(agent)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
