use camino::Utf8PathBuf;
use config::Config;
use reconcile::IncompleteStudy;

pub mod agent;
pub mod backfill;
pub mod config;
pub mod model;
pub mod processor;
pub mod publish;
pub mod reconcile;
pub mod server;
pub mod store;

#[cfg(test)]
mod test_util;

/// # Errors
pub async fn serve_dev_app(host: String, port: u16) -> anyhow::Result<()> {
    server::serve_dev(host, port).await
}

/// # Errors
pub async fn serve_prod_app(config: Config, log_dir: Option<Utf8PathBuf>) -> anyhow::Result<()> {
    server::serve(config, log_dir).await
}

/// # Errors
pub async fn scan_studies(mut config: Config) -> anyhow::Result<Vec<IncompleteStudy>> {
    server::initialize_logging(None);
    config.read_secrets()?;

    let store = server::connect_store(&config.db_url(), config.db_name()).await?;

    Ok(reconcile::find_incomplete_studies(&store, config.backfill_page_size()).await?)
}
