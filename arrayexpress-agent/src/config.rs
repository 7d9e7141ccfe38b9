use std::fs;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use url::Url;

use crate::{agent::Settings, backfill::DEFAULT_PAGE_SIZE, processor::AccessionGenerator};

const DEFAULT_DB_NAME: &str = "arrayexpress_agent";

fn default_accession_prefix() -> String {
    AccessionGenerator::DEFAULT_PREFIX.to_string()
}

fn default_backfill_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

#[derive(Args, serde::Deserialize, Clone)]
pub struct Config {
    #[arg(long)]
    #[serde(default)]
    secrets_dir: Option<Utf8PathBuf>,
    #[arg(long, env = "ARRAYEXPRESS_AGENT_DB_USER", default_value_t)]
    db_user: String,
    #[arg(long, env = "ARRAYEXPRESS_AGENT_DB_PASSWORD", default_value_t)]
    db_password: String,
    #[arg(long, env = "ARRAYEXPRESS_AGENT_DB_HOST", default_value_t = String::from("localhost"))]
    db_host: String,
    #[arg(long, env = "ARRAYEXPRESS_AGENT_DB_PORT", default_value_t = 27017)]
    db_port: u16,
    #[arg(long, env = "ARRAYEXPRESS_AGENT_DB_NAME", default_value_t = String::from(DEFAULT_DB_NAME))]
    db_name: String,
    #[arg(long, env = "ARRAYEXPRESS_AGENT_HOST", default_value_t = String::from("localhost"))]
    host: String,
    #[arg(long, env = "ARRAYEXPRESS_AGENT_PORT", default_value_t = 8000)]
    port: u16,
    /// Where agent results are POSTed. Results are only logged when unset.
    #[arg(long, env = "ARRAYEXPRESS_AGENT_RESULTS_URL")]
    #[serde(default)]
    results_url: Option<Url>,
    #[arg(long, env = "ARRAYEXPRESS_AGENT_ACCESSION_PREFIX", default_value_t = default_accession_prefix())]
    #[serde(default = "default_accession_prefix")]
    accession_prefix: String,
    #[arg(long, env = "ARRAYEXPRESS_AGENT_BACKFILL_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    #[serde(default = "default_backfill_page_size")]
    backfill_page_size: u64,
}

impl Config {
    /// # Errors
    pub fn read_secrets(&mut self) -> anyhow::Result<()> {
        let Self {
            secrets_dir,
            db_user,
            db_password,
            ..
        } = self;

        let Some(secrets_dir) = secrets_dir else {
            return Ok(());
        };

        let read_secret = |name: &str| {
            fs::read_to_string(secrets_dir.join(name))
                .map(|s| s.trim().to_string())
                .context(format!("failed to read secret {name}"))
        };

        *db_user = read_secret("db_user")?;
        *db_password = read_secret("db_password")?;

        Ok(())
    }

    #[must_use]
    pub fn app_address(&self) -> String {
        let Self { host, port, .. } = self;

        format!("{host}:{port}")
    }

    #[must_use]
    pub fn db_url(&self) -> String {
        let Self {
            db_user,
            db_password,
            db_host,
            db_port,
            ..
        } = self;

        let base = "mongodb://";
        let db_spec = format!("{db_host}:{db_port}");

        if db_user.is_empty() {
            format!("{base}{db_spec}")
        } else {
            format!("{base}{db_user}:{db_password}@{db_spec}")
        }
    }

    #[must_use]
    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    #[must_use]
    pub fn results_url(&self) -> Option<&Url> {
        self.results_url.as_ref()
    }

    #[must_use]
    pub fn backfill_page_size(&self) -> u64 {
        self.backfill_page_size
    }

    #[must_use]
    pub fn agent_settings(&self) -> Settings {
        Settings {
            accession_prefix: self.accession_prefix.clone(),
            backfill_page_size: self.backfill_page_size,
        }
    }
}

#[derive(Parser)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve against a throwaway MongoDB container, logging results instead of sending them.
    Dev {
        #[arg(long, default_value_t = String::from("localhost"))]
        host: String,
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },
    Prod {
        #[command(flatten)]
        config: Config,
        #[arg(long, env = "ARRAYEXPRESS_AGENT_LOG_DIR")]
        log_dir: Utf8PathBuf,
    },
    /// Report stored studies whose relationships were never written.
    Scan {
        #[command(flatten)]
        config: Config,
    },
}
