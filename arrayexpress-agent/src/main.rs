use arrayexpress_agent::{
    config::{Cli, Command},
    scan_studies, serve_dev_app, serve_prod_app,
};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().unwrap_or_default();
    let Cli { command } = Cli::parse();

    match command {
        Command::Dev { host, port } => serve_dev_app(host, port).await?,
        Command::Prod { config, log_dir } => serve_prod_app(config, Some(log_dir)).await?,
        Command::Scan { config } => {
            let incomplete = scan_studies(config).await?;
            println!("{}", serde_json::to_string_pretty(&incomplete)?);
        }
    }

    Ok(())
}
