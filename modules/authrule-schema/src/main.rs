use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use authrule_schema::{run, Cli, Config, RunOutcome, SchemaPublisher};
use dgraph_admin_client::DgraphAdminClient;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so --dump output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_cli(Cli::parse())?;
    config.log_redacted();

    let client = match &config.url {
        Some(url) if !config.dry => Some(DgraphAdminClient::with_timeout(
            url,
            &config.auth_token,
            config.timeout,
        )?),
        _ => None,
    };

    let input = config.open_input()?;
    let outcome = run(
        &config,
        input,
        std::io::stdout().lock(),
        client.as_ref().map(|c| c as &dyn SchemaPublisher),
    )
    .await?;

    match outcome {
        RunOutcome::DryRun => tracing::info!("Schema processed (dry run)"),
        RunOutcome::Published { wiped } => tracing::info!(wiped, "Schema published"),
    }

    Ok(())
}
