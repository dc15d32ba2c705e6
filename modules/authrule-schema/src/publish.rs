use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use async_trait::async_trait;
use dgraph_admin_client::DgraphAdminClient;

use crate::assembler::transform;
use crate::config::Config;

/// Destination for an assembled schema.
#[async_trait]
pub trait SchemaPublisher: Send + Sync {
    /// Drop all data and schema.
    async fn wipe(&self) -> Result<()>;

    async fn submit(&self, schema: Vec<u8>) -> Result<()>;
}

#[async_trait]
impl SchemaPublisher for DgraphAdminClient {
    async fn wipe(&self) -> Result<()> {
        self.drop_all().await.context("cannot wipe")
    }

    async fn submit(&self, schema: Vec<u8>) -> Result<()> {
        self.update_schema(schema)
            .await
            .context("cannot submit schema")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Schema built, nothing sent.
    DryRun,
    Published { wiped: bool },
}

/// Transform `input`, optionally echo it to `dump`, then publish unless the
/// config says dry. Nothing is written or sent if the transform fails.
pub async fn run<R, W>(
    config: &Config,
    input: R,
    mut dump: W,
    publisher: Option<&dyn SchemaPublisher>,
) -> Result<RunOutcome>
where
    R: BufRead,
    W: Write,
{
    let schema = transform(input, &config.authorization)
        .with_context(|| format!("failed to process {}", config.input_label()))?;

    if config.dump {
        dump.write_all(&schema)?;
        dump.flush()?;
    }

    if config.dry {
        tracing::info!("Dry run, not submitting");
        return Ok(RunOutcome::DryRun);
    }

    let publisher = publisher.context("no schema publisher configured")?;

    if config.wipe {
        publisher.wipe().await?;
    }
    publisher.submit(schema).await?;

    Ok(RunOutcome::Published { wiped: config.wipe })
}
