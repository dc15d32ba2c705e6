use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use crate::error::ConfigError;

#[derive(Debug, Parser)]
#[command(
    name = "authrule-schema",
    about = "Expand @opsmxAuthRule markers in a Dgraph GraphQL schema and upload it"
)]
pub struct Cli {
    /// Input filename, with '-' for stdin
    #[arg(long = "in", env = "SCHEMA_INPUT", default_value = "-")]
    pub input: PathBuf,

    /// Erase all data and schema before uploading
    #[arg(long)]
    pub wipe: bool,

    /// Authentication token for Dgraph
    #[arg(long, env = "DGRAPH_AUTH_TOKEN", default_value = "", hide_env_values = true)]
    pub authtoken: String,

    /// Dgraph authorization object appended to the schema
    #[arg(long, env = "DGRAPH_AUTHORIZATION")]
    pub dgraphauth: Option<String>,

    /// Base URL of the Dgraph endpoint
    #[arg(long, env = "DGRAPH_URL")]
    pub url: Option<String>,

    /// Also write the processed schema to stdout
    #[arg(long)]
    pub dump: bool,

    /// Don't submit anything, just process the input
    #[arg(long)]
    pub dry: bool,

    /// Per-request HTTP timeout in seconds
    #[arg(long, env = "DGRAPH_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

/// Validated run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// `None` reads stdin.
    pub input: Option<PathBuf>,
    pub url: Option<String>,
    pub auth_token: String,
    pub authorization: String,
    pub wipe: bool,
    pub dump: bool,
    pub dry: bool,
    pub timeout: Duration,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let url = cli.url.filter(|u| !u.is_empty());
        if url.is_none() && !cli.dry {
            return Err(ConfigError::MissingUrl);
        }

        let authorization = match cli.dgraphauth {
            Some(a) if !a.is_empty() => a,
            _ => return Err(ConfigError::MissingAuthorization),
        };

        let input = (cli.input.as_os_str() != "-").then_some(cli.input);

        Ok(Self {
            input,
            url,
            auth_token: cli.authtoken,
            authorization,
            wipe: cli.wipe,
            dump: cli.dump,
            dry: cli.dry,
            timeout: Duration::from_secs(cli.timeout_secs),
        })
    }

    pub fn input_label(&self) -> String {
        match &self.input {
            Some(path) => path.display().to_string(),
            None => "<stdin>".to_string(),
        }
    }

    pub fn open_input(&self) -> Result<Box<dyn BufRead>> {
        match &self.input {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Error opening file: {}", path.display()))?;
                Ok(Box::new(BufReader::new(file)))
            }
            None => Ok(Box::new(BufReader::new(io::stdin()))),
        }
    }

    pub fn log_redacted(&self) {
        fn preview(val: &str) -> String {
            if val.is_empty() {
                return "<not set>".to_string();
            }
            format!("<redacted>({} chars)", val.len())
        }

        tracing::info!("Config loaded:");
        tracing::info!("  input: {}", self.input_label());
        tracing::info!("  url: {}", self.url.as_deref().unwrap_or("<not set>"));
        tracing::info!("  authtoken: {}", preview(&self.auth_token));
        tracing::info!(
            wipe = self.wipe,
            dump = self.dump,
            dry = self.dry,
            timeout_secs = self.timeout.as_secs(),
            "  flags"
        );
    }
}
