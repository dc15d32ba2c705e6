pub mod error;
pub mod types;

pub use error::{DgraphError, Result};
pub use types::{DropMessage, SchemaResult, SchemaResultError};

use std::time::Duration;

/// Header Dgraph checks against its `--security token` setting.
pub const AUTH_HEADER: &str = "X-Dgraph-AuthToken";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct DgraphAdminClient {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl DgraphAdminClient {
    /// An empty `auth_token` sends no auth header at all.
    pub fn new(base_url: &str, auth_token: &str) -> Result<Self> {
        Self::with_timeout(base_url, auth_token, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, auth_token: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: (!auth_token.is_empty()).then(|| auth_token.to_string()),
        })
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let req = self.client.post(url);
        match &self.auth_token {
            Some(token) => req.header(AUTH_HEADER, token),
            None => req,
        }
    }

    /// Erase all data and schema. Destructive; never retried.
    pub async fn drop_all(&self) -> Result<()> {
        tracing::info!(url = %self.base_url, "Wiping existing schema and data");

        let resp = self.post("/alter").json(&DropMessage::drop_all()).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DgraphError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        tracing::info!("Wipe done");
        Ok(())
    }

    /// Upload a GraphQL schema. Fails on a non-success status and on any
    /// error reported in the response body.
    pub async fn update_schema(&self, schema: Vec<u8>) -> Result<()> {
        tracing::info!(url = %self.base_url, bytes = schema.len(), "Submitting schema");

        let resp = self.post("/admin/schema").body(schema).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DgraphError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.bytes().await?;
        let result: SchemaResult = serde_json::from_slice(&body)?;
        if !result.errors.is_empty() {
            for message in result.messages() {
                tracing::error!(%message, "Dgraph rejected schema");
            }
            return Err(DgraphError::SchemaRejected(result.messages()));
        }

        tracing::info!("Schema submitted");
        Ok(())
    }
}
