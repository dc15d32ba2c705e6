use serde::{Deserialize, Serialize};

/// Body for `POST /alter`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DropMessage {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub drop_all: bool,
}

impl DropMessage {
    pub fn drop_all() -> Self {
        Self { drop_all: true }
    }
}

/// Response of `POST /admin/schema`. Dgraph reports schema problems in
/// `errors` even when the HTTP status is 200.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaResult {
    #[serde(default)]
    pub errors: Vec<SchemaResultError>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaResultError {
    #[serde(default)]
    pub message: String,
}

impl SchemaResult {
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }
}
