//! OAuth client configuration, as downloaded from the Google Cloud console.

use std::path::Path;

use mw_fs::io;
use serde::Deserialize;

use crate::error::{Error, Result};

pub const GOOGLE_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
pub const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Endpoints and identity of the OAuth client an account authorizes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    GOOGLE_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URI.to_string()
}

/// The console wraps the client under the application type.
#[derive(Deserialize)]
struct ClientSecretsFile {
    installed: Option<ClientConfig>,
    web: Option<ClientConfig>,
}

impl ClientConfig {
    /// Parse a client secrets file (`{"installed": {...}}` or `{"web": {...}}`).
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let invalid = |message: String| Error::InvalidClientConfig {
            path: path.to_path_buf(),
            message,
        };

        let file: ClientSecretsFile =
            serde_json::from_str(content).map_err(|e| invalid(e.to_string()))?;
        let client = file
            .installed
            .or(file.web)
            .ok_or_else(|| invalid("expected an \"installed\" or \"web\" client".to_string()))?;

        if client.client_id.is_empty() {
            return Err(invalid("client_id is empty".to_string()));
        }
        Ok(client)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = io::read_text(path)?;
        Self::parse(&content, path)
    }
}
