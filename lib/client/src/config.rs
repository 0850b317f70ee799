//! Client configuration.

use std::path::Path;
use figment::providers::{Env, Format as _, Toml};
use figment::Figment;
use serde::Deserialize;

/// Settings needed to reach the API
#[derive(Deserialize, Debug, Clone)]
pub struct ClientConfig {
    /// The token of the account
    pub token: String,
    /// Whether `token` belongs to a bot account.
    ///
    /// User tokens are sent as-is, bot tokens are prefixed with `Bot`.
    #[serde(default = "bot_default")]
    pub bot: bool,
    /// Base URL of the REST API
    #[serde(default = "api_url_default")]
    pub api_url: String,
    #[serde(default = "user_agent_default")]
    pub user_agent: String,
}

fn bot_default() -> bool {
    true
}

fn api_url_default() -> String {
    crate::API_URL.to_string()
}

fn user_agent_default() -> String {
    format!("{} ({})", crate::LIB_NAME, env!("CARGO_PKG_VERSION"))
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            bot: bot_default(),
            api_url: api_url_default(),
            user_agent: user_agent_default(),
        }
    }

    /// Loads a config from a TOML file, overridden by `IRIS_` environment variables
    pub fn load(config_path: impl AsRef<Path>) -> Result<ClientConfig, figment::Error> {
        Figment::new()
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("IRIS_"))
            .extract()
    }
}
