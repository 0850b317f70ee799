use std::sync::Arc;
use tracing::{debug, info};
use structures::guild::{Guild, GuildPayload};
use structures::user::UserPayload;
use crate::cache::State;
use crate::client_user::ClientUser;
use crate::config::ClientConfig;
use crate::http::{Http, RestClient};
use crate::user::User;
use crate::Result;

/// The Discord Client
///
/// It owns the session: the HTTP transport and the caches every model reads from.
pub struct Client {
    state: Arc<State>,
}

impl Client {
    /// Create a new client talking to the API described by `config`
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = RestClient::new(config)?;
        debug!(target: "iris::client", "HTTP client ready for {}", config.api_url);
        Ok(Self::with_http(Arc::new(http)))
    }

    /// Create a client using another transport
    pub fn with_http(http: Arc<dyn Http>) -> Self {
        Self { state: Arc::new(State::new(http)) }
    }

    pub fn state(&self) -> &Arc<State> {
        &self.state
    }

    /// Fetches the logged-in account
    pub async fn current_user(&self) -> Result<ClientUser> {
        let payload = self.state.http().get_current_user().await?;
        info!(target: "iris::client", "Logged in as {}#{}", payload.user.username, payload.user.discriminator);
        Ok(ClientUser::new(self.state.clone(), &payload))
    }

    /// Registers a user in the session cache, see [`State::store_user`]
    pub fn store_user(&self, payload: &UserPayload) -> User {
        self.state.store_user(payload)
    }

    pub fn add_guild(&self, payload: &GuildPayload) -> Arc<Guild> {
        self.state.add_guild(payload)
    }

    /// Ends the session, emptying every cache
    ///
    /// Models still alive keep working, but won't find anything in the cache anymore.
    pub fn close(&self) {
        info!(target: "iris::client", "Closing the client");
        self.state.clear();
    }
}
