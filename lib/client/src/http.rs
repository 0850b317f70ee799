use std::sync::{PoisonError, RwLock};
use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::{Method, Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
#[cfg(feature = "verbose")]
use tracing::trace;
use structures::channel::{ChannelPayload, StartGroupPayload, StartPrivateMessagePayload};
use structures::flags::HypeSquadHouse;
use structures::message::Message;
use structures::profile::ProfilePayload;
use structures::relationship::RelationshipType;
use structures::settings::SettingsEdit;
use structures::snowflake::Snowflake;
use structures::user::{ClientUserPayload, EditProfilePayload, EditProfileResponse, UserPayload};
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};

/// Helper to build urls
macro_rules! url {
    ($base:expr, $($arg:tt)*) => {{
        let formatted = format!($($arg)*);
        format!("{}/{}", $base.trim_end_matches('/'), formatted.trim_start_matches('/'))
    }};
}
pub(crate) use url;

/// The remote calls the models rely on
///
/// [`RestClient`] talks to the real API. Anything else implementing this trait can stand in for it.
#[async_trait]
pub trait Http: Send + Sync {
    async fn get_current_user(&self) -> Result<ClientUserPayload>;

    async fn edit_profile(&self, payload: &EditProfilePayload) -> Result<EditProfileResponse>;

    /// Returns the whole settings document after the edit
    async fn edit_settings(&self, settings: &SettingsEdit) -> Result<serde_json::Value>;

    async fn start_group(&self, user_id: Snowflake, recipients: Vec<String>) -> Result<ChannelPayload>;

    async fn start_private_message(&self, user_id: Snowflake) -> Result<ChannelPayload>;

    async fn get_mutual_friends(&self, user_id: Snowflake) -> Result<Vec<UserPayload>>;

    async fn get_user_profile(&self, user_id: Snowflake) -> Result<ProfilePayload>;

    /// Without a `kind`, the relationship is a friend request or its acceptance
    async fn add_relationship(&self, user_id: Snowflake, kind: Option<RelationshipType>) -> Result<()>;

    async fn remove_relationship(&self, user_id: Snowflake) -> Result<()>;

    async fn send_friend_request(&self, username: &str, discriminator: &str) -> Result<()>;

    async fn change_hypesquad_house(&self, house: HypeSquadHouse) -> Result<()>;

    async fn leave_hypesquad_house(&self) -> Result<()>;

    async fn send_message(&self, channel_id: Snowflake, content: &str) -> Result<Message>;

    /// Replaces the token sent with every following request
    fn set_token(&self, token: String, bot: bool) -> Result<()>;
}

/// This structure contains the HTTP client
pub struct RestClient {
    pub(crate) client: reqwest::Client,
    api_url: String,
    user_agent: HeaderValue,
    /// The full `Authorization` header, swapped whenever the token rotates
    authorization: RwLock<HeaderValue>,
}

impl RestClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder().use_rustls_tls().build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            user_agent: HeaderValue::from_str(&config.user_agent)?,
            authorization: RwLock::new(authorization_header(&config.token, config.bot)?),
        })
    }

    pub(crate) fn authorization(&self) -> HeaderValue {
        self.authorization
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn request(&self, method: Method, url: String) -> HttpRequestBuilder {
        #[cfg(feature = "verbose")]
        trace!(target: "iris::http", "{method} {url}");

        HttpRequestBuilder::new(self.client.request(method, url).header(USER_AGENT, self.user_agent.clone()))
    }

    pub(crate) async fn send_request(&self, request: HttpRequestBuilder) -> Result<Response> {
        let req = request.build(&self.authorization())?;
        let res = self.client.execute(req).await?;

        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        debug!(target: "iris::http", "The API answered with {status}");
        let body = res.bytes().await?;
        let mut error = serde_json::from_slice::<ApiError>(&body).unwrap_or_else(|_| ApiError {
            status: 0,
            code: 0,
            message: status.canonical_reason().unwrap_or("unknown error").to_string(),
        });
        error.status = status.as_u16();

        Err(error.into_error())
    }

    /// Sends the request and decodes the answer
    async fn fetch<T: DeserializeOwned>(&self, request: HttpRequestBuilder) -> Result<T> {
        let res = self.send_request(request).await?;
        let body = res.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Sends the request and drops the answer
    async fn execute(&self, request: HttpRequestBuilder) -> Result<()> {
        self.send_request(request).await.map(|_| ())
    }
}

fn authorization_header(token: &str, bot: bool) -> Result<HeaderValue> {
    let mut header = if bot {
        HeaderValue::from_str(&format!("Bot {token}"))?
    } else {
        HeaderValue::from_str(token)?
    };
    header.set_sensitive(true);
    Ok(header)
}

#[async_trait]
impl Http for RestClient {
    async fn get_current_user(&self) -> Result<ClientUserPayload> {
        self.fetch(self.request(Method::GET, url!(self.api_url, "/users/@me"))).await
    }

    async fn edit_profile(&self, payload: &EditProfilePayload) -> Result<EditProfileResponse> {
        let request = self.request(Method::PATCH, url!(self.api_url, "/users/@me")).json(payload);
        self.fetch(request).await
    }

    async fn edit_settings(&self, settings: &SettingsEdit) -> Result<serde_json::Value> {
        let request = self.request(Method::PATCH, url!(self.api_url, "/users/@me/settings")).json(settings);
        self.fetch(request).await
    }

    async fn start_group(&self, user_id: Snowflake, recipients: Vec<String>) -> Result<ChannelPayload> {
        let request = self
            .request(Method::POST, url!(self.api_url, "/users/{user_id}/channels"))
            .json(&StartGroupPayload { recipients });
        self.fetch(request).await
    }

    async fn start_private_message(&self, user_id: Snowflake) -> Result<ChannelPayload> {
        let request = self
            .request(Method::POST, url!(self.api_url, "/users/@me/channels"))
            .json(&StartPrivateMessagePayload { recipient_id: user_id });
        self.fetch(request).await
    }

    async fn get_mutual_friends(&self, user_id: Snowflake) -> Result<Vec<UserPayload>> {
        self.fetch(self.request(Method::GET, url!(self.api_url, "/users/{user_id}/relationships"))).await
    }

    async fn get_user_profile(&self, user_id: Snowflake) -> Result<ProfilePayload> {
        self.fetch(self.request(Method::GET, url!(self.api_url, "/users/{user_id}/profile"))).await
    }

    async fn add_relationship(&self, user_id: Snowflake, kind: Option<RelationshipType>) -> Result<()> {
        let body = match kind {
            Some(kind) => json!({ "type": kind }),
            None => json!({}),
        };
        let request = self
            .request(Method::PUT, url!(self.api_url, "/users/@me/relationships/{user_id}"))
            .json(&body);
        self.execute(request).await
    }

    async fn remove_relationship(&self, user_id: Snowflake) -> Result<()> {
        self.execute(self.request(Method::DELETE, url!(self.api_url, "/users/@me/relationships/{user_id}"))).await
    }

    async fn send_friend_request(&self, username: &str, discriminator: &str) -> Result<()> {
        let request = self
            .request(Method::POST, url!(self.api_url, "/users/@me/relationships"))
            .json(&json!({ "username": username, "discriminator": discriminator }));
        self.execute(request).await
    }

    async fn change_hypesquad_house(&self, house: HypeSquadHouse) -> Result<()> {
        let request = self
            .request(Method::POST, url!(self.api_url, "/hypesquad/online"))
            .json(&json!({ "house_id": house }));
        self.execute(request).await
    }

    async fn leave_hypesquad_house(&self) -> Result<()> {
        self.execute(self.request(Method::DELETE, url!(self.api_url, "/hypesquad/online"))).await
    }

    async fn send_message(&self, channel_id: Snowflake, content: &str) -> Result<Message> {
        let request = self
            .request(Method::POST, url!(self.api_url, "/channels/{channel_id}/messages"))
            .json(&json!({ "content": content }));
        self.fetch(request).await
    }

    fn set_token(&self, token: String, bot: bool) -> Result<()> {
        let header = authorization_header(&token, bot)?;
        *self.authorization.write().unwrap_or_else(PoisonError::into_inner) = header;
        debug!(target: "iris::http", "The session token has been replaced");
        Ok(())
    }
}

pub(crate) struct HttpRequestBuilder {
    pub request_builder: RequestBuilder,
}

impl HttpRequestBuilder {
    pub fn new(request_builder: RequestBuilder) -> Self {
        Self { request_builder }
    }

    pub fn json<T: serde::Serialize + ?Sized>(mut self, body: &T) -> Self {
        self.request_builder = self.request_builder.json(body);
        self
    }

    pub fn build(self, authorization: &HeaderValue) -> reqwest::Result<Request> {
        self.request_builder
            .header(AUTHORIZATION, authorization.clone())
            .build()
    }
}
