use std::sync::Arc;
use async_trait::async_trait;
use serde::de::Error as _;
use structures::channel::ChannelPayload;
use structures::message::Message;
use structures::snowflake::{Identifiable, Snowflake};
use structures::user::BaseUser;
use crate::cache::State;
use crate::Result;

/// Something messages can be sent to
#[async_trait]
pub trait Messageable: Send + Sync {
    fn state(&self) -> &Arc<State>;

    /// Resolves the channel messages go to, opening it if needed
    async fn channel_id(&self) -> Result<Snowflake>;

    async fn send(&self, content: &str) -> Result<Message> {
        let channel_id = self.channel_id().await?;
        self.state().http().send_message(channel_id, content).await
    }
}

/// A private conversation with a single user
#[derive(Debug, Clone)]
pub struct DmChannel {
    id: Snowflake,
    recipient: BaseUser,
    last_message_id: Option<Snowflake>,
}

impl DmChannel {
    pub fn new(payload: &ChannelPayload) -> Result<Self> {
        let recipient = payload
            .recipients
            .first()
            .ok_or_else(|| serde_json::Error::custom("a DM channel needs a recipient"))?;

        Ok(Self {
            id: payload.id,
            recipient: BaseUser::new(recipient),
            last_message_id: payload.last_message_id,
        })
    }

    pub fn id(&self) -> Snowflake {
        self.id
    }

    pub fn recipient(&self) -> &BaseUser {
        &self.recipient
    }

    pub fn last_message_id(&self) -> Option<Snowflake> {
        self.last_message_id
    }
}

impl Identifiable for DmChannel {
    fn id(&self) -> Snowflake {
        self.id
    }
}

/// A private conversation between the logged-in account and several users
#[derive(Clone)]
pub struct GroupChannel {
    id: Snowflake,
    name: Option<String>,
    owner_id: Option<Snowflake>,
    icon: Option<String>,
    recipients: Vec<BaseUser>,
    me: BaseUser,
    state: Arc<State>,
}

impl GroupChannel {
    pub fn new(state: Arc<State>, me: BaseUser, payload: &ChannelPayload) -> Self {
        Self {
            id: payload.id,
            name: payload.name.clone(),
            owner_id: payload.owner_id,
            icon: payload.icon.clone(),
            recipients: payload.recipients.iter().map(BaseUser::new).collect(),
            me,
            state,
        }
    }

    pub fn id(&self) -> Snowflake {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Every member of the group, except the logged-in account
    pub fn recipients(&self) -> &[BaseUser] {
        &self.recipients
    }

    pub fn me(&self) -> &BaseUser {
        &self.me
    }

    /// The owner of the group, if it is known
    pub fn owner(&self) -> Option<&BaseUser> {
        let owner_id = self.owner_id?;
        if owner_id == self.me.id() {
            return Some(&self.me);
        }
        self.recipients.iter().find(|user| user.id() == owner_id)
    }
}

impl std::fmt::Debug for GroupChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupChannel")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("owner_id", &self.owner_id)
            .field("recipients", &self.recipients)
            .finish_non_exhaustive()
    }
}

impl Identifiable for GroupChannel {
    fn id(&self) -> Snowflake {
        self.id
    }
}

#[async_trait]
impl Messageable for GroupChannel {
    fn state(&self) -> &Arc<State> {
        &self.state
    }

    async fn channel_id(&self) -> Result<Snowflake> {
        Ok(self.id)
    }
}
