use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;
use async_trait::async_trait;
use tracing::debug;
use structures::guild::Guild;
use structures::relationship::{Relationship, RelationshipType};
use structures::snowflake::{Identifiable, Snowflake};
use structures::user::{BaseUser, UserPayload};
use crate::cache::State;
use crate::channel::{DmChannel, Messageable};
use crate::client_user::ClientUser;
use crate::profile::Profile;
use crate::Result;

/// A user other than the logged-in account
///
/// All the fields and accessors of [`BaseUser`] are reachable through `Deref`.
///
/// A `User` handed out by [`State::store_user`] holds a reference on the cached user, which is
/// given back when it is dropped. Clones never hold one.
pub struct User {
    base: BaseUser,
    state: Arc<State>,
    /// Cache generation the held reference belongs to, if any
    stored: Option<u64>,
}

impl User {
    pub fn new(state: Arc<State>, payload: &UserPayload) -> Self {
        Self::from_base(state, BaseUser::new(payload))
    }

    /// Parses a raw user object
    pub fn from_value(state: Arc<State>, value: serde_json::Value) -> Result<Self> {
        let payload: UserPayload = serde_json::from_value(value)?;
        Ok(Self::new(state, &payload))
    }

    pub(crate) fn from_base(state: Arc<State>, base: BaseUser) -> Self {
        Self { base, state, stored: None }
    }

    pub(crate) fn stored(state: Arc<State>, base: BaseUser, generation: u64) -> Self {
        Self { base, state, stored: Some(generation) }
    }

    /// Refreshes the user, see [`BaseUser::update`]
    pub fn update(&mut self, payload: &UserPayload) -> bool {
        self.base.update(payload)
    }

    pub fn base(&self) -> &BaseUser {
        &self.base
    }

    /// Whether this handle holds a reference on the user cache
    pub fn is_stored(&self) -> bool {
        self.stored.is_some()
    }

    /// The DM channel with this user, if one was already opened
    pub fn dm_channel(&self) -> Option<Arc<DmChannel>> {
        self.state.private_channel_by_user(self.base.id())
    }

    /// The cached guilds this user is a member of
    pub fn mutual_guilds(&self) -> Vec<Arc<Guild>> {
        let id = self.base.id();
        self.state
            .guilds()
            .into_iter()
            .filter(|guild| guild.has_member(id))
            .collect()
    }

    /// Opens a DM channel with this user, or returns the one already opened
    pub async fn create_dm(&self) -> Result<Arc<DmChannel>> {
        if let Some(channel) = self.dm_channel() {
            return Ok(channel);
        }

        debug!(target: "iris::user", "Opening a DM channel with {}", self.base.id());
        let payload = self.state.http().start_private_message(self.base.id()).await?;
        self.state.add_dm_channel(&payload)
    }

    pub fn relationship(&self) -> Option<Relationship> {
        self.state.relationship(self.base.id())
    }

    pub fn is_friend(&self) -> bool {
        self.relationship().is_some_and(|r| r.kind == RelationshipType::Friend)
    }

    pub fn is_blocked(&self) -> bool {
        self.relationship().is_some_and(|r| r.kind == RelationshipType::Blocked)
    }

    pub async fn mutual_friends(&self) -> Result<Vec<User>> {
        let friends = self.state.http().get_mutual_friends(self.base.id()).await?;
        Ok(friends
            .iter()
            .map(|friend| User::new(self.state.clone(), friend))
            .collect())
    }

    pub async fn block(&self) -> Result<()> {
        self.state
            .http()
            .add_relationship(self.base.id(), Some(RelationshipType::Blocked))
            .await
    }

    pub async fn unblock(&self) -> Result<()> {
        self.state.http().remove_relationship(self.base.id()).await
    }

    pub async fn remove_friend(&self) -> Result<()> {
        self.state.http().remove_relationship(self.base.id()).await
    }

    pub async fn send_friend_request(&self) -> Result<()> {
        self.state
            .http()
            .send_friend_request(self.base.name(), self.base.discriminator())
            .await
    }

    /// Fetches the profile of this user
    ///
    /// Mutual guilds that aren't cached are left out.
    pub async fn profile(&self) -> Result<Profile> {
        let payload = self.state.http().get_user_profile(self.base.id()).await?;

        let mutual_guilds = payload
            .mutual_guilds
            .iter()
            .filter_map(|guild| self.state.guild(guild.id))
            .collect();

        Ok(Profile::new(
            payload.user.flags,
            self.clone(),
            mutual_guilds,
            payload.connected_accounts,
            payload.premium_since,
        ))
    }
}

impl Drop for User {
    fn drop(&mut self) {
        if let Some(generation) = self.stored {
            self.state.deref_user(self.base.id(), generation);
        }
    }
}

impl Clone for User {
    fn clone(&self) -> Self {
        Self::from_base(self.state.clone(), self.base.clone())
    }
}

impl Deref for User {
    type Target = BaseUser;

    fn deref(&self) -> &BaseUser {
        &self.base
    }
}

impl Identifiable for User {
    fn id(&self) -> Snowflake {
        self.base.id()
    }
}

impl Debug for User {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.base.id())
            .field("name", &self.base.name())
            .field("discriminator", &self.base.discriminator())
            .field("bot", &self.base.is_bot())
            .field("stored", &self.stored.is_some())
            .finish()
    }
}

impl Display for User {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.base, f)
    }
}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.base.hash(state)
    }
}

#[async_trait]
impl Messageable for User {
    fn state(&self) -> &Arc<State> {
        &self.state
    }

    async fn channel_id(&self) -> Result<Snowflake> {
        Ok(self.create_dm().await?.id())
    }
}

/// Equality between user-like types, based on their IDs only
macro_rules! id_eq {
    ($($left:ty => $($right:ty),+);+ $(;)?) => {
        $($(
            impl PartialEq<$right> for $left {
                fn eq(&self, other: &$right) -> bool {
                    Identifiable::id(self) == Identifiable::id(other)
                }
            }
        )+)+
    };
}

id_eq! {
    User => User, BaseUser, ClientUser;
    BaseUser => User, ClientUser;
    ClientUser => ClientUser, BaseUser, User;
}

impl Eq for User {}
