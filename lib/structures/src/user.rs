use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use crate::asset::{Asset, DefaultAvatar};
use crate::colour::Colour;
use crate::flags::UserFlags;
use crate::message::Message;
use crate::snowflake::{Identifiable, Snowflake};

/// A user object, as sent by the API
///
/// `id`, `username`, `discriminator` and `avatar` must always be present, even if `avatar` is null.
///
/// See the [documentation](https://discord.com/developers/docs/resources/user#user-object)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserPayload {
    pub id: Snowflake,
    pub username: String,
    pub discriminator: String,
    #[serde(deserialize_with = "nullable")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub banner: Option<String>,
    #[serde(default)]
    pub accent_color: Option<u32>,
    #[serde(default)]
    pub public_flags: UserFlags,
    #[serde(default)]
    pub bot: bool,
    #[serde(default)]
    pub system: bool,
}

/// Makes an `Option` field required while still allowing `null`
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

/// The user object of the logged-in account, which carries private fields
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClientUserPayload {
    #[serde(flatten)]
    pub user: UserPayload,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub flags: UserFlags,
    #[serde(default)]
    pub mfa_enabled: bool,
    #[serde(default)]
    pub premium: bool,
    #[serde(default)]
    pub premium_type: Option<PremiumType>,
}

/// The kind of subscription an account has
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[serde(from = "u8", into = "u8")]
pub enum PremiumType {
    None,
    NitroClassic,
    Nitro,
    NitroBasic,
    Unknown(u8),
}

impl From<u8> for PremiumType {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::None,
            1 => Self::NitroClassic,
            2 => Self::Nitro,
            3 => Self::NitroBasic,
            other => Self::Unknown(other),
        }
    }
}

impl From<PremiumType> for u8 {
    fn from(value: PremiumType) -> Self {
        match value {
            PremiumType::None => 0,
            PremiumType::NitroClassic => 1,
            PremiumType::Nitro => 2,
            PremiumType::NitroBasic => 3,
            PremiumType::Unknown(other) => other,
        }
    }
}

/// The smallest representation of a user, used when it has to be embedded in another payload
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MinimalUser {
    pub username: String,
    pub id: Snowflake,
    pub avatar: Option<String>,
    pub discriminator: String,
    pub bot: bool,
}

/// Body of `PATCH /users/@me`
///
/// `avatar` is tri-state: absent keeps the current avatar, `null` removes it.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct EditProfilePayload {
    pub password: Option<String>,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
}

/// Answer to `PATCH /users/@me`
///
/// User accounts get a fresh token whenever their credentials change.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EditProfileResponse {
    #[serde(flatten)]
    pub user: ClientUserPayload,
    #[serde(default)]
    pub token: Option<String>,
}

/// The fields and accessors shared by every kind of user
///
/// Two users are equal when their IDs are, whatever the state of their other fields.
#[derive(Serialize, Debug, Clone)]
pub struct BaseUser {
    id: Snowflake,
    name: String,
    discriminator: String,
    avatar: Option<String>,
    banner: Option<String>,
    accent_colour: Option<u32>,
    public_flags: UserFlags,
    bot: bool,
    system: bool,
}

impl BaseUser {
    pub fn new(payload: &UserPayload) -> Self {
        let mut user = Self {
            id: payload.id,
            name: String::new(),
            discriminator: String::new(),
            avatar: None,
            banner: None,
            accent_colour: None,
            public_flags: UserFlags::empty(),
            bot: false,
            system: false,
        };
        user.update(payload);
        user
    }

    /// Parses a raw user object
    ///
    /// Fails if one of the mandatory keys is missing.
    pub fn from_value(value: serde_json::Value) -> serde_json::Result<Self> {
        let payload: UserPayload = serde_json::from_value(value)?;
        Ok(Self::new(&payload))
    }

    /// Overwrites every field with the content of `payload`
    ///
    /// The ID never changes: a payload describing another user is ignored and `false` is returned.
    pub fn update(&mut self, payload: &UserPayload) -> bool {
        if payload.id != self.id {
            return false;
        }

        self.name.clone_from(&payload.username);
        self.discriminator.clone_from(&payload.discriminator);
        self.avatar.clone_from(&payload.avatar);
        self.banner.clone_from(&payload.banner);
        self.accent_colour = payload.accent_color;
        self.public_flags = payload.public_flags;
        self.bot = payload.bot;
        self.system = payload.system;
        true
    }

    pub fn id(&self) -> Snowflake {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }

    pub fn avatar_hash(&self) -> Option<&str> {
        self.avatar.as_deref()
    }

    pub fn banner_hash(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn public_flags(&self) -> UserFlags {
        self.public_flags
    }

    pub fn is_bot(&self) -> bool {
        self.bot
    }

    /// Whether the account represents the platform itself
    pub fn is_system(&self) -> bool {
        self.system
    }

    /// The avatar of the user, or the default one if none was uploaded
    pub fn avatar(&self) -> Asset {
        match &self.avatar {
            Some(hash) => Asset::from_avatar(self.id, hash),
            None => self.default_avatar(),
        }
    }

    pub fn default_avatar(&self) -> Asset {
        Asset::from_default_avatar(DefaultAvatar::from_discriminator(&self.discriminator))
    }

    pub fn display_avatar(&self) -> Asset {
        self.avatar()
    }

    pub fn banner(&self) -> Option<Asset> {
        self.banner.as_deref().map(|hash| Asset::from_user_banner(self.id, hash))
    }

    pub fn accent_colour(&self) -> Option<Colour> {
        self.accent_colour.map(Colour::new)
    }

    pub fn accent_color(&self) -> Option<Colour> {
        self.accent_colour()
    }

    /// Outside of a guild there's no role to take a colour from, so this is always the default one
    pub fn colour(&self) -> Colour {
        Colour::default()
    }

    pub fn color(&self) -> Colour {
        self.colour()
    }

    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.id.created_at()
    }

    pub fn display_name(&self) -> &str {
        &self.name
    }

    pub fn mentioned_in(&self, message: &Message) -> bool {
        message.mention_everyone || message.mentions.iter().any(|user| user.id == self.id)
    }

    pub fn minimal_json(&self) -> MinimalUser {
        MinimalUser {
            username: self.name.clone(),
            id: self.id,
            avatar: self.avatar.clone(),
            discriminator: self.discriminator.clone(),
            bot: self.bot,
        }
    }
}

impl Identifiable for BaseUser {
    fn id(&self) -> Snowflake {
        self.id
    }
}

impl PartialEq for BaseUser {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for BaseUser {}

impl Hash for BaseUser {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.id.get() >> 22).hash(state)
    }
}

impl Display for BaseUser {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.discriminator)
    }
}
