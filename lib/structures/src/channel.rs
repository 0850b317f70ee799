use serde::{Deserialize, Serialize};
use crate::snowflake::Snowflake;
use crate::user::UserPayload;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[serde(from = "u8", into = "u8")]
pub enum ChannelType {
    GuildText,
    Dm,
    GuildVoice,
    GroupDm,
    Other(u8),
}

impl From<u8> for ChannelType {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::GuildText,
            1 => Self::Dm,
            2 => Self::GuildVoice,
            3 => Self::GroupDm,
            other => Self::Other(other),
        }
    }
}

impl From<ChannelType> for u8 {
    fn from(value: ChannelType) -> Self {
        match value {
            ChannelType::GuildText => 0,
            ChannelType::Dm => 1,
            ChannelType::GuildVoice => 2,
            ChannelType::GroupDm => 3,
            ChannelType::Other(other) => other,
        }
    }
}

/// A private channel object, either a DM or a group
///
/// See the [documentation](https://discord.com/developers/docs/resources/channel#channel-object)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChannelPayload {
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub kind: ChannelType,
    #[serde(default)]
    pub recipients: Vec<UserPayload>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub owner_id: Option<Snowflake>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub last_message_id: Option<Snowflake>,
}

/// Body of `POST /users/{id}/channels`
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StartGroupPayload {
    pub recipients: Vec<String>,
}

/// Body of `POST /users/@me/channels`
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StartPrivateMessagePayload {
    pub recipient_id: Snowflake,
}
