use serde::{Deserialize, Serialize};
use crate::snowflake::Snowflake;
use crate::user::UserPayload;

/// A message, trimmed down to what the user models need
///
/// See the [documentation](https://discord.com/developers/docs/resources/channel#message-object)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default)]
    pub content: String,
    pub author: UserPayload,
    /// Whether `@everyone` was pinged
    #[serde(default)]
    pub mention_everyone: bool,
    /// The users specifically mentioned in the message
    #[serde(default)]
    pub mentions: Vec<UserPayload>,
}
