use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use crate::snowflake::Snowflake;

/// Which messages get scanned for explicit content
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[serde(from = "u8", into = "u8")]
pub enum UserContentFilter {
    Disabled,
    Friends,
    All,
    Unknown(u8),
}

impl From<u8> for UserContentFilter {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Disabled,
            1 => Self::Friends,
            2 => Self::All,
            other => Self::Unknown(other),
        }
    }
}

impl From<UserContentFilter> for u8 {
    fn from(value: UserContentFilter) -> Self {
        match value {
            UserContentFilter::Disabled => 0,
            UserContentFilter::Friends => 1,
            UserContentFilter::All => 2,
            UserContentFilter::Unknown(other) => other,
        }
    }
}

/// Who is allowed to send a friend request
///
/// Serialized as the set of booleans the settings endpoint expects rather than as its ordinal.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum FriendFlags {
    NoRelation = 0,
    MutualGuilds = 1,
    MutualFriends = 2,
    GuildAndFriends = 3,
    Everyone = 4,
}

impl Serialize for FriendFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let entries: &[&str] = match self {
            Self::NoRelation => &[],
            Self::MutualGuilds => &["mutual_guilds"],
            Self::MutualFriends => &["mutual_friends"],
            Self::GuildAndFriends => &["mutual_guilds", "mutual_friends"],
            Self::Everyone => &["all"],
        };

        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for key in entries {
            map.serialize_entry(key, &true)?;
        }
        map.end()
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Online,
    Offline,
    Idle,
    Dnd,
    Invisible,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

/// Body of `PATCH /users/@me/settings`
///
/// Every field left to `None` is omitted. Settings without a dedicated field can be passed
/// through `extra`, they are sent untouched.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct SettingsEdit {
    /// Seconds of inactivity before notifications go to mobile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub afk_timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animate_emojis: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub convert_emoticons: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_guilds_restricted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detect_platform_accounts: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_games_tab: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_tts_command: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explicit_content_filter: Option<UserContentFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friend_source_flags: Option<FriendFlags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gif_auto_play: Option<bool>,
    /// Guilds in the order they appear in the sidebar
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild_positions: Option<Vec<Snowflake>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_attachment_media: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_embed_media: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_display_compact: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render_embeds: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render_reactions: Option<bool>,
    /// Guilds whose members can't send DMs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restricted_guilds: Option<Vec<Snowflake>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_current_game: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone_offset: Option<i32>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
