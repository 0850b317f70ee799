use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::flags::UserFlags;
use crate::snowflake::Snowflake;

/// Answer to `GET /users/{id}/profile`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProfilePayload {
    pub user: ProfileUser,
    pub connected_accounts: Vec<ConnectedAccount>,
    #[serde(default)]
    pub premium_since: Option<DateTime<Utc>>,
    #[serde(default)]
    pub mutual_guilds: Vec<PartialGuild>,
}

/// The part of the profile's user object that is kept: its full flags
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUser {
    #[serde(default)]
    pub flags: UserFlags,
}

/// An external account linked to a profile
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ConnectedAccount {
    /// The service, e.g. `github` or `steam`
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub verified: bool,
}

/// A guild shared with the profile's owner
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PartialGuild {
    pub id: Snowflake,
    #[serde(default)]
    pub nick: Option<String>,
}
