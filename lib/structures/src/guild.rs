use std::collections::HashSet;
use serde::{Deserialize, Serialize};
use crate::snowflake::{Identifiable, Snowflake};
use crate::user::UserPayload;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MemberPayload {
    pub user: UserPayload,
    #[serde(default)]
    pub nick: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GuildPayload {
    pub id: Snowflake,
    pub name: String,
    #[serde(default)]
    pub members: Vec<MemberPayload>,
}

/// A guild as far as user lookups are concerned: a name and a set of members
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guild {
    pub id: Snowflake,
    pub name: String,
    members: HashSet<Snowflake>,
}

impl Guild {
    pub fn new(payload: &GuildPayload) -> Self {
        Self {
            id: payload.id,
            name: payload.name.clone(),
            members: payload.members.iter().map(|member| member.user.id).collect(),
        }
    }

    pub fn has_member(&self, user_id: Snowflake) -> bool {
        self.members.contains(&user_id)
    }
}

impl Identifiable for Guild {
    fn id(&self) -> Snowflake {
        self.id
    }
}
