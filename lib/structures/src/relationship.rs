use serde::{Deserialize, Serialize};
use crate::snowflake::{Identifiable, Snowflake};
use crate::user::{BaseUser, UserPayload};

/// How the logged-in account is related to another one
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[serde(from = "u8", into = "u8")]
pub enum RelationshipType {
    Friend,
    Blocked,
    IncomingRequest,
    OutgoingRequest,
    Unknown(u8),
}

impl RelationshipType {
    /// Whether a friend request is waiting on either side
    pub fn is_pending(self) -> bool {
        matches!(self, Self::IncomingRequest | Self::OutgoingRequest)
    }
}

impl From<u8> for RelationshipType {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Friend,
            2 => Self::Blocked,
            3 => Self::IncomingRequest,
            4 => Self::OutgoingRequest,
            other => Self::Unknown(other),
        }
    }
}

impl From<RelationshipType> for u8 {
    fn from(value: RelationshipType) -> Self {
        match value {
            RelationshipType::Friend => 1,
            RelationshipType::Blocked => 2,
            RelationshipType::IncomingRequest => 3,
            RelationshipType::OutgoingRequest => 4,
            RelationshipType::Unknown(other) => other,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RelationshipPayload {
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub kind: RelationshipType,
    pub user: UserPayload,
}

/// A relationship between the logged-in account and `user`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub kind: RelationshipType,
    pub user: BaseUser,
}

impl Relationship {
    pub fn new(payload: &RelationshipPayload) -> Self {
        Self {
            kind: payload.kind,
            user: BaseUser::new(&payload.user),
        }
    }
}

impl Identifiable for Relationship {
    fn id(&self) -> Snowflake {
        self.user.id()
    }
}
