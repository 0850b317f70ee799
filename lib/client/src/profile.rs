use std::sync::Arc;
use chrono::{DateTime, Utc};
use structures::flags::{HypeSquadHouse, UserFlags};
use structures::guild::Guild;
use structures::profile::ConnectedAccount;
use crate::user::User;

/// A snapshot of a user's extended profile
#[derive(Debug, Clone)]
pub struct Profile {
    flags: UserFlags,
    user: User,
    mutual_guilds: Vec<Arc<Guild>>,
    connected_accounts: Vec<ConnectedAccount>,
    premium_since: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn new(
        flags: UserFlags,
        user: User,
        mutual_guilds: Vec<Arc<Guild>>,
        connected_accounts: Vec<ConnectedAccount>,
        premium_since: Option<DateTime<Utc>>,
    ) -> Self {
        Self { flags, user, mutual_guilds, connected_accounts, premium_since }
    }

    pub fn flags(&self) -> UserFlags {
        self.flags
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// The guilds shared with this user, among the cached ones
    pub fn mutual_guilds(&self) -> &[Arc<Guild>] {
        &self.mutual_guilds
    }

    pub fn connected_accounts(&self) -> &[ConnectedAccount] {
        &self.connected_accounts
    }

    pub fn premium_since(&self) -> Option<DateTime<Utc>> {
        self.premium_since
    }

    pub fn nitro(&self) -> bool {
        self.premium_since.is_some()
    }

    pub fn premium(&self) -> bool {
        self.nitro()
    }

    fn has_flag(&self, flag: UserFlags) -> bool {
        self.flags.contains(flag)
    }

    pub fn staff(&self) -> bool {
        self.has_flag(UserFlags::STAFF)
    }

    pub fn partner(&self) -> bool {
        self.has_flag(UserFlags::PARTNER)
    }

    pub fn bug_hunter(&self) -> bool {
        self.has_flag(UserFlags::BUG_HUNTER)
    }

    pub fn early_supporter(&self) -> bool {
        self.has_flag(UserFlags::EARLY_SUPPORTER)
    }

    pub fn hypesquad(&self) -> bool {
        self.has_flag(UserFlags::HYPESQUAD)
    }

    /// The HypeSquad houses the user belongs to
    pub fn hypesquad_houses(&self) -> Vec<HypeSquadHouse> {
        HypeSquadHouse::ALL
            .into_iter()
            .filter(|house| self.has_flag(house.flag()))
            .collect()
    }

    pub fn team_user(&self) -> bool {
        self.has_flag(UserFlags::TEAM_USER)
    }

    pub fn system(&self) -> bool {
        self.has_flag(UserFlags::SYSTEM)
    }
}
