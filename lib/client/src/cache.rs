use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use dashmap::DashMap;
use tracing::{debug, trace};
use structures::channel::ChannelPayload;
use structures::guild::{Guild, GuildPayload};
use structures::relationship::{Relationship, RelationshipPayload};
use structures::snowflake::Snowflake;
use structures::user::{BaseUser, UserPayload};
use crate::channel::DmChannel;
use crate::http::Http;
use crate::user::User;
use crate::Result;

/// A user kept in the cache, along with the number of [`User`] handles pointing at it
#[derive(Debug, Clone)]
struct CachedUser {
    user: BaseUser,
    refs: usize,
    generation: u64,
}

/// The state shared by everything that belongs to a session
///
/// It owns the transport and the caches. Models only read from it and register new entries.
pub struct State {
    http: Arc<dyn Http>,
    guilds: DashMap<Snowflake, Arc<Guild>>,
    /// DM channels, stored by the ID of their recipient
    private_channels: DashMap<Snowflake, Arc<DmChannel>>,
    users: DashMap<Snowflake, CachedUser>,
    /// Relationships of the logged-in account, stored by the ID of the other user
    relationships: DashMap<Snowflake, Relationship>,
    /// Bumped by [`State::clear`], so handles from before a clear can't touch the new entries
    generation: AtomicU64,
}

impl State {
    pub fn new(http: Arc<dyn Http>) -> Self {
        Self {
            http,
            guilds: DashMap::new(),
            private_channels: DashMap::new(),
            users: DashMap::new(),
            relationships: DashMap::new(),
            generation: AtomicU64::new(0),
        }
    }

    pub fn http(&self) -> &Arc<dyn Http> {
        &self.http
    }

    pub fn guild(&self, id: Snowflake) -> Option<Arc<Guild>> {
        self.guilds.get(&id).map(|guild| guild.clone())
    }

    pub fn guilds(&self) -> Vec<Arc<Guild>> {
        self.guilds.iter().map(|guild| guild.value().clone()).collect()
    }

    pub fn add_guild(&self, payload: &GuildPayload) -> Arc<Guild> {
        let guild = Arc::new(Guild::new(payload));
        debug!(target: "iris::cache", "Caching guild {}", guild.id);
        self.guilds.insert(guild.id, guild.clone());
        guild
    }

    pub fn remove_guild(&self, id: Snowflake) -> Option<Arc<Guild>> {
        self.guilds.remove(&id).map(|(_, guild)| guild)
    }

    pub fn private_channel_by_user(&self, user_id: Snowflake) -> Option<Arc<DmChannel>> {
        self.private_channels.get(&user_id).map(|channel| channel.clone())
    }

    /// Caches a freshly opened DM channel
    ///
    /// If a channel with the same recipient is already known, that one is kept and returned.
    pub fn add_dm_channel(&self, payload: &ChannelPayload) -> Result<Arc<DmChannel>> {
        let channel = DmChannel::new(payload)?;
        let recipient = channel.recipient().id();

        let channel = self
            .private_channels
            .entry(recipient)
            .or_insert_with(|| {
                debug!(target: "iris::cache", "Caching DM channel {} with {recipient}", channel.id());
                Arc::new(channel)
            })
            .clone();

        Ok(channel)
    }

    /// Hands out a stored [`User`], taking one reference on its cache entry
    ///
    /// The cached data is refreshed with `payload`. The reference is given back when the `User` is dropped.
    pub fn store_user(self: &Arc<Self>, payload: &UserPayload) -> User {
        let generation = self.generation.load(Ordering::Acquire);

        let mut cached = self
            .users
            .entry(payload.id)
            .or_insert_with(|| CachedUser { user: BaseUser::new(payload), refs: 0, generation });

        if cached.generation != generation {
            // left over from before a clear
            *cached = CachedUser { user: BaseUser::new(payload), refs: 0, generation };
        }
        cached.user.update(payload);
        cached.refs += 1;
        drop(cached);

        User::stored(self.clone(), BaseUser::new(payload), generation)
    }

    pub fn cached_user(&self, id: Snowflake) -> Option<BaseUser> {
        self.users.get(&id).map(|cached| cached.user.clone())
    }

    /// Number of live [`User`] handles for `id`
    pub fn user_refs(&self, id: Snowflake) -> usize {
        self.users.get(&id).map_or(0, |cached| cached.refs)
    }

    /// Gives back one reference on a cached user, evicting it once nobody holds it.
    ///
    /// Does nothing if the entry is already gone, or if it was created after a clear that
    /// `generation` predates.
    pub fn deref_user(&self, id: Snowflake, generation: u64) {
        let evict = match self.users.get_mut(&id) {
            Some(mut cached) if cached.generation == generation => {
                cached.refs = cached.refs.saturating_sub(1);
                cached.refs == 0
            }
            _ => {
                trace!(target: "iris::cache", "User {id} released after its eviction");
                return;
            }
        };

        if evict {
            // it may have been taken again in between
            let evicted = self
                .users
                .remove_if(&id, |_, cached| cached.generation == generation && cached.refs == 0);
            if evicted.is_some() {
                debug!(target: "iris::cache", "Evicting user {id}");
            }
        }
    }

    pub fn relationship(&self, user_id: Snowflake) -> Option<Relationship> {
        self.relationships.get(&user_id).map(|relationship| relationship.clone())
    }

    pub fn relationships(&self) -> Vec<Relationship> {
        self.relationships.iter().map(|relationship| relationship.value().clone()).collect()
    }

    pub fn add_relationship(&self, payload: &RelationshipPayload) {
        self.relationships.insert(payload.user.id, Relationship::new(payload));
    }

    pub fn remove_relationship(&self, user_id: Snowflake) -> Option<Relationship> {
        self.relationships.remove(&user_id).map(|(_, relationship)| relationship)
    }

    /// Empties every cache
    pub fn clear(&self) {
        debug!(target: "iris::cache", "Clearing the session caches");
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.guilds.clear();
        self.private_channels.clear();
        self.users.clear();
        self.relationships.clear();
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use super::*;
    use crate::mock::MockHttp;

    fn state() -> Arc<State> {
        Arc::new(State::new(Arc::new(MockHttp::default())))
    }

    fn user(id: u64) -> UserPayload {
        serde_json::from_value(json!({
            "id": id.to_string(),
            "username": format!("user{id}"),
            "discriminator": "0001",
            "avatar": null,
        }))
        .unwrap()
    }

    #[test]
    fn stored_users_are_reference_counted() {
        let state = state();
        let id = Snowflake::new(7);

        let first = state.store_user(&user(7));
        let second = state.store_user(&user(7));
        assert!(first.is_stored());
        assert_eq!(state.user_refs(id), 2);

        drop(first);
        assert_eq!(state.user_refs(id), 1);
        assert!(state.cached_user(id).is_some());

        drop(second);
        assert!(state.cached_user(id).is_none());
    }

    #[test]
    fn copies_do_not_hold_a_reference() {
        let state = state();
        let stored = state.store_user(&user(7));
        let copy = stored.clone();

        assert!(!copy.is_stored());
        assert_eq!(copy, stored);

        drop(copy);
        assert_eq!(state.user_refs(Snowflake::new(7)), 1);
    }

    #[test]
    fn releasing_after_a_clear_is_a_no_op() {
        let state = state();
        let stored = state.store_user(&user(7));

        state.clear();
        drop(stored);

        assert_eq!(state.user_refs(Snowflake::new(7)), 0);
        state.deref_user(Snowflake::new(8), 0);
    }

    #[test]
    fn handles_from_before_a_clear_leave_new_entries_alone() {
        let state = state();
        let old = state.store_user(&user(7));

        state.clear();
        let fresh = state.store_user(&user(7));
        drop(old);

        assert!(fresh.is_stored());
        assert_eq!(state.user_refs(Snowflake::new(7)), 1);

        drop(fresh);
        assert!(state.cached_user(Snowflake::new(7)).is_none());
    }

    #[test]
    fn updating_with_another_id_keeps_the_reference() {
        let state = state();
        let mut seven = state.store_user(&user(7));
        let eight = state.store_user(&user(8));

        assert!(!seven.update(&user(8)));
        assert_eq!(seven.id(), Snowflake::new(7));

        drop(seven);
        assert!(state.cached_user(Snowflake::new(7)).is_none());
        assert_eq!(state.user_refs(Snowflake::new(8)), 1);
        assert!(eight.is_stored());
    }

    #[test]
    fn guilds_and_relationships_can_be_removed() {
        let state = state();
        let guild: GuildPayload = serde_json::from_value(json!({ "id": "10", "name": "guild" })).unwrap();
        state.add_guild(&guild);
        let relationship: RelationshipPayload = serde_json::from_value(json!({
            "id": "7", "type": 1, "user": user(7),
        }))
        .unwrap();
        state.add_relationship(&relationship);

        assert_eq!(state.remove_guild(Snowflake::new(10)).unwrap().name, "guild");
        assert!(state.remove_guild(Snowflake::new(10)).is_none());
        assert!(state.guilds().is_empty());

        assert_eq!(state.remove_relationship(Snowflake::new(7)).unwrap().user.id(), Snowflake::new(7));
        assert!(state.relationship(Snowflake::new(7)).is_none());
    }

    #[test]
    fn refreshes_cached_data() {
        let state = state();
        let _old = state.store_user(&user(7));

        let mut renamed = user(7);
        renamed.username = "renamed".into();
        let _new = state.store_user(&renamed);

        assert_eq!(state.cached_user(Snowflake::new(7)).unwrap().name(), "renamed");
    }

    #[test]
    fn keeps_the_first_dm_channel() {
        let state = state();
        let payload: ChannelPayload = serde_json::from_value(json!({
            "id": "100",
            "type": 1,
            "recipients": [user(7)],
        }))
        .unwrap();

        let first = state.add_dm_channel(&payload).unwrap();
        let second = state.add_dm_channel(&payload).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first, &state.private_channel_by_user(Snowflake::new(7)).unwrap()));
    }

    #[test]
    fn dm_channels_need_a_recipient() {
        let state = state();
        let payload: ChannelPayload = serde_json::from_value(json!({ "id": "100", "type": 1 })).unwrap();

        assert!(matches!(state.add_dm_channel(&payload), Err(crate::Error::MissingData(_))));
    }
}
