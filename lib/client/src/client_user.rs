use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;
use tracing::{debug, warn};
use structures::asset::image_data_uri;
use structures::channel::ChannelPayload;
use structures::flags::{HypeSquadHouse, UserFlags};
use structures::relationship::{Relationship, RelationshipType};
use structures::settings::SettingsEdit;
use structures::snowflake::{Identifiable, Snowflake};
use structures::user::{BaseUser, ClientUserPayload, EditProfilePayload, PremiumType};
use crate::cache::State;
use crate::channel::GroupChannel;
use crate::user::User;
use crate::{Error, Result};

/// Changes to apply to the logged-in account with [`ClientUser::edit`]
///
/// Anything left untouched keeps its current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileEdit {
    username: Option<String>,
    avatar: Option<Option<Vec<u8>>>,
    email: Option<String>,
    password: Option<String>,
    new_password: Option<String>,
    house: Option<Option<HypeSquadHouse>>,
}

impl ProfileEdit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Uploads a new avatar, given as the raw bytes of a PNG, JPEG, GIF or WebP image
    pub fn avatar(mut self, image: impl Into<Vec<u8>>) -> Self {
        self.avatar = Some(Some(image.into()));
        self
    }

    pub fn remove_avatar(mut self) -> Self {
        self.avatar = Some(None);
        self
    }

    /// Only used by user accounts
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// The current password, required by user accounts
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Only used by user accounts
    pub fn new_password(mut self, new_password: impl Into<String>) -> Self {
        self.new_password = Some(new_password.into());
        self
    }

    pub fn house(mut self, house: HypeSquadHouse) -> Self {
        self.house = Some(Some(house));
        self
    }

    /// Joins a house by its raw ID, which must be one of the known houses
    pub fn house_id(self, id: u8) -> Result<Self> {
        Ok(self.house(HypeSquadHouse::try_from(id)?))
    }

    pub fn leave_house(mut self) -> Self {
        self.house = Some(None);
        self
    }
}

/// The logged-in account
///
/// All the fields and accessors of [`BaseUser`] are reachable through `Deref`.
#[derive(Clone)]
pub struct ClientUser {
    base: BaseUser,
    state: Arc<State>,
    verified: bool,
    email: Option<String>,
    locale: Option<String>,
    flags: UserFlags,
    mfa_enabled: bool,
    premium: bool,
    premium_type: Option<PremiumType>,
}

impl ClientUser {
    pub fn new(state: Arc<State>, payload: &ClientUserPayload) -> Self {
        let mut user = Self {
            base: BaseUser::new(&payload.user),
            state,
            verified: false,
            email: None,
            locale: None,
            flags: UserFlags::empty(),
            mfa_enabled: false,
            premium: false,
            premium_type: None,
        };
        user.update(payload);
        user
    }

    /// Parses a raw user object of the logged-in account
    pub fn from_value(state: Arc<State>, value: serde_json::Value) -> Result<Self> {
        let payload: ClientUserPayload = serde_json::from_value(value)?;
        Ok(Self::new(state, &payload))
    }

    /// Refreshes the account, see [`BaseUser::update`]
    ///
    /// A payload describing another user is ignored and `false` is returned.
    pub fn update(&mut self, payload: &ClientUserPayload) -> bool {
        if !self.base.update(&payload.user) {
            return false;
        }

        self.verified = payload.verified;
        self.email.clone_from(&payload.email);
        self.locale.clone_from(&payload.locale);
        self.flags = payload.flags;
        self.mfa_enabled = payload.mfa_enabled;
        self.premium = payload.premium;
        self.premium_type = payload.premium_type;
        true
    }

    pub fn base(&self) -> &BaseUser {
        &self.base
    }

    /// Whether the email of the account has been verified
    pub fn verified(&self) -> bool {
        self.verified
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// The IETF language tag chosen by the account
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// Every flag of the account, including the private ones
    pub fn flags(&self) -> UserFlags {
        self.flags
    }

    pub fn mfa_enabled(&self) -> bool {
        self.mfa_enabled
    }

    pub fn premium(&self) -> bool {
        self.premium
    }

    pub fn premium_type(&self) -> Option<PremiumType> {
        self.premium_type
    }

    pub fn relationship_for(&self, user_id: Snowflake) -> Option<Relationship> {
        self.state.relationship(user_id)
    }

    pub fn relationships(&self) -> Vec<Relationship> {
        self.state.relationships()
    }

    pub fn friends(&self) -> Vec<User> {
        self.users_with(RelationshipType::Friend)
    }

    pub fn blocked(&self) -> Vec<User> {
        self.users_with(RelationshipType::Blocked)
    }

    fn users_with(&self, kind: RelationshipType) -> Vec<User> {
        self.state
            .relationships()
            .into_iter()
            .filter(|relationship| relationship.kind == kind)
            .map(|relationship| User::from_base(self.state.clone(), relationship.user))
            .collect()
    }

    /// Edits the profile of the account
    ///
    /// User accounts must give their current password. On success `self` is updated and a fresh
    /// `ClientUser` is returned as well. If the API hands back a new token it replaces the
    /// session's one.
    pub async fn edit(&mut self, edit: ProfileEdit) -> Result<ClientUser> {
        let user_account = !self.base.is_bot();
        if user_account && edit.password.is_none() {
            return Err(Error::usage("A password is required to edit the profile of a user account"));
        }

        let avatar = match edit.avatar {
            Some(Some(image)) => Some(Some(
                image_data_uri(&image).ok_or_else(|| Error::usage("Unsupported avatar image format"))?,
            )),
            Some(None) => Some(None),
            None => None,
        };

        let mut payload = EditProfilePayload {
            password: edit.password,
            username: edit.username.unwrap_or_else(|| self.base.name().to_string()),
            avatar,
            email: None,
            new_password: None,
        };

        if user_account {
            payload.email = edit.email.or_else(|| self.email.clone());
            payload.new_password = edit.new_password;
        }

        let http = self.state.http();

        match edit.house {
            Some(Some(house)) => http.change_hypesquad_house(house).await?,
            Some(None) => http.leave_hypesquad_house().await?,
            None => {}
        }

        let response = http.edit_profile(&payload).await?;

        if user_account {
            match response.token {
                Some(token) => {
                    if let Err(e) = http.set_token(token, false) {
                        warn!(target: "iris::client_user", "Cannot use the token sent back after the profile edit, the previous one is kept: {e}");
                    }
                }
                None => {
                    debug!(target: "iris::client_user", "No new token was sent back after the profile edit");
                }
            }
        }

        debug!(target: "iris::client_user", "Profile of {} edited", self.base.id());
        self.update(&response.user);

        Ok(ClientUser::new(self.state.clone(), &response.user))
    }

    /// Creates a group DM with at least two other users
    pub async fn create_group<U: Identifiable>(&self, recipients: &[U]) -> Result<GroupChannel> {
        if recipients.len() < 2 {
            return Err(Error::usage("You must have two or more recipients to create a group"));
        }

        let users = recipients.iter().map(|user| user.id().to_string()).collect();
        let payload: ChannelPayload = self.state.http().start_group(self.base.id(), users).await?;

        Ok(GroupChannel::new(self.state.clone(), self.base.clone(), &payload))
    }

    /// Edits the client settings of the account, returning the updated settings
    pub async fn edit_settings(&self, settings: SettingsEdit) -> Result<serde_json::Value> {
        self.state.http().edit_settings(&settings).await
    }
}

impl Deref for ClientUser {
    type Target = BaseUser;

    fn deref(&self) -> &BaseUser {
        &self.base
    }
}

impl Identifiable for ClientUser {
    fn id(&self) -> Snowflake {
        self.base.id()
    }
}

impl Eq for ClientUser {}

impl Hash for ClientUser {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.base.hash(state)
    }
}

impl Debug for ClientUser {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientUser")
            .field("id", &self.base.id())
            .field("name", &self.base.name())
            .field("discriminator", &self.base.discriminator())
            .field("bot", &self.base.is_bot())
            .field("verified", &self.verified)
            .field("mfa_enabled", &self.mfa_enabled)
            .finish()
    }
}

impl Display for ClientUser {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.base, f)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use structures::relationship::RelationshipPayload;
    use structures::settings::FriendFlags;
    use super::*;
    use crate::mock::{Call, MockHttp};

    fn setup() -> (Arc<MockHttp>, Arc<State>) {
        let http = Arc::new(MockHttp::default());
        let state = Arc::new(State::new(http.clone()));
        (http, state)
    }

    fn me(state: &Arc<State>, bot: bool) -> ClientUser {
        ClientUser::from_value(state.clone(), json!({
            "id": "1",
            "username": "me",
            "discriminator": "0001",
            "avatar": null,
            "bot": bot,
            "email": "me@example.com",
            "verified": true,
            "locale": "en-US",
            "mfa_enabled": true,
            "flags": 1,
        }))
        .unwrap()
    }

    fn edited(bot: bool, token: Option<&str>) -> serde_json::Value {
        let mut value = json!({
            "id": "1",
            "username": "renamed",
            "discriminator": "0001",
            "avatar": "newhash",
            "bot": bot,
            "email": "new@example.com",
        });
        if let Some(token) = token {
            value["token"] = json!(token);
        }
        value
    }

    fn peer(state: &Arc<State>, id: u64) -> User {
        User::from_value(state.clone(), json!({
            "id": id.to_string(), "username": "peer", "discriminator": "0002", "avatar": null,
        }))
        .unwrap()
    }

    #[test]
    fn absent_fields_reset_to_defaults() {
        let (_, state) = setup();
        let mut me = me(&state, false);
        assert!(me.verified() && me.mfa_enabled());
        assert_eq!(me.locale(), Some("en-US"));
        assert_eq!(me.flags(), UserFlags::STAFF);

        me.update(&serde_json::from_value(json!({
            "id": "1", "username": "me", "discriminator": "0001", "avatar": null,
        })).unwrap());

        assert!(!me.verified() && !me.mfa_enabled() && !me.premium());
        assert!(me.email().is_none() && me.locale().is_none() && me.premium_type().is_none());
        assert!(me.flags().is_empty());
    }

    #[tokio::test]
    async fn user_accounts_need_a_password() {
        let (http, state) = setup();
        let mut me = me(&state, false);

        let result = me.edit(ProfileEdit::new().username("renamed").house(HypeSquadHouse::Bravery)).await;

        assert!(matches!(result, Err(Error::Usage(_))));
        assert!(http.calls().is_empty());
    }

    #[tokio::test]
    async fn edit_rotates_the_token() {
        let (http, state) = setup();
        http.respond("edit_profile", edited(false, Some("new-token")));
        let mut me = me(&state, false);

        let avatar = b"\x89PNG\r\n\x1a\nrest".to_vec();
        let fresh = me
            .edit(ProfileEdit::new().username("renamed").avatar(avatar).password("hunter2").new_password("hunter3"))
            .await
            .unwrap();

        let calls = http.calls();
        let Call::EditProfile(body) = &calls[0] else { panic!("unexpected call {:?}", calls[0]) };
        assert_eq!(body["username"], "renamed");
        assert_eq!(body["password"], "hunter2");
        assert_eq!(body["new_password"], "hunter3");
        assert_eq!(body["email"], "me@example.com");
        assert!(body["avatar"].as_str().unwrap().starts_with("data:image/png;base64,"));
        assert_eq!(calls[1], Call::SetToken("new-token".into(), false));

        assert_eq!(me.name(), "renamed");
        assert_eq!(me.email(), Some("new@example.com"));
        assert_eq!(fresh.avatar_hash(), Some("newhash"));
        assert_eq!(fresh, me);
    }

    #[tokio::test]
    async fn a_missing_token_is_not_an_error() {
        let (http, state) = setup();
        http.respond("edit_profile", edited(false, None));
        let mut me = me(&state, false);

        me.edit(ProfileEdit::new().password("hunter2")).await.unwrap();

        assert!(!http.calls().iter().any(|call| matches!(call, Call::SetToken(..))));
    }

    #[tokio::test]
    async fn bots_edit_without_password() {
        let (http, state) = setup();
        http.respond("edit_profile", edited(true, Some("ignored")));
        let mut me = me(&state, true);

        me.edit(ProfileEdit::new().remove_avatar().email("ignored@example.com")).await.unwrap();

        let calls = http.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            Call::EditProfile(json!({ "password": null, "username": "me", "avatar": null }))
        );
    }

    #[tokio::test]
    async fn unsupported_avatars_are_refused() {
        let (http, state) = setup();
        let mut me = me(&state, true);

        let result = me.edit(ProfileEdit::new().avatar(b"not an image".to_vec())).await;

        assert!(matches!(result, Err(Error::Usage(_))));
        assert!(http.calls().is_empty());
    }

    #[tokio::test]
    async fn house_changes_go_first() {
        let (http, state) = setup();
        http.respond("edit_profile", edited(true, None));
        let mut me = me(&state, true);

        me.edit(ProfileEdit::new().house_id(3).unwrap()).await.unwrap();
        assert!(me.is_bot());
        me.edit(ProfileEdit::new().leave_house()).await.unwrap();

        let calls = http.calls();
        assert_eq!(calls[0], Call::ChangeHypeSquadHouse(HypeSquadHouse::Balance));
        assert!(matches!(calls[1], Call::EditProfile(_)));
        assert_eq!(calls[2], Call::LeaveHypeSquadHouse);

        assert!(matches!(ProfileEdit::new().house_id(7), Err(Error::Usage(_))));
    }

    #[test]
    fn payloads_of_other_users_are_ignored() {
        let (_, state) = setup();
        let mut me = me(&state, false);

        let other: ClientUserPayload = serde_json::from_value(json!({
            "id": "2", "username": "other", "discriminator": "0002", "avatar": null,
        }))
        .unwrap();

        assert!(!me.update(&other));
        assert_eq!(me.id(), Snowflake::new(1));
        assert_eq!(me.email(), Some("me@example.com"));
        assert!(me.verified());
    }

    #[tokio::test]
    async fn groups_need_two_recipients() {
        let (http, state) = setup();
        http.respond("start_group", json!({
            "id": "300",
            "type": 3,
            "owner_id": "1",
            "recipients": [
                { "id": "2", "username": "peer", "discriminator": "0002", "avatar": null },
                { "id": "3", "username": "peer", "discriminator": "0002", "avatar": null },
            ],
        }));
        let me = me(&state, false);

        let none: [User; 0] = [];
        assert!(matches!(me.create_group(&none).await, Err(Error::Usage(_))));
        assert!(matches!(me.create_group(&[peer(&state, 2)]).await, Err(Error::Usage(_))));
        assert!(http.calls().is_empty());

        let group = me.create_group(&[peer(&state, 2), peer(&state, 3)]).await.unwrap();

        assert_eq!(
            http.calls(),
            vec![Call::StartGroup(Snowflake::new(1), vec!["2".into(), "3".into()])]
        );
        assert_eq!(group.id(), Snowflake::new(300));
        assert_eq!(group.recipients().len(), 2);
        assert_eq!(group.owner(), Some(me.base()));
    }

    #[tokio::test]
    async fn settings_are_translated() {
        let (http, state) = setup();
        http.respond("edit_settings", json!({ "theme": "dark", "developer_mode": true }));
        let me = me(&state, false);

        let mut extra = serde_json::Map::new();
        extra.insert("native_phone_integration_enabled".into(), json!(false));

        let settings = me
            .edit_settings(SettingsEdit {
                friend_source_flags: Some(FriendFlags::GuildAndFriends),
                restricted_guilds: Some(vec![Snowflake::new(9)]),
                afk_timeout: Some(600),
                extra,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(settings["theme"], "dark");
        assert_eq!(
            http.calls(),
            vec![Call::EditSettings(json!({
                "friend_source_flags": { "mutual_guilds": true, "mutual_friends": true },
                "restricted_guilds": ["9"],
                "afk_timeout": 600,
                "native_phone_integration_enabled": false,
            }))]
        );
    }

    #[test]
    fn relationship_views() {
        let (_, state) = setup();
        for (id, kind) in [(2, 1), (3, 2), (4, 3), (5, 1)] {
            let relationship: RelationshipPayload = serde_json::from_value(json!({
                "id": id.to_string(),
                "type": kind,
                "user": { "id": id.to_string(), "username": "peer", "discriminator": "0002", "avatar": null },
            }))
            .unwrap();
            state.add_relationship(&relationship);
        }
        let me = me(&state, false);

        assert_eq!(me.relationships().len(), 4);
        assert_eq!(me.friends().len(), 2);
        assert_eq!(me.blocked().len(), 1);
        assert_eq!(me.blocked()[0].id(), Snowflake::new(3));
        assert!(me.relationship_for(Snowflake::new(4)).unwrap().kind.is_pending());
        assert!(me.relationship_for(Snowflake::new(6)).is_none());
    }
}
