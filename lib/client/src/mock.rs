//! An in-memory [`Http`] recording every call, for the tests of the models

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use structures::channel::ChannelPayload;
use structures::flags::HypeSquadHouse;
use structures::message::Message;
use structures::profile::ProfilePayload;
use structures::relationship::RelationshipType;
use structures::settings::SettingsEdit;
use structures::snowflake::Snowflake;
use structures::user::{ClientUserPayload, EditProfilePayload, EditProfileResponse, UserPayload};
use crate::error::{ApiError, Error, Result};
use crate::http::Http;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetCurrentUser,
    EditProfile(Value),
    EditSettings(Value),
    StartGroup(Snowflake, Vec<String>),
    StartPrivateMessage(Snowflake),
    GetMutualFriends(Snowflake),
    GetUserProfile(Snowflake),
    AddRelationship(Snowflake, Option<RelationshipType>),
    RemoveRelationship(Snowflake),
    SendFriendRequest(String, String),
    ChangeHypeSquadHouse(HypeSquadHouse),
    LeaveHypeSquadHouse,
    SendMessage(Snowflake, String),
    SetToken(String, bool),
}

#[derive(Default)]
pub struct MockHttp {
    responses: Mutex<HashMap<&'static str, Value>>,
    forbidden: Mutex<HashSet<&'static str>>,
    calls: Mutex<Vec<Call>>,
}

impl MockHttp {
    /// Sets the body answered by `route`, named after the [`Http`] method
    pub fn respond(&self, route: &'static str, body: Value) {
        self.responses.lock().unwrap().insert(route, body);
    }

    /// Makes `route` fail with a 403
    pub fn forbid(&self, route: &'static str) {
        self.forbidden.lock().unwrap().insert(route);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, route: &'static str, call: Call) -> Result<()> {
        self.calls.lock().unwrap().push(call);

        if self.forbidden.lock().unwrap().contains(route) {
            return Err(ApiError { status: 403, code: 50001, message: "Missing Access".into() }.into_error());
        }
        Ok(())
    }

    fn answer<T: DeserializeOwned>(&self, route: &'static str, call: Call) -> Result<T> {
        self.record(route, call)?;

        let body = self.responses.lock().unwrap().get(route).cloned();
        match body {
            Some(body) => Ok(serde_json::from_value(body)?),
            None => Err(Error::Api(ApiError { status: 404, code: 0, message: format!("no response for {route}") })),
        }
    }
}

#[async_trait]
impl Http for MockHttp {
    async fn get_current_user(&self) -> Result<ClientUserPayload> {
        self.answer("get_current_user", Call::GetCurrentUser)
    }

    async fn edit_profile(&self, payload: &EditProfilePayload) -> Result<EditProfileResponse> {
        self.answer("edit_profile", Call::EditProfile(serde_json::to_value(payload)?))
    }

    async fn edit_settings(&self, settings: &SettingsEdit) -> Result<Value> {
        self.answer("edit_settings", Call::EditSettings(serde_json::to_value(settings)?))
    }

    async fn start_group(&self, user_id: Snowflake, recipients: Vec<String>) -> Result<ChannelPayload> {
        self.answer("start_group", Call::StartGroup(user_id, recipients))
    }

    async fn start_private_message(&self, user_id: Snowflake) -> Result<ChannelPayload> {
        self.answer("start_private_message", Call::StartPrivateMessage(user_id))
    }

    async fn get_mutual_friends(&self, user_id: Snowflake) -> Result<Vec<UserPayload>> {
        self.answer("get_mutual_friends", Call::GetMutualFriends(user_id))
    }

    async fn get_user_profile(&self, user_id: Snowflake) -> Result<ProfilePayload> {
        self.answer("get_user_profile", Call::GetUserProfile(user_id))
    }

    async fn add_relationship(&self, user_id: Snowflake, kind: Option<RelationshipType>) -> Result<()> {
        self.record("add_relationship", Call::AddRelationship(user_id, kind))
    }

    async fn remove_relationship(&self, user_id: Snowflake) -> Result<()> {
        self.record("remove_relationship", Call::RemoveRelationship(user_id))
    }

    async fn send_friend_request(&self, username: &str, discriminator: &str) -> Result<()> {
        self.record("send_friend_request", Call::SendFriendRequest(username.into(), discriminator.into()))
    }

    async fn change_hypesquad_house(&self, house: HypeSquadHouse) -> Result<()> {
        self.record("change_hypesquad_house", Call::ChangeHypeSquadHouse(house))
    }

    async fn leave_hypesquad_house(&self) -> Result<()> {
        self.record("leave_hypesquad_house", Call::LeaveHypeSquadHouse)
    }

    async fn send_message(&self, channel_id: Snowflake, content: &str) -> Result<Message> {
        self.answer("send_message", Call::SendMessage(channel_id, content.into()))
    }

    fn set_token(&self, token: String, bot: bool) -> Result<()> {
        self.record("set_token", Call::SetToken(token, bot))
    }
}
