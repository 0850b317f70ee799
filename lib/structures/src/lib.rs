//! Payloads and value types of the Discord API, without any I/O.

pub mod asset;
pub mod channel;
pub mod colour;
pub mod flags;
pub mod guild;
pub mod message;
pub mod profile;
pub mod relationship;
pub mod settings;
pub mod snowflake;
pub mod user;
