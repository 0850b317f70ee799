pub mod cache;
pub mod channel;
pub mod client;
pub mod client_user;
pub mod config;
pub mod error;
pub mod http;
pub mod profile;
pub mod user;
#[cfg(test)]
mod mock;

pub use error::{ApiError, Error, Result};

pub mod structures {
    pub use structures::*;
}


pub const API_URL: &str = "https://discord.com/api/v10";
pub const LIB_NAME: &str = "IrisClient.rs";
