use std::fmt::{self, Display, Formatter};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use crate::snowflake::Snowflake;

pub const CDN_URL: &str = "https://cdn.discordapp.com";

/// The avatars handed out to accounts without a custom one
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DefaultAvatar {
    Blurple = 0,
    Grey = 1,
    Green = 2,
    Orange = 3,
    Red = 4,
}

impl DefaultAvatar {
    pub const ALL: [DefaultAvatar; 5] = [Self::Blurple, Self::Grey, Self::Green, Self::Orange, Self::Red];

    /// Picks the variant a discriminator maps to
    pub fn from_discriminator(discriminator: &str) -> Self {
        let value = discriminator.parse::<u64>().unwrap_or(0);
        Self::ALL[(value % Self::ALL.len() as u64) as usize]
    }
}

/// A reference to an image hosted on the CDN
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct Asset {
    url: String,
    key: String,
    animated: bool,
}

impl Asset {
    pub fn from_default_avatar(avatar: DefaultAvatar) -> Self {
        let index = avatar as u8;
        Self {
            url: format!("{CDN_URL}/embed/avatars/{index}.png"),
            key: index.to_string(),
            animated: false,
        }
    }

    pub fn from_avatar(user_id: Snowflake, hash: &str) -> Self {
        let animated = hash.starts_with("a_");
        let format = if animated { "gif" } else { "png" };
        Self {
            url: format!("{CDN_URL}/avatars/{user_id}/{hash}.{format}?size=1024"),
            key: hash.to_string(),
            animated,
        }
    }

    pub fn from_user_banner(user_id: Snowflake, hash: &str) -> Self {
        let animated = hash.starts_with("a_");
        let format = if animated { "gif" } else { "png" };
        Self {
            url: format!("{CDN_URL}/banners/{user_id}/{hash}.{format}?size=512"),
            key: hash.to_string(),
            animated,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The hash of the asset, or the default avatar index
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_animated(&self) -> bool {
        self.animated
    }
}

impl Display for Asset {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Encodes an image as a `data:` URI, as expected by the image fields of the API.
///
/// Only PNG, JPEG, GIF and WebP are accepted, `None` is returned for anything else.
pub fn image_data_uri(bytes: &[u8]) -> Option<String> {
    let mime = if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        "image/png"
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        "image/gif"
    } else if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        return None;
    };

    Some(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}
