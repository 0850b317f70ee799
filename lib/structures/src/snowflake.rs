use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The first second of 2015, in milliseconds since the Unix epoch.
///
/// Every Snowflake timestamp is an offset from this instant.
pub const DISCORD_EPOCH: u64 = 1_420_070_400_000;

/// A Discord ID
///
/// The 42 high bits hold the creation timestamp, in milliseconds since [`DISCORD_EPOCH`].
///
/// On the wire it is carried as a string, because JSON numbers cannot represent it safely.
/// Integers are still accepted when deserializing.
#[derive(Clone, Copy, Debug, Default, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct Snowflake(u64);

impl Snowflake {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// Milliseconds since the Unix epoch at which this ID was generated
    pub const fn timestamp_millis(self) -> u64 {
        (self.0 >> 22) + DISCORD_EPOCH
    }

    /// The UTC instant at which this ID was generated
    pub fn created_at(self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp_millis() as i64).unwrap_or_default()
    }
}

impl From<u64> for Snowflake {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<Snowflake> for u64 {
    fn from(id: Snowflake) -> Self {
        id.0
    }
}

impl FromStr for Snowflake {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl Display for Snowflake {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for Snowflake {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s.parse().map_err(D::Error::custom),
            Raw::Number(n) => Ok(Self(n)),
        }
    }
}

/// Anything that is addressed by a [`Snowflake`].
pub trait Identifiable {
    fn id(&self) -> Snowflake;
}

impl Identifiable for Snowflake {
    fn id(&self) -> Snowflake {
        *self
    }
}

impl<T: Identifiable + ?Sized> Identifiable for &T {
    fn id(&self) -> Snowflake {
        (**self).id()
    }
}
