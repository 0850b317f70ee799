use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags::bitflags! {
    /// Flags attached to an account
    ///
    /// See the [documentation](https://discord.com/developers/docs/resources/user#user-object-user-flags)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct UserFlags: u64 {
        const STAFF = 1 << 0;
        const PARTNER = 1 << 1;
        const HYPESQUAD = 1 << 2;
        const BUG_HUNTER = 1 << 3;
        const MFA_SMS = 1 << 4;
        const PREMIUM_PROMO_DISMISSED = 1 << 5;
        const HYPESQUAD_BRAVERY = 1 << 6;
        const HYPESQUAD_BRILLIANCE = 1 << 7;
        const HYPESQUAD_BALANCE = 1 << 8;
        const EARLY_SUPPORTER = 1 << 9;
        const TEAM_USER = 1 << 10;
        const SYSTEM = 1 << 12;
        const HAS_UNREAD_URGENT_MESSAGES = 1 << 13;
        const BUG_HUNTER_LEVEL_2 = 1 << 14;
        const VERIFIED_BOT = 1 << 16;
        const VERIFIED_BOT_DEVELOPER = 1 << 17;
        const DISCORD_CERTIFIED_MODERATOR = 1 << 18;
    }
}

// Unknown bits are kept so that a payload survives a round trip untouched.
impl Serialize for UserFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for UserFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Self::from_bits_retain)
    }
}

/// The HypeSquad houses an account can join
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum HypeSquadHouse {
    Bravery = 1,
    Brilliance = 2,
    Balance = 3,
}

impl HypeSquadHouse {
    pub const ALL: [HypeSquadHouse; 3] = [Self::Bravery, Self::Brilliance, Self::Balance];

    /// The flag set on accounts belonging to this house
    pub const fn flag(self) -> UserFlags {
        match self {
            Self::Bravery => UserFlags::HYPESQUAD_BRAVERY,
            Self::Brilliance => UserFlags::HYPESQUAD_BRILLIANCE,
            Self::Balance => UserFlags::HYPESQUAD_BALANCE,
        }
    }
}

/// A house ID outside of the known houses
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UnknownHouse(pub u8);

impl std::fmt::Display for UnknownHouse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} is not a HypeSquad house", self.0)
    }
}

impl std::error::Error for UnknownHouse {}

impl TryFrom<u8> for HypeSquadHouse {
    type Error = UnknownHouse;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Bravery),
            2 => Ok(Self::Brilliance),
            3 => Ok(Self::Balance),
            other => Err(UnknownHouse(other)),
        }
    }
}

impl From<HypeSquadHouse> for u8 {
    fn from(house: HypeSquadHouse) -> Self {
        house as u8
    }
}
