use std::fmt::{self, Display, Formatter};
use serde::{Deserialize, Serialize};

/// A 24-bit RGB colour
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
#[serde(transparent)]
pub struct Colour(u32);

pub type Color = Colour;

impl Colour {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn b(self) -> u8 {
        self.0 as u8
    }
}

impl From<u32> for Colour {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl Display for Colour {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}
