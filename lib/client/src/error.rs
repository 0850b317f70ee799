use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while talking to the API
#[derive(Debug, Error)]
pub enum Error {
    /// The call was refused locally because one of its preconditions wasn't met.
    /// Nothing was sent.
    #[error("{0}")]
    Usage(String),
    /// The API refused to do this for the current account
    #[error("forbidden: {0}")]
    Forbidden(ApiError),
    /// Any other non-success answer
    #[error("{0}")]
    Api(ApiError),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// A payload lacked a mandatory field or had an invalid one
    #[error("missing data: {0}")]
    MissingData(#[from] serde_json::Error),
    #[error("the token cannot be used in a header: {0}")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),
}

impl Error {
    pub(crate) fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }
}

impl From<structures::flags::UnknownHouse> for Error {
    fn from(value: structures::flags::UnknownHouse) -> Self {
        Self::Usage(value.to_string())
    }
}

/// The error body sent back by the API, along with the HTTP status
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ApiError {
    #[serde(skip)]
    pub status: u16,
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (status {}, code {})", self.message, self.status, self.code)
    }
}

impl ApiError {
    /// Sorts a failed answer into `Forbidden` or `Api`
    pub fn into_error(self) -> Error {
        match self.status {
            401 | 403 => Error::Forbidden(self),
            _ => Error::Api(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_api_errors_by_status() {
        let denied = ApiError { status: 403, code: 50007, message: "Cannot send messages to this user".into() };
        assert!(matches!(denied.into_error(), Error::Forbidden(_)));

        let missing = ApiError { status: 404, code: 10013, message: "Unknown User".into() };
        assert!(matches!(missing.clone().into_error(), Error::Api(e) if e == missing));
    }
}
