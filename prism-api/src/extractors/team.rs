//! Team identity extractor.
//!
//! The `x-team-id` header tags logs and spans. It never influences the
//! outcome of a conflict check.

use std::convert::Infallible;
use std::fmt;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// Header carrying the caller's team.
pub const TEAM_ID_HEADER: &str = "x-team-id";

/// Team used when the header is absent, empty or not valid UTF-8.
pub const DEFAULT_TEAM_ID: &str = "default-team";

/// Longest team id kept verbatim in logs.
const MAX_TEAM_ID_LEN: usize = 128;

/// Team identifier taken from the `x-team-id` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamId(pub String);

impl TeamId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_header(value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => TeamId(v.chars().take(MAX_TEAM_ID_LEN).collect()),
            None => TeamId(DEFAULT_TEAM_ID.to_string()),
        }
    }
}

impl Default for TeamId {
    fn default() -> Self {
        TeamId(DEFAULT_TEAM_ID.to_string())
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for TeamId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(TEAM_ID_HEADER)
            .and_then(|v| v.to_str().ok());
        Ok(TeamId::from_header(value))
    }
}
