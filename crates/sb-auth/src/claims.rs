use super::*;
use sb_core::ID;
use std::time::Duration;

/// JWT payload. Access and refresh tokens share this shape and differ
/// only in lifetime.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    pub sub: uuid::Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(subject: ID<Member>, now: i64, ttl: Duration) -> Self {
        Self {
            sub: subject.inner(),
            iat: now,
            exp: now.saturating_add(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)),
        }
    }
    /// A token is live only while its expiry is strictly in the future.
    pub fn expired(&self, now: i64) -> bool {
        self.exp <= now
    }
    pub fn user(&self) -> ID<Member> {
        ID::from(self.sub)
    }
}
