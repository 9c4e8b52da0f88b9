#![allow(dead_code)]

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::test;
use sb_auth::Codec;
use sb_auth::Issuer;
use sb_auth::ManualClock;
use sb_auth::MemoryUsers;
use sb_donations::LocalStore;
use sb_donations::MemoryDonations;
use sb_server::Backend;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub const SECRET: &[u8] = b"test_secret";
pub const ACCESS: Duration = Duration::from_secs(15 * 60);
pub const REFRESH: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// In-memory backend driven by a hand-advanced clock.
pub struct Harness {
    pub clock: ManualClock,
    pub users: Arc<MemoryUsers>,
    pub donations: Arc<MemoryDonations>,
    pub storage: tempfile::TempDir,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            clock: ManualClock::at(1_760_000_000),
            users: Arc::new(MemoryUsers::default()),
            donations: Arc::new(MemoryDonations::default()),
            storage: tempfile::tempdir().unwrap(),
        }
    }

    pub fn backend(&self) -> Backend {
        Backend::new(
            Codec::new(SECRET, jsonwebtoken::Algorithm::HS256, Arc::new(self.clock.clone())).unwrap(),
            Issuer::new(ACCESS, REFRESH),
            self.users.clone(),
            self.donations.clone(),
            Arc::new(LocalStore::new(self.storage.path(), "food-images")),
        )
    }
}

/// Cookies set by a response, keyed by name.
pub fn cookies<B>(res: &ServiceResponse<B>) -> HashMap<String, Cookie<'static>> {
    res.response()
        .cookies()
        .map(|c| (c.name().to_string(), c.into_owned()))
        .collect()
}

pub async fn json<B>(res: ServiceResponse<B>) -> serde_json::Value
where
    B: actix_web::body::MessageBody,
{
    test::read_body_json(res).await
}
