use super::*;
use actix_web::cookie::Cookie;
use actix_web::cookie::SameSite;
use sb_core::ID;
use std::time::Duration;

pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";
/// Browsers send the refresh cookie to this path only.
pub const REFRESH_PATH: &str = "/auth/refresh";

/// Freshly minted access and refresh tokens for one subject.
#[derive(Debug, Clone)]
pub struct Pair {
    pub access: String,
    pub refresh: String,
}

/// Mints token pairs and the cookies that carry them.
#[derive(Debug, Clone)]
pub struct Issuer {
    access: Duration,
    refresh: Duration,
    secure: bool,
    domain: Option<String>,
}

impl Issuer {
    pub fn new(access: Duration, refresh: Duration) -> Self {
        Self {
            access,
            refresh,
            secure: false,
            domain: None,
        }
    }
    pub fn secure(self, secure: bool) -> Self {
        Self { secure, ..self }
    }
    pub fn domain(self, domain: Option<String>) -> Self {
        Self { domain, ..self }
    }
    pub fn access_ttl(&self) -> Duration {
        self.access
    }
    pub fn refresh_ttl(&self) -> Duration {
        self.refresh
    }

    pub fn issue(&self, codec: &Codec, subject: ID<Member>) -> Result<Pair, AuthError> {
        Ok(Pair {
            access: codec.encode(subject, self.access)?,
            refresh: codec.encode(subject, self.refresh)?,
        })
    }

    /// Access cookie on `/`, refresh cookie on [`REFRESH_PATH`], each living
    /// exactly as long as its token.
    pub fn cookies(&self, pair: Pair) -> [Cookie<'static>; 2] {
        [
            self.cookie(ACCESS_COOKIE, pair.access, "/", self.access),
            self.cookie(REFRESH_COOKIE, pair.refresh, REFRESH_PATH, self.refresh),
        ]
    }

    /// Expired twins of [`Issuer::cookies`]; name, path and domain must match
    /// for the browser to drop them.
    pub fn removals(&self) -> [Cookie<'static>; 2] {
        [
            (ACCESS_COOKIE, "/", self.access),
            (REFRESH_COOKIE, REFRESH_PATH, self.refresh),
        ]
        .map(|(name, path, ttl)| {
            let mut cookie = self.cookie(name, String::new(), path, ttl);
            cookie.make_removal();
            cookie
        })
    }

    fn cookie(&self, name: &'static str, value: String, path: &'static str, ttl: Duration) -> Cookie<'static> {
        let mut cookie = Cookie::build(name, value)
            .path(path)
            .max_age(actix_web::cookie::time::Duration::seconds(
                i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX),
            ))
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .finish();
        if let Some(ref domain) = self.domain {
            cookie.set_domain(domain.clone());
        }
        cookie
    }
}
