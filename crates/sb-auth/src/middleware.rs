use super::*;
use actix_web::FromRequest;
use actix_web::HttpRequest;
use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::web;
use sb_core::ID;
use sb_core::Unique;
use std::future::Future;
use std::pin::Pin;

/// Extractor for authenticated requests.
///
/// Runs [`resolve`] before the handler body, so a handler taking `Auth`
/// never executes for an anonymous caller.
pub struct Auth(pub Member);

impl Auth {
    pub fn member(&self) -> &Member {
        &self.0
    }
    pub fn user(&self) -> ID<Member> {
        self.0.id()
    }
}

/// Recovers the calling member from its credentials.
///
/// The cookie token wins over the bearer token when both are present. A
/// token that fails to decode, names no known member, or names a
/// deactivated member is treated the same as no token at all.
pub async fn resolve(
    codec: &Codec,
    users: &dyn Users,
    cookie: Option<&str>,
    bearer: Option<&str>,
) -> Result<Member, AuthError> {
    let token = cookie
        .filter(|t| !t.is_empty())
        .or(bearer.filter(|t| !t.is_empty()))
        .ok_or(AuthError::Unauthenticated)?;
    let claims = codec
        .decode(token)
        .map_err(|_| AuthError::Unauthenticated)?;
    users
        .find(claims.user())
        .await?
        .filter(Member::active)
        .ok_or(AuthError::Unauthenticated)
}

/// Token from an `Authorization: Bearer <token>` header, scheme matched
/// case-insensitively.
pub fn bearer(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.trim().split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim().to_owned())
}

impl FromRequest for Auth {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let codec = req.app_data::<web::Data<Codec>>().cloned();
        let users = req.app_data::<web::Data<dyn Users>>().cloned();
        let cookie = req.cookie(ACCESS_COOKIE).map(|c| c.value().to_owned());
        let bearer = bearer(req);
        Box::pin(async move {
            let codec = codec.ok_or_else(|| {
                actix_web::error::ErrorInternalServerError("token codec not configured")
            })?;
            let users = users.ok_or_else(|| {
                actix_web::error::ErrorInternalServerError("user repository not configured")
            })?;
            resolve(&codec, users.get_ref(), cookie.as_deref(), bearer.as_deref())
                .await
                .map(Auth)
                .map_err(actix_web::Error::from)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use std::sync::Arc;
    use std::time::Duration;

    const TTL: Duration = Duration::from_secs(900);

    struct Fixture {
        clock: ManualClock,
        codec: Codec,
        users: MemoryUsers,
    }

    impl Fixture {
        fn new() -> Self {
            let clock = ManualClock::default();
            let codec =
                Codec::new(b"s3cret", jsonwebtoken::Algorithm::HS256, Arc::new(clock.clone()))
                    .unwrap();
            Self {
                clock,
                codec,
                users: MemoryUsers::default(),
            }
        }
        async fn member(&self, email: &str) -> (Member, String) {
            let member = credentials::create(&self.users, email, "pw123").await.unwrap();
            let token = self.codec.encode(member.id(), TTL).unwrap();
            (member, token)
        }
        async fn resolve(&self, cookie: Option<&str>, bearer: Option<&str>) -> Result<Member, AuthError> {
            resolve(&self.codec, &self.users, cookie, bearer).await
        }
    }

    #[actix_web::test]
    async fn no_credentials_is_unauthenticated() {
        let fixture = Fixture::new();
        assert!(matches!(
            fixture.resolve(None, None).await,
            Err(AuthError::Unauthenticated)
        ));
    }

    #[actix_web::test]
    async fn cookie_wins_over_header() {
        let fixture = Fixture::new();
        let (alice, cookie) = fixture.member("alice@example.com").await;
        let (bob, header) = fixture.member("bob@example.com").await;
        let resolved = fixture.resolve(Some(&cookie), Some(&header)).await.unwrap();
        assert_eq!(resolved, alice);
        let resolved = fixture.resolve(None, Some(&header)).await.unwrap();
        assert_eq!(resolved, bob);
    }

    #[actix_web::test]
    async fn empty_cookie_falls_back_to_header() {
        let fixture = Fixture::new();
        let (bob, header) = fixture.member("bob@example.com").await;
        assert_eq!(fixture.resolve(Some(""), Some(&header)).await.unwrap(), bob);
    }

    #[actix_web::test]
    async fn invalid_token_is_unauthenticated() {
        let fixture = Fixture::new();
        let (_, token) = fixture.member("alice@example.com").await;
        assert!(matches!(
            fixture.resolve(Some("garbage"), None).await,
            Err(AuthError::Unauthenticated)
        ));
        fixture.clock.advance(TTL);
        assert!(matches!(
            fixture.resolve(Some(&token), None).await,
            Err(AuthError::Unauthenticated)
        ));
    }

    #[actix_web::test]
    async fn vanished_member_is_unauthenticated() {
        let fixture = Fixture::new();
        let (alice, token) = fixture.member("alice@example.com").await;
        fixture.users.remove(alice.id());
        assert!(matches!(
            fixture.resolve(Some(&token), None).await,
            Err(AuthError::Unauthenticated)
        ));
    }

    #[actix_web::test]
    async fn deactivated_member_is_unauthenticated() {
        let fixture = Fixture::new();
        let (alice, token) = fixture.member("alice@example.com").await;
        fixture.users.update(&alice.deactivate()).await.unwrap();
        assert!(matches!(
            fixture.resolve(Some(&token), None).await,
            Err(AuthError::Unauthenticated)
        ));
    }

    #[test]
    fn bearer_header_parsing() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer(&req).as_deref(), Some("abc.def.ghi"));
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwdw=="))
            .to_http_request();
        assert_eq!(bearer(&req), None);
        assert_eq!(bearer(&TestRequest::default().to_http_request()), None);
    }
}
