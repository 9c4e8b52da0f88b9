use super::*;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::web;
use sb_core::Unique;

pub async fn register(
    users: web::Data<dyn Users>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AuthError> {
    let member = credentials::create(users.get_ref(), &req.email, &req.password).await?;
    Ok(HttpResponse::Ok().json(UserInfo::from(&member)))
}

pub async fn login(
    users: web::Data<dyn Users>,
    codec: web::Data<Codec>,
    issuer: web::Data<Issuer>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, AuthError> {
    let member = credentials::verify(users.get_ref(), &req.email, &req.password)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;
    let pair = issuer.issue(&codec, member.id())?;
    log::info!("member {} logged in", member.id());
    Ok(with_cookies(issuer.cookies(pair), Status::ok("Logged in successfully")))
}

pub async fn me(auth: Auth) -> HttpResponse {
    HttpResponse::Ok().json(UserInfo::from(auth.member()))
}

/// Trades a live refresh cookie for a new pair bound to the same subject.
/// Only the refresh cookie is accepted here, never a bearer header, and the
/// subject is not looked up again.
pub async fn refresh(
    codec: web::Data<Codec>,
    issuer: web::Data<Issuer>,
    req: HttpRequest,
) -> Result<HttpResponse, AuthError> {
    let claims = req
        .cookie(REFRESH_COOKIE)
        .ok_or(AuthError::Unauthenticated)
        .and_then(|cookie| codec.decode(cookie.value()))?;
    let pair = issuer.issue(&codec, claims.user())?;
    log::debug!("refreshed tokens for member {}", claims.user());
    Ok(with_cookies(issuer.cookies(pair), Status::ok("Token refreshed successfully")))
}

pub async fn logout(issuer: web::Data<Issuer>) -> HttpResponse {
    with_cookies(issuer.removals(), Status::ok("Logged out successfully"))
}

fn with_cookies(cookies: [actix_web::cookie::Cookie<'static>; 2], status: Status) -> HttpResponse {
    let mut response = HttpResponse::Ok();
    for cookie in cookies {
        response.cookie(cookie);
    }
    response.json(status)
}
