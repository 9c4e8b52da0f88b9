use actix_web::HttpResponse;
use actix_web::ResponseError;
use actix_web::http::StatusCode;
use actix_web::http::header;

/// Failures of the authentication subsystem.
///
/// Every credential or token failure collapses into a 401 with the same
/// body so callers learn nothing about which account exists.
#[derive(Debug)]
pub enum AuthError {
    /// Bad signature, malformed claims, or expiry not in the future.
    InvalidToken,
    /// No credential, an invalid token, or a subject that no longer exists.
    Unauthenticated,
    /// Unknown email or wrong password.
    InvalidCredentials,
    DuplicateEmail,
    /// Registration input rejected before touching storage.
    Invalid(&'static str),
    /// Only HMAC algorithms can sign with a shared secret.
    Unsupported(jsonwebtoken::Algorithm),
    Signing(jsonwebtoken::errors::Error),
    Hashing(argon2::password_hash::Error),
    #[cfg(feature = "database")]
    Database(tokio_postgres::Error),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidToken => write!(f, "invalid token"),
            Self::Unauthenticated => write!(f, "could not validate credentials"),
            Self::InvalidCredentials => write!(f, "invalid credentials"),
            Self::DuplicateEmail => write!(f, "email already registered"),
            Self::Invalid(reason) => write!(f, "{}", reason),
            Self::Unsupported(algorithm) => write!(f, "unsupported signing algorithm {:?}", algorithm),
            Self::Signing(e) => write!(f, "token signing failed: {}", e),
            Self::Hashing(e) => write!(f, "password hashing failed: {}", e),
            #[cfg(feature = "database")]
            Self::Database(e) => write!(f, "database error: {}", e),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Signing(e) => Some(e),
            #[cfg(feature = "database")]
            Self::Database(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "database")]
impl From<tokio_postgres::Error> for AuthError {
    fn from(e: tokio_postgres::Error) -> Self {
        Self::Database(e)
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidToken | Self::Unauthenticated | Self::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            Self::DuplicateEmail | Self::Invalid(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let detail = match status {
            StatusCode::INTERNAL_SERVER_ERROR => {
                log::error!("{}", self);
                "internal server error".to_string()
            }
            StatusCode::UNAUTHORIZED => match self {
                Self::InvalidCredentials => self.to_string(),
                _ => Self::Unauthenticated.to_string(),
            },
            _ => self.to_string(),
        };
        let mut response = HttpResponse::build(status);
        if status == StatusCode::UNAUTHORIZED {
            response.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }
        response.json(serde_json::json!({ "detail": detail }))
    }
}
