use actix_web::HttpResponse;
use actix_web::ResponseError;
use actix_web::http::StatusCode;

#[derive(Debug)]
pub enum DonationError {
    NotFound,
    /// Caller is not the donor of the listing.
    Forbidden,
    /// Claim attempted on a listing that is no longer available.
    Unavailable,
    OwnDonation,
    /// Listing changed status between read and write.
    Conflict,
    Invalid(&'static str),
    /// Stored row that no longer maps onto the domain type.
    Corrupt(String),
    Storage(std::io::Error),
    #[cfg(feature = "database")]
    Database(tokio_postgres::Error),
}

impl std::fmt::Display for DonationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "Donation not found"),
            Self::Forbidden => write!(f, "Not enough permissions"),
            Self::Unavailable => write!(f, "Donation is not available for claiming"),
            Self::OwnDonation => write!(f, "Cannot claim your own donation"),
            Self::Conflict => write!(f, "Donation was modified concurrently, retry"),
            Self::Invalid(reason) => write!(f, "{}", reason),
            Self::Corrupt(reason) => write!(f, "corrupt donation row: {}", reason),
            Self::Storage(e) => write!(f, "object storage error: {}", e),
            #[cfg(feature = "database")]
            Self::Database(e) => write!(f, "database error: {}", e),
        }
    }
}

impl std::error::Error for DonationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage(e) => Some(e),
            #[cfg(feature = "database")]
            Self::Database(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DonationError {
    fn from(e: std::io::Error) -> Self {
        Self::Storage(e)
    }
}

#[cfg(feature = "database")]
impl From<tokio_postgres::Error> for DonationError {
    fn from(e: tokio_postgres::Error) -> Self {
        Self::Database(e)
    }
}

impl ResponseError for DonationError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Unavailable | Self::OwnDonation | Self::Invalid(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
    fn error_response(&self) -> HttpResponse {
        let detail = match self.status_code() {
            StatusCode::INTERNAL_SERVER_ERROR => {
                log::error!("{}", self);
                "internal server error".to_string()
            }
            _ => self.to_string(),
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "detail": detail }))
    }
}
