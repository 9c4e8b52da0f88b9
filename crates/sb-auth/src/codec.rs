use super::*;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use sb_core::ID;
use std::sync::Arc;
use std::time::Duration;

/// Signs and verifies expiring JWTs with a shared HMAC secret.
///
/// This is the only place a token is trusted: a token decodes only if its
/// signature matches and its `exp` is ahead of the codec's clock. No other
/// registered claim is checked.
pub struct Codec {
    header: Header,
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl Codec {
    pub fn new(secret: &[u8], algorithm: Algorithm, clock: Arc<dyn Clock>) -> Result<Self, AuthError> {
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(AuthError::Unsupported(algorithm));
        }
        let mut validation = Validation::new(algorithm);
        // expiry is checked against our clock, with no leeway
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Ok(Self {
            header: Header::new(algorithm),
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            clock,
        })
    }
    pub fn now(&self) -> i64 {
        self.clock.now()
    }
    pub fn encode(&self, subject: ID<Member>, ttl: Duration) -> Result<String, AuthError> {
        let claims = Claims::new(subject, self.now(), ttl);
        jsonwebtoken::encode(&self.header, &claims, &self.encoding).map_err(AuthError::Signing)
    }
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .inspect_err(|e| log::debug!("rejected token: {}", e))
            .map_err(|_| AuthError::InvalidToken)?;
        match claims.expired(self.now()) {
            true => Err(AuthError::InvalidToken),
            false => Ok(claims),
        }
    }
}
