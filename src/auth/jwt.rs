use std::collections::HashSet;
use std::time::Duration;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, error, warn};

use crate::auth::claims::TokenPayload;
use crate::error::{AppError, AppResult};
use crate::users::repo_types::User;

/// Lifetime of a session token. There is no refresh.
pub const TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// HMAC signing and verification keys, built once from the configured secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: TOKEN_TTL,
        }
    }

    /// Claims for `user`, expiring `TOKEN_TTL` from now.
    pub fn claims_for(&self, user: &User) -> TokenPayload {
        let exp = OffsetDateTime::now_utc() + TimeDuration::seconds(self.ttl.as_secs() as i64);
        TokenPayload {
            user_id: user.id,
            email: user.email.clone(),
            role: user.primary_role().to_string(),
            exp: exp.unix_timestamp(),
        }
    }

    pub fn sign(&self, claims: &TokenPayload) -> AppResult<String> {
        let token = encode(&Header::new(Algorithm::HS256), claims, &self.encoding).map_err(|e| {
            error!(error = %e, "jwt sign failed");
            AppError::internal(format!("error signing token: {e}"))
        })?;
        debug!(user_id = %claims.user_id, "jwt signed");
        Ok(token)
    }

    /// Signature, algorithm and structure only; `exp` is left to the caller.
    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();
        validation
    }

    pub fn parse(&self, token: &str) -> AppResult<TokenPayload> {
        let data = decode::<TokenPayload>(token, &self.decoding, &Self::validation()).map_err(
            |e| {
                warn!(error = %e, "jwt rejected");
                AppError::InvalidToken(e.to_string())
            },
        )?;
        debug!(user_id = %data.claims.user_id, "jwt verified");
        Ok(data.claims)
    }

    #[cfg(test)]
    pub fn validate(&self, token: &str) -> bool {
        self.parse(token).is_ok()
    }
}
