use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tubely_core::AppError;
use uuid::Uuid;

use super::models::JwtClaims;

pub const TOKEN_ISSUER: &str = "tubely-access";

/// HS256 token validator.
#[derive(Clone)]
pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtValidator {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = 0;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Validate `token` and return the user id it was issued to.
    pub fn validate(&self, token: &str) -> Result<Uuid, AppError> {
        let data = decode::<JwtClaims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "JWT validation failed");
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::Unauthenticated("Token has expired".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                    AppError::Unauthenticated("Invalid token issuer".to_string())
                }
                _ => AppError::Unauthenticated("Couldn't validate JWT".to_string()),
            }
        })?;

        Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AppError::Unauthenticated("Invalid token subject".to_string()))
    }
}

/// Issue an HS256 access token for `user_id`.
pub fn make_jwt(user_id: Uuid, secret: &str, expires_in: Duration) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = JwtClaims {
        iss: TOKEN_ISSUER.to_string(),
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + expires_in).timestamp(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AppError> {
    let header =
        header.ok_or_else(|| AppError::Unauthenticated("Couldn't find JWT".to_string()))?;
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthenticated("Malformed authorization header".to_string()))
}
