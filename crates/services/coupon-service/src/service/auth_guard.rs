//! Authorization guard - bearer token verification and issuance.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use common::{AppError, AppResult, JwtConfig};
use domain::{Account, Role, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};

/// JWT claims payload.
///
/// Decoding fails unless every field is present and `role` is a known role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account email
    pub sub: String,
    pub username: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 21600)]
    pub expires_in: i64,
}

/// Authorization guard trait for dependency injection.
pub trait AuthGuard: Send + Sync {
    /// Verify a bearer credential and return its claims.
    ///
    /// `None` or a blank credential yields `MissingCredential`.
    fn authenticate(&self, credential: Option<&str>) -> AppResult<Claims>;

    /// Sign a token for an account.
    fn issue(&self, account: &Account) -> AppResult<TokenResponse>;
}

/// Require the caller to hold `role`.
pub fn require_role(claims: &Claims, role: Role) -> AppResult<()> {
    if claims.role == role {
        Ok(())
    } else {
        tracing::warn!(subject = %claims.sub, actual = %claims.role, required = %role, "Role check failed");
        Err(AppError::wrong_role(role))
    }
}

/// HS256 implementation of AuthGuard with an injected secret.
pub struct JwtGuard {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtGuard {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret_bytes()),
            validation,
            config,
        }
    }

    /// Sign arbitrary claims. Used by `issue` and by tests that need odd tokens.
    pub fn sign(&self, claims: &Claims) -> AppResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Token signing failed: {}", e)))
    }
}

impl AuthGuard for JwtGuard {
    fn authenticate(&self, credential: Option<&str>) -> AppResult<Claims> {
        let token = credential
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AppError::MissingCredential)?;

        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => {
                    tracing::debug!("Rejected token: {}", e);
                    AppError::InvalidCredential
                }
            })
    }

    fn issue(&self, account: &Account) -> AppResult<TokenResponse> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.config.expiration_hours);

        let claims = Claims {
            sub: account.email.clone(),
            username: account.username.clone(),
            role: account.role(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        Ok(TokenResponse {
            access_token: self.sign(&claims)?,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.config.expiration_hours * SECONDS_PER_HOUR,
        })
    }
}
