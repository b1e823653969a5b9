use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use models::validation::validate_email;
use tracing::{debug, instrument};

use super::domain::{Claims, TokenRequest};
use super::errors::AuthError;

/// Registered claims the issuer owns; callers cannot smuggle their own values in.
const RESERVED_CLAIMS: [&str; 2] = ["iat", "exp"];

/// HS256 token issuer/verifier independent of web framework
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(i64::try_from(ttl_secs).unwrap_or(i64::MAX).min(i64::MAX / 1000)),
        }
    }

    /// Sign the payload with `exp = now + ttl`.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{TokenService, domain::TokenRequest};
    /// let svc = TokenService::new("secret", 3600);
    /// let token = svc.issue(TokenRequest::new("a@x.com")).unwrap();
    /// let claims = svc.verify(&token).unwrap();
    /// assert_eq!(claims.email, "a@x.com");
    /// assert_eq!(claims.exp - claims.iat, 3600);
    /// ```
    pub fn issue(&self, request: TokenRequest) -> Result<String, AuthError> {
        self.issue_at(request, Utc::now())
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    pub fn issue_at(&self, request: TokenRequest, now: DateTime<Utc>) -> Result<String, AuthError> {
        validate_email(&request.email).map_err(|e| AuthError::Validation(e.to_string()))?;
        let mut extra = request.extra;
        for key in RESERVED_CLAIMS {
            extra.remove(key);
        }
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::TokenError("token ttl out of range".into()))?;
        let claims = Claims {
            email: request.email.trim().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            extra,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenError(e.to_string()))?;
        debug!(exp = claims.exp, "token_issued");
        Ok(token)
    }

    /// Check signature and expiry; every failure is a rejected credential.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // caller extras may carry `aud`; no audience is configured
        validation.validate_aud = false;
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Rejected("token expired".into()),
                ErrorKind::InvalidSignature => AuthError::Rejected("invalid signature".into()),
                _ => AuthError::Rejected(e.to_string()),
            })
    }
}
