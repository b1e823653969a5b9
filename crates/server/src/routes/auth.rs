use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use models::db::MongoStore;
use service::{
    auth::{
        domain::{Claims, IssuedToken, TokenRequest},
        errors::AuthError,
        TokenService,
    },
    booking::{repository::MongoBookingRepository, BookingService},
    catalog::{repository::MongoServiceRepository, CatalogService},
    storage::memory::{MemoryBookingRepository, MemoryServiceRepository},
};
use tracing::{info, warn};

use crate::errors::{JsonApiError, JsonBody};

/// Cookie carrying the issued token for browser clients.
pub const AUTH_COOKIE: &str = "auth_token";

/// Which booking routes sit behind the bearer gate.
#[derive(Debug, Clone, Copy)]
pub struct ServerAuthConfig {
    pub protect_booking_list: bool,
    pub protect_booking_writes: bool,
}

impl From<&configs::AuthConfig> for ServerAuthConfig {
    fn from(cfg: &configs::AuthConfig) -> Self {
        Self {
            protect_booking_list: cfg.protect_booking_list,
            protect_booking_writes: cfg.protect_booking_writes,
        }
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub catalog: CatalogService,
    pub bookings: BookingService,
    pub tokens: TokenService,
    pub auth: ServerAuthConfig,
}

impl ServerState {
    /// State backed by the MongoDB collections of `store`.
    pub fn from_store(store: &MongoStore, cfg: &configs::AuthConfig) -> Self {
        Self {
            catalog: CatalogService::new(Arc::new(MongoServiceRepository { store: store.clone() })),
            bookings: BookingService::new(Arc::new(MongoBookingRepository { store: store.clone() })),
            tokens: TokenService::new(&cfg.jwt_secret, cfg.token_ttl_secs),
            auth: ServerAuthConfig::from(cfg),
        }
    }

    /// State over empty in-memory collections.
    pub fn in_memory(jwt_secret: &str, token_ttl_secs: u64, auth: ServerAuthConfig) -> Self {
        Self {
            catalog: CatalogService::new(Arc::new(MemoryServiceRepository::default())),
            bookings: BookingService::new(Arc::new(MemoryBookingRepository::default())),
            tokens: TokenService::new(jwt_secret, token_ttl_secs),
            auth,
        }
    }
}

/// Claims of the caller, inserted by [`require_bearer_token`].
#[derive(Debug, Clone)]
pub struct VerifiedIdentity(pub Claims);

#[utoipa::path(
    post,
    path = "/token",
    tag = "auth",
    request_body = crate::openapi::TokenRequestDoc,
    responses(
        (status = 200, description = "Signed token; also set as the auth_token cookie", body = crate::openapi::IssuedTokenDoc),
        (status = 400, description = "Bad Request")
    )
)]
pub async fn issue_token(
    State(state): State<ServerState>,
    jar: CookieJar,
    JsonBody(request): JsonBody<TokenRequest>,
) -> Result<(CookieJar, Json<IssuedToken>), JsonApiError> {
    let email = request.email.clone();
    let token = state.tokens.issue(request)?;

    let mut cookie = Cookie::new(AUTH_COOKIE, token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    info!(%email, "token issued");
    Ok((jar.add(cookie), Json(IssuedToken { token })))
}

#[utoipa::path(post, path = "/logout", tag = "auth", responses((status = 204, description = "Cookie cleared")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let mut cookie = Cookie::from(AUTH_COOKIE);
    cookie.set_path("/");
    // sent even when the request carried no cookie
    cookie.make_removal();
    (jar.add(cookie), StatusCode::NO_CONTENT)
}

/// Bearer gate: verifies the presented token and exposes its claims as [`VerifiedIdentity`].
///
/// No credential is 401; a bad, expired or non-Bearer credential is 403.
pub async fn require_bearer_token(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_owned();
    let claims = presented_token(req.headers())
        .and_then(|token| state.tokens.verify(&token))
        .map_err(|e| {
            warn!(%path, code = e.code(), err = %e, "bearer check failed");
            JsonApiError::from(e)
        })?;
    req.extensions_mut().insert(VerifiedIdentity(claims));
    Ok(next.run(req).await)
}

/// `Authorization: Bearer <token>`, else the `auth_token` cookie.
fn presented_token(headers: &HeaderMap) -> Result<String, AuthError> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let raw = value
            .to_str()
            .map_err(|_| AuthError::Rejected("unreadable authorization header".into()))?;
        return raw
            .strip_prefix("Bearer ")
            .map(|token| token.trim().to_string())
            .ok_or_else(|| AuthError::Rejected("authorization scheme must be Bearer".into()));
    }
    CookieJar::from_headers(headers)
        .get(AUTH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(AuthError::MissingToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("auth_token=xyz"));
        assert_eq!(presented_token(&headers).unwrap(), "abc");
    }

    #[test]
    fn cookie_is_the_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; auth_token=xyz"));
        assert_eq!(presented_token(&headers).unwrap(), "xyz");
    }

    #[test]
    fn other_schemes_are_rejected_and_absence_is_missing() {
        let mut headers = HeaderMap::new();
        assert!(matches!(presented_token(&headers), Err(AuthError::MissingToken)));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
        assert!(matches!(presented_token(&headers), Err(AuthError::Rejected(_))));
    }
}
