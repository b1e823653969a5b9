pub mod auth;
pub mod bookings;
pub mod services;

use axum::{
    http::Method,
    middleware,
    routing::{delete, get, post, put, MethodRouter},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::LIVENESS_TEXT;

use crate::openapi::{ApiDoc, HealthResponse};
use auth::{require_bearer_token, ServerState};

/// Who may call a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Bearer,
}

/// One entry of the route policy table.
pub struct RouteDef {
    pub method: Method,
    pub path: &'static str,
    pub access: Access,
    pub handler: MethodRouter<ServerState>,
}

impl RouteDef {
    fn new(method: Method, path: &'static str, access: Access, handler: MethodRouter<ServerState>) -> Self {
        Self { method, path, access, handler }
    }
}

fn gate(enabled: bool) -> Access {
    if enabled { Access::Bearer } else { Access::Public }
}

/// Every application route with its access level, resolved against the configured gating flags.
pub fn route_table(state: &ServerState) -> Vec<RouteDef> {
    let list = gate(state.auth.protect_booking_list);
    let writes = gate(state.auth.protect_booking_writes);
    vec![
        RouteDef::new(Method::GET, "/", Access::Public, get(root)),
        RouteDef::new(Method::GET, "/health", Access::Public, get(health)),
        RouteDef::new(Method::POST, "/token", Access::Public, post(auth::issue_token)),
        RouteDef::new(Method::POST, "/logout", Access::Public, post(auth::logout)),
        RouteDef::new(Method::GET, "/services", Access::Public, get(services::list_services)),
        RouteDef::new(Method::POST, "/services", Access::Public, post(services::create_service)),
        RouteDef::new(Method::POST, "/services/", Access::Public, post(services::create_service)),
        RouteDef::new(Method::GET, "/services/:id", Access::Public, get(services::get_service)),
        RouteDef::new(Method::GET, "/bookings", list, get(bookings::list_bookings)),
        RouteDef::new(Method::POST, "/bookings", writes, post(bookings::create_booking)),
        RouteDef::new(Method::PUT, "/bookings/:id", writes, put(bookings::update_booking_status)),
        RouteDef::new(Method::DELETE, "/bookings/:id", writes, delete(bookings::delete_booking)),
    ]
}

/// `(method, path, access)` view of the table, for startup logging and tests.
pub fn policy(state: &ServerState) -> Vec<(Method, &'static str, Access)> {
    route_table(state).into_iter().map(|r| (r.method, r.path, r.access)).collect()
}

pub async fn root() -> &'static str {
    LIVENESS_TEXT
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = HealthResponse)))]
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Build the full application router from the route table.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let mut app: Router<ServerState> = Router::new();
    for route in route_table(&state) {
        let handler = match route.access {
            Access::Public => route.handler,
            Access::Bearer => route
                .handler
                .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer_token)),
        };
        app = app.route(route.path, handler);
    }

    app.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::ServerAuthConfig;

    fn state(list: bool, writes: bool) -> ServerState {
        ServerState::in_memory(
            "test-secret",
            3600,
            ServerAuthConfig { protect_booking_list: list, protect_booking_writes: writes },
        )
    }

    fn gated(state: &ServerState) -> Vec<(Method, &'static str)> {
        policy(state)
            .into_iter()
            .filter(|(_, _, access)| *access == Access::Bearer)
            .map(|(m, p, _)| (m, p))
            .collect()
    }

    #[test]
    fn by_default_only_the_booking_list_is_gated() {
        assert_eq!(gated(&state(true, false)), vec![(Method::GET, "/bookings")]);
    }

    #[test]
    fn write_gating_covers_every_booking_mutation() {
        let gated = gated(&state(true, true));
        assert_eq!(gated.len(), 4);
        assert!(gated.contains(&(Method::POST, "/bookings")));
        assert!(gated.contains(&(Method::PUT, "/bookings/:id")));
        assert!(gated.contains(&(Method::DELETE, "/bookings/:id")));
    }

    #[test]
    fn list_gating_can_be_disabled() {
        assert!(gated(&state(false, false)).is_empty());
    }
}
