use axum::{
    extract::{Path, State},
    Json,
};
use models::{InsertAck, Service, ServiceInput, ServiceSummary};
use tracing::info;

use super::auth::ServerState;
use crate::errors::{JsonApiError, JsonBody};

#[utoipa::path(
    get,
    path = "/services",
    tag = "services",
    responses((status = 200, description = "Every catalog entry", body = [crate::openapi::ServiceDoc]))
)]
pub async fn list_services(State(state): State<ServerState>) -> Result<Json<Vec<Service>>, JsonApiError> {
    let list = state.catalog.list_services().await?;
    info!(count = list.len(), "list services");
    Ok(Json(list))
}

#[utoipa::path(
    get,
    path = "/services/{id}",
    tag = "services",
    params(("id" = String, Path, description = "24-char hex id")),
    responses(
        (status = 200, description = "Projected entry", body = crate::openapi::ServiceSummaryDoc),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_service(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ServiceSummary>, JsonApiError> {
    Ok(Json(state.catalog.get_service(&id).await?))
}

#[utoipa::path(
    post,
    path = "/services",
    tag = "services",
    request_body = crate::openapi::ServiceInputDoc,
    responses(
        (status = 200, description = "Inserted", body = crate::openapi::InsertAckDoc),
        (status = 400, description = "Bad Request")
    )
)]
pub async fn create_service(
    State(state): State<ServerState>,
    JsonBody(input): JsonBody<ServiceInput>,
) -> Result<Json<InsertAck>, JsonApiError> {
    Ok(Json(state.catalog.create_service(input).await?))
}
