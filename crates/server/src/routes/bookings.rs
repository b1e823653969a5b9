use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use models::{Booking, BookingInput, DeleteAck, InsertAck, StatusUpdate, UpdateAck};
use serde::Deserialize;
use tracing::info;

use super::auth::{ServerState, VerifiedIdentity};
use crate::errors::{JsonApiError, JsonBody};

#[derive(Debug, Deserialize)]
pub struct BookingQuery {
    pub email: Option<String>,
}

#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    params(("email" = Option<String>, Query, description = "Owner email; must match the token when gated")),
    responses(
        (status = 200, description = "Bookings of that email", body = [crate::openapi::BookingDoc]),
        (status = 401, description = "No token presented"),
        (status = 403, description = "Token rejected or email of another identity")
    ),
    security(("bearer" = []))
)]
pub async fn list_bookings(
    State(state): State<ServerState>,
    identity: Option<Extension<VerifiedIdentity>>,
    Query(q): Query<BookingQuery>,
) -> Result<Json<Vec<Booking>>, JsonApiError> {
    let verified = identity.as_ref().map(|Extension(VerifiedIdentity(claims))| claims.email.as_str());
    let list = state.bookings.list_bookings(q.email.as_deref(), verified).await?;
    info!(count = list.len(), "list bookings");
    Ok(Json(list))
}

#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    request_body = crate::openapi::BookingInputDoc,
    responses(
        (status = 200, description = "Inserted", body = crate::openapi::InsertAckDoc),
        (status = 400, description = "Bad Request")
    )
)]
pub async fn create_booking(
    State(state): State<ServerState>,
    JsonBody(input): JsonBody<BookingInput>,
) -> Result<Json<InsertAck>, JsonApiError> {
    Ok(Json(state.bookings.create_booking(input).await?))
}

#[utoipa::path(
    put,
    path = "/bookings/{id}",
    tag = "bookings",
    params(("id" = String, Path, description = "24-char hex id")),
    request_body = crate::openapi::StatusUpdateDoc,
    responses(
        (status = 200, description = "Update result; matchedCount 0 when absent", body = crate::openapi::UpdateAckDoc),
        (status = 400, description = "Malformed id or body")
    )
)]
pub async fn update_booking_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    JsonBody(update): JsonBody<StatusUpdate>,
) -> Result<Json<UpdateAck>, JsonApiError> {
    Ok(Json(state.bookings.update_booking_status(&id, update).await?))
}

#[utoipa::path(
    delete,
    path = "/bookings/{id}",
    tag = "bookings",
    params(("id" = String, Path, description = "24-char hex id")),
    responses(
        (status = 200, description = "Delete result; deletedCount 0 when absent", body = crate::openapi::DeleteAckDoc),
        (status = 400, description = "Malformed id")
    )
)]
pub async fn delete_booking(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>, JsonApiError> {
    Ok(Json(state.bookings.delete_booking(&id).await?))
}
