use serde::Serialize;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct TokenRequestDoc {
    /// Becomes the verified identity; further fields are embedded in the token.
    pub email: String,
}

#[derive(ToSchema)]
pub struct IssuedTokenDoc {
    pub token: String,
}

#[derive(ToSchema)]
pub struct ServiceInputDoc {
    pub title: String,
    pub price: f64,
    pub service_id: Option<String>,
    pub img: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ServiceDoc {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub price: f64,
    pub service_id: Option<String>,
    pub img: Option<String>,
}

#[derive(ToSchema)]
pub struct ServiceSummaryDoc {
    pub title: String,
    pub price: f64,
    pub service_id: Option<String>,
    pub img: Option<String>,
}

#[derive(ToSchema)]
pub struct BookingInputDoc {
    pub email: String,
    pub status: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct BookingDoc {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub status: Option<String>,
}

#[derive(ToSchema)]
pub struct StatusUpdateDoc {
    /// Stored as the booking's `status`.
    pub confirm: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertAckDoc {
    pub acknowledged: bool,
    pub inserted_id: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAckDoc {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAckDoc {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

struct BearerScheme;

impl Modify for BearerScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::issue_token,
        crate::routes::auth::logout,
        crate::routes::services::list_services,
        crate::routes::services::get_service,
        crate::routes::services::create_service,
        crate::routes::bookings::list_bookings,
        crate::routes::bookings::create_booking,
        crate::routes::bookings::update_booking_status,
        crate::routes::bookings::delete_booking,
    ),
    components(
        schemas(
            HealthResponse,
            TokenRequestDoc,
            IssuedTokenDoc,
            ServiceInputDoc,
            ServiceDoc,
            ServiceSummaryDoc,
            BookingInputDoc,
            BookingDoc,
            StatusUpdateDoc,
            InsertAckDoc,
            UpdateAckDoc,
            DeleteAckDoc,
        )
    ),
    modifiers(&BearerScheme),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "services"),
        (name = "bookings")
    )
)]
pub struct ApiDoc;
