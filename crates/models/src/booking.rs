use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ModelError;
use crate::id::RecordId;
use crate::validation::{validate_email, validate_extra};

/// Booking as accepted on `POST /bookings`.
///
/// Only `email` is required; customer name, date, service title, price and so on ride in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingInput {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BookingInput {
    pub fn new(email: impl Into<String>) -> Self {
        Self { email: email.into(), status: None, extra: Map::new() }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        validate_email(&self.email)?;
        validate_extra(&self.extra)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: BookingInput,
}

/// Body of `PUT /bookings/:id`; `confirm` becomes the booking's `status` as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusUpdate {
    pub confirm: String,
}
