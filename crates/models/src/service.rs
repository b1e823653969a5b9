use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::errors::ModelError;
use crate::id::RecordId;
use crate::validation::validate_extra;

/// Catalog entry as accepted on `POST /services`.
///
/// `title` and `price` are required; anything beyond the named fields is stored verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceInput {
    pub title: String,
    #[serde(deserialize_with = "deserialize_price")]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServiceInput {
    pub fn new(title: impl Into<String>, price: f64) -> Self {
        Self { title: title.into(), price, service_id: None, img: None, extra: Map::new() }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.title.trim().is_empty() {
            return Err(ModelError::Validation("title required".into()));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ModelError::Validation("price must be a non-negative number".into()));
        }
        validate_extra(&self.extra)
    }

    pub fn summary(&self) -> ServiceSummary {
        ServiceSummary {
            title: self.title.clone(),
            price: self.price,
            service_id: self.service_id.clone(),
            img: self.img.clone(),
        }
    }
}

/// Stored catalog document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: ServiceInput,
}

/// The projection returned by `GET /services/:id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceSummary {
    pub title: String,
    #[serde(deserialize_with = "deserialize_price")]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
}

impl ServiceSummary {
    /// Field names kept by the projection, in store order.
    pub const FIELDS: [&'static str; 4] = ["title", "price", "service_id", "img"];
}

/// Prices arrive as numbers from clients but curated documents may hold numeric strings ("20.00").
fn deserialize_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    struct PriceVisitor;

    impl<'de> de::Visitor<'de> for PriceVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number or a numeric string")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            v.trim().parse::<f64>().map_err(|_| E::custom(format!("invalid price '{v}'")))
        }
    }

    deserializer.deserialize_any(PriceVisitor)
}
