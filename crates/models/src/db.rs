use configs::DatabaseConfig;
use mongodb::{
    bson::{self, doc, Bson, Document},
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection, Database,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::info;

use crate::errors::ModelError;
use crate::id::RecordId;

/// Long-lived MongoDB handle shared by every request.
///
/// Opened once at startup; `shutdown` closes the driver's pools when the server stops.
#[derive(Clone, Debug)]
pub struct MongoStore {
    client: Client,
    db: Database,
    services_collection: String,
    bookings_collection: String,
}

/// Connect with the Stable API v1 and verify reachability with a `ping` before returning.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<MongoStore> {
    let url = cfg
        .connection_url()
        .ok_or_else(|| anyhow::anyhow!("database url missing"))?;
    let mut options = ClientOptions::parse(url).await?;
    options.app_name = Some("car-doctor-server".into());
    options.server_api = Some(
        ServerApi::builder()
            .version(ServerApiVersion::V1)
            .strict(true)
            .deprecation_errors(true)
            .build(),
    );
    let client = Client::with_options(options)?;
    let store = MongoStore {
        db: client.database(&cfg.name),
        client,
        services_collection: cfg.services_collection.clone(),
        bookings_collection: cfg.bookings_collection.clone(),
    };
    store.ping().await?;
    info!(database = %cfg.name, "connected to mongodb");
    Ok(store)
}

impl MongoStore {
    pub async fn ping(&self) -> Result<(), ModelError> {
        self.client.database("admin").run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    pub fn services(&self) -> Collection<Document> {
        self.db.collection(&self.services_collection)
    }

    pub fn bookings(&self) -> Collection<Document> {
        self.db.collection(&self.bookings_collection)
    }

    pub async fn shutdown(self) {
        self.client.shutdown().await;
        info!("mongodb client shut down");
    }
}

/// Encode `fields` as a document carrying `_id` first.
pub fn to_record_document<T: Serialize>(id: RecordId, fields: &T) -> Result<Document, ModelError> {
    let body = bson::to_document(fields).map_err(|e| ModelError::Codec(e.to_string()))?;
    let mut out = doc! { "_id": id.object_id() };
    for (key, value) in body {
        out.insert(key, value);
    }
    Ok(out)
}

/// Split a stored document into its id and typed fields.
pub fn from_record_document<T: DeserializeOwned>(mut doc: Document) -> Result<(RecordId, T), ModelError> {
    let id = match doc.remove("_id") {
        Some(Bson::ObjectId(oid)) => RecordId::from(oid),
        Some(other) => return Err(ModelError::Codec(format!("unexpected _id type: {other}"))),
        None => return Err(ModelError::Codec("document without _id".into())),
    };
    let fields = bson::from_document(doc).map_err(|e| ModelError::Codec(e.to_string()))?;
    Ok((id, fields))
}

/// Decode a projected document (no `_id`) into `T`.
pub fn from_projection<T: DeserializeOwned>(doc: Document) -> Result<T, ModelError> {
    bson::from_document(doc).map_err(|e| ModelError::Codec(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BookingInput, ServiceInput, ServiceSummary};

    #[test]
    fn record_document_round_trips_through_bson() {
        let id = RecordId::new();
        let mut input = ServiceInput::new("Engine Diagnostic", 120.0);
        input.img = Some("https://img/engine.png".into());
        input.extra.insert("description".into(), serde_json::json!("full scan"));

        let doc = to_record_document(id, &input).unwrap();
        assert_eq!(doc.keys().next().map(String::as_str), Some("_id"));
        assert_eq!(doc.get_str("title").unwrap(), "Engine Diagnostic");

        let (back_id, back): (RecordId, ServiceInput) = from_record_document(doc).unwrap();
        assert_eq!(back_id, id);
        assert_eq!(back, input);
    }

    #[test]
    fn curated_documents_with_string_prices_decode() {
        let doc = doc! { "title": "Wheel Alignment", "price": "20.00", "service_id": "03" };
        let summary: ServiceSummary = from_projection(doc).unwrap();
        assert_eq!(summary.price, 20.0);
        assert_eq!(summary.service_id.as_deref(), Some("03"));
        assert!(summary.img.is_none());
    }

    #[test]
    fn integer_prices_decode_as_numbers() {
        let doc = doc! { "title": "Battery", "price": 35_i32 };
        let summary: ServiceSummary = from_projection(doc).unwrap();
        assert_eq!(summary.price, 35.0);
    }

    #[test]
    fn missing_or_foreign_id_is_a_codec_error() {
        let doc = doc! { "email": "a@x.com" };
        assert!(matches!(from_record_document::<BookingInput>(doc), Err(ModelError::Codec(_))));
        let doc = doc! { "_id": "plain-string", "email": "a@x.com" };
        assert!(matches!(from_record_document::<BookingInput>(doc), Err(ModelError::Codec(_))));
    }
}
