use async_trait::async_trait;
use futures::TryStreamExt;
use models::{
    db::{self, MongoStore},
    InsertAck, RecordId, Service, ServiceInput, ServiceSummary,
};
use mongodb::bson::{doc, Document};
use tracing::warn;

use crate::errors::ServiceError;

#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Service>, ServiceError>;
    async fn find_summary(&self, id: RecordId) -> Result<Option<ServiceSummary>, ServiceError>;
    async fn insert(&self, input: ServiceInput) -> Result<InsertAck, ServiceError>;
}

/// MongoDB-backed repository over the `services` collection.
pub struct MongoServiceRepository {
    pub store: MongoStore,
}

fn summary_projection() -> Document {
    let mut projection = doc! { "_id": 0 };
    for field in ServiceSummary::FIELDS {
        projection.insert(field, 1);
    }
    projection
}

/// Decode listed documents, skipping (and logging) any that do not fit the service shape.
fn decode_services(docs: Vec<Document>) -> Vec<Service> {
    docs.into_iter()
        .filter_map(|d| match db::from_record_document::<ServiceInput>(d) {
            Ok((id, fields)) => Some(Service { id, fields }),
            Err(e) => {
                warn!(err = %e, "skipping undecodable service document");
                None
            }
        })
        .collect()
}

#[async_trait]
impl ServiceRepository for MongoServiceRepository {
    async fn list(&self) -> Result<Vec<Service>, ServiceError> {
        let docs: Vec<Document> = self.store.services().find(doc! {}).await?.try_collect().await?;
        Ok(decode_services(docs))
    }

    async fn find_summary(&self, id: RecordId) -> Result<Option<ServiceSummary>, ServiceError> {
        let found = self
            .store
            .services()
            .find_one(doc! { "_id": id.object_id() })
            .projection(summary_projection())
            .await?;
        Ok(found.map(db::from_projection::<ServiceSummary>).transpose()?)
    }

    async fn insert(&self, input: ServiceInput) -> Result<InsertAck, ServiceError> {
        let id = RecordId::new();
        let document = db::to_record_document(id, &input)?;
        self.store.services().insert_one(document).await?;
        Ok(InsertAck::new(id))
    }
}
