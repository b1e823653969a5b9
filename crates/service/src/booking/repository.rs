use async_trait::async_trait;
use futures::TryStreamExt;
use models::{
    db::{self, MongoStore},
    Booking, BookingInput, DeleteAck, InsertAck, RecordId, UpdateAck,
};
use mongodb::bson::{doc, Bson, Document};
use tracing::warn;

use crate::errors::ServiceError;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn list_by_email(&self, email: &str) -> Result<Vec<Booking>, ServiceError>;
    async fn insert(&self, input: BookingInput) -> Result<InsertAck, ServiceError>;
    /// Zero matches is a normal outcome, reported through the ack counts.
    async fn set_status(&self, id: RecordId, status: &str) -> Result<UpdateAck, ServiceError>;
    async fn delete(&self, id: RecordId) -> Result<DeleteAck, ServiceError>;
}

/// MongoDB-backed repository over the `booking` collection.
pub struct MongoBookingRepository {
    pub store: MongoStore,
}

/// Decode listed documents, skipping (and logging) any without a usable `_id` or `email`.
fn decode_bookings(docs: Vec<Document>) -> Vec<Booking> {
    docs.into_iter()
        .filter_map(|d| match db::from_record_document::<BookingInput>(d) {
            Ok((id, fields)) => Some(Booking { id, fields }),
            Err(e) => {
                warn!(err = %e, "skipping undecodable booking document");
                None
            }
        })
        .collect()
}

#[async_trait]
impl BookingRepository for MongoBookingRepository {
    async fn list_by_email(&self, email: &str) -> Result<Vec<Booking>, ServiceError> {
        let docs: Vec<Document> = self
            .store
            .bookings()
            .find(doc! { "email": email })
            .await?
            .try_collect()
            .await?;
        Ok(decode_bookings(docs))
    }

    async fn insert(&self, input: BookingInput) -> Result<InsertAck, ServiceError> {
        let id = RecordId::new();
        let document = db::to_record_document(id, &input)?;
        self.store.bookings().insert_one(document).await?;
        Ok(InsertAck::new(id))
    }

    async fn set_status(&self, id: RecordId, status: &str) -> Result<UpdateAck, ServiceError> {
        let res = self
            .store
            .bookings()
            .update_one(doc! { "_id": id.object_id() }, doc! { "$set": { "status": status } })
            .await?;
        let mut ack = UpdateAck::new(res.matched_count, res.modified_count);
        if let Some(Bson::ObjectId(oid)) = res.upserted_id {
            ack.upserted_id = Some(RecordId::from(oid));
        }
        Ok(ack)
    }

    async fn delete(&self, id: RecordId) -> Result<DeleteAck, ServiceError> {
        let res = self.store.bookings().delete_one(doc! { "_id": id.object_id() }).await?;
        Ok(DeleteAck::new(res.deleted_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_documents_are_skipped_when_listing() {
        let good = RecordId::new();
        let docs = vec![
            doc! { "_id": good.object_id(), "email": "a@x.com", "status": "confirm" },
            doc! { "_id": RecordId::new().object_id(), "customerName": "no email" },
        ];
        let listed = decode_bookings(docs);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, good);
        assert_eq!(listed[0].fields.status.as_deref(), Some("confirm"));
    }
}
