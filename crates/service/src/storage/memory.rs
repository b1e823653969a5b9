use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use models::{
    Booking, BookingInput, DeleteAck, InsertAck, RecordId, Service, ServiceInput, ServiceSummary, UpdateAck,
};
use tokio::sync::RwLock;

use crate::booking::repository::BookingRepository;
use crate::catalog::repository::ServiceRepository;
use crate::errors::ServiceError;

/// Insertion-ordered documents keyed by id, mimicking one collection.
struct MemoryCollection<T> {
    docs: RwLock<Vec<(RecordId, T)>>,
}

impl<T> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self { docs: RwLock::new(Vec::new()) }
    }
}

impl<T: Clone> MemoryCollection<T> {
    async fn insert(&self, value: T) -> RecordId {
        let id = RecordId::new();
        self.docs.write().await.push((id, value));
        id
    }

    async fn find(&self, id: RecordId) -> Option<T> {
        let docs = self.docs.read().await;
        docs.iter().find(|(k, _)| *k == id).map(|(_, v)| v.clone())
    }

    async fn filter<F: Fn(&T) -> bool>(&self, pred: F) -> Vec<(RecordId, T)> {
        let docs = self.docs.read().await;
        docs.iter().filter(|(_, v)| pred(v)).cloned().collect()
    }

    async fn remove(&self, id: RecordId) -> bool {
        let mut docs = self.docs.write().await;
        let before = docs.len();
        docs.retain(|(k, _)| *k != id);
        docs.len() != before
    }
}

#[derive(Default)]
pub struct MemoryServiceRepository {
    services: MemoryCollection<ServiceInput>,
}

#[async_trait]
impl ServiceRepository for MemoryServiceRepository {
    async fn list(&self) -> Result<Vec<Service>, ServiceError> {
        Ok(self
            .services
            .filter(|_| true)
            .await
            .into_iter()
            .map(|(id, fields)| Service { id, fields })
            .collect())
    }

    async fn find_summary(&self, id: RecordId) -> Result<Option<ServiceSummary>, ServiceError> {
        Ok(self.services.find(id).await.map(|s| s.summary()))
    }

    async fn insert(&self, input: ServiceInput) -> Result<InsertAck, ServiceError> {
        Ok(InsertAck::new(self.services.insert(input).await))
    }
}

#[derive(Default)]
pub struct MemoryBookingRepository {
    bookings: MemoryCollection<BookingInput>,
    list_queries: AtomicUsize,
}

impl MemoryBookingRepository {
    /// Number of list queries that reached the store.
    pub fn list_queries(&self) -> usize {
        self.list_queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BookingRepository for MemoryBookingRepository {
    async fn list_by_email(&self, email: &str) -> Result<Vec<Booking>, ServiceError> {
        self.list_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .bookings
            .filter(|b| b.email == email)
            .await
            .into_iter()
            .map(|(id, fields)| Booking { id, fields })
            .collect())
    }

    async fn insert(&self, input: BookingInput) -> Result<InsertAck, ServiceError> {
        Ok(InsertAck::new(self.bookings.insert(input).await))
    }

    async fn set_status(&self, id: RecordId, status: &str) -> Result<UpdateAck, ServiceError> {
        let mut docs = self.bookings.docs.write().await;
        let Some((_, booking)) = docs.iter_mut().find(|(k, _)| *k == id) else {
            return Ok(UpdateAck::new(0, 0));
        };
        if booking.status.as_deref() == Some(status) {
            return Ok(UpdateAck::new(1, 0));
        }
        booking.status = Some(status.to_string());
        Ok(UpdateAck::new(1, 1))
    }

    async fn delete(&self, id: RecordId) -> Result<DeleteAck, ServiceError> {
        let removed = self.bookings.remove(id).await;
        Ok(DeleteAck::new(u64::from(removed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_collections_keep_insertion_order() -> Result<(), ServiceError> {
        let repo = MemoryServiceRepository::default();
        let first = repo.insert(ServiceInput::new("A", 1.0)).await?;
        let second = repo.insert(ServiceInput::new("B", 2.0)).await?;
        let ids: Vec<RecordId> = repo.list().await?.into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![first.inserted_id, second.inserted_id]);
        Ok(())
    }

    #[tokio::test]
    async fn booking_updates_report_match_and_modify_counts() -> Result<(), ServiceError> {
        let repo = MemoryBookingRepository::default();
        let ack = repo.insert(BookingInput::new("a@x.com")).await?;
        assert_eq!(repo.set_status(ack.inserted_id, "confirm").await?, UpdateAck::new(1, 1));
        assert_eq!(repo.set_status(ack.inserted_id, "confirm").await?, UpdateAck::new(1, 0));
        assert_eq!(repo.set_status(RecordId::new(), "confirm").await?, UpdateAck::new(0, 0));
        assert_eq!(repo.delete(ack.inserted_id).await?.deleted_count, 1);
        assert_eq!(repo.delete(ack.inserted_id).await?.deleted_count, 0);
        Ok(())
    }
}
