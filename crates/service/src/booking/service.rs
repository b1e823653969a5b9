use std::sync::Arc;

use models::{Booking, BookingInput, DeleteAck, InsertAck, RecordId, StatusUpdate, UpdateAck};
use tracing::{info, instrument, warn};

use super::repository::BookingRepository;
use crate::errors::ServiceError;

/// Application service for bookings.
#[derive(Clone)]
pub struct BookingService {
    repo: Arc<dyn BookingRepository>,
}

impl BookingService {
    pub fn new(repo: Arc<dyn BookingRepository>) -> Self {
        Self { repo }
    }

    /// List bookings for one email.
    ///
    /// With a verified identity the filter must name that identity; a mismatch is `Forbidden`
    /// and returns before the store is queried. A missing filter falls back to the verified
    /// email, and without any identity it matches nothing.
    #[instrument(skip(self))]
    pub async fn list_bookings(
        &self,
        filter: Option<&str>,
        verified: Option<&str>,
    ) -> Result<Vec<Booking>, ServiceError> {
        let filter = filter.map(str::trim).filter(|f| !f.is_empty());
        let email = match (filter, verified) {
            (Some(requested), Some(owner)) if requested != owner => {
                warn!(requested, owner, "booking list for another identity refused");
                return Err(ServiceError::Forbidden("bookings of another identity".into()));
            }
            (Some(requested), _) => requested,
            (None, Some(owner)) => owner,
            (None, None) => return Ok(Vec::new()),
        };
        self.repo.list_by_email(email).await
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_booking(&self, input: BookingInput) -> Result<InsertAck, ServiceError> {
        input.validate()?;
        let ack = self.repo.insert(input).await?;
        info!(id = %ack.inserted_id, "booking_created");
        Ok(ack)
    }

    #[instrument(skip(self, update))]
    pub async fn update_booking_status(&self, raw_id: &str, update: StatusUpdate) -> Result<UpdateAck, ServiceError> {
        let id = RecordId::parse(raw_id)?;
        let ack = self.repo.set_status(id, &update.confirm).await?;
        info!(%id, status = %update.confirm, matched = ack.matched_count, "booking_status_updated");
        Ok(ack)
    }

    #[instrument(skip(self))]
    pub async fn delete_booking(&self, raw_id: &str) -> Result<DeleteAck, ServiceError> {
        let id = RecordId::parse(raw_id)?;
        let ack = self.repo.delete(id).await?;
        info!(%id, deleted = ack.deleted_count, "booking_deleted");
        Ok(ack)
    }
}
