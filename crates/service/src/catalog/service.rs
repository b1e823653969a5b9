use std::sync::Arc;

use models::{InsertAck, RecordId, Service, ServiceInput, ServiceSummary};
use tracing::{debug, info, instrument};

use super::repository::ServiceRepository;
use crate::errors::ServiceError;

/// Application service for the service catalog.
#[derive(Clone)]
pub struct CatalogService {
    repo: Arc<dyn ServiceRepository>,
}

impl CatalogService {
    pub fn new(repo: Arc<dyn ServiceRepository>) -> Self {
        Self { repo }
    }

    /// Every catalog entry, unfiltered and unordered.
    #[instrument(skip(self))]
    pub async fn list_services(&self) -> Result<Vec<Service>, ServiceError> {
        let list = self.repo.list().await?;
        debug!(count = list.len(), "services_listed");
        Ok(list)
    }

    /// Projected view of one entry; malformed ids fail before the store is touched.
    #[instrument(skip(self))]
    pub async fn get_service(&self, raw_id: &str) -> Result<ServiceSummary, ServiceError> {
        let id = RecordId::parse(raw_id)?;
        self.repo
            .find_summary(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("service"))
    }

    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use models::ServiceInput;
    /// use service::{catalog::CatalogService, storage::memory::MemoryServiceRepository};
    /// let svc = CatalogService::new(Arc::new(MemoryServiceRepository::default()));
    /// let ack = tokio_test::block_on(svc.create_service(ServiceInput::new("Oil Change", 40.0))).unwrap();
    /// let summary = tokio_test::block_on(svc.get_service(&ack.inserted_id.to_hex())).unwrap();
    /// assert_eq!(summary.title, "Oil Change");
    /// ```
    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create_service(&self, input: ServiceInput) -> Result<InsertAck, ServiceError> {
        input.validate()?;
        let ack = self.repo.insert(input).await?;
        info!(id = %ack.inserted_id, "service_created");
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryServiceRepository;
    use serde_json::json;

    fn svc() -> CatalogService {
        CatalogService::new(Arc::new(MemoryServiceRepository::default()))
    }

    #[tokio::test]
    async fn created_service_reads_back_as_exact_projection() {
        let svc = svc();
        let mut input = ServiceInput::new("Oil Change", 40.0);
        input.extra.insert("description".into(), json!("synthetic"));
        let ack = svc.create_service(input).await.unwrap();

        let summary = svc.get_service(&ack.inserted_id.to_hex()).await.unwrap();
        let v = serde_json::to_value(summary).unwrap();
        assert_eq!(v, json!({"title": "Oil Change", "price": 40.0}));

        let all = svc.list_services().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].fields.extra["description"], "synthetic");
    }

    #[tokio::test]
    async fn unknown_and_malformed_ids_are_distinguished() {
        let svc = svc();
        assert!(matches!(svc.get_service(&RecordId::new().to_hex()).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.get_service("not-an-id").await, Err(ServiceError::MalformedInput(_))));
    }

    #[tokio::test]
    async fn invalid_service_is_not_stored() {
        let svc = svc();
        assert!(matches!(svc.create_service(ServiceInput::new("", 1.0)).await, Err(ServiceError::Validation(_))));
        assert!(svc.list_services().await.unwrap().is_empty());
    }
}
