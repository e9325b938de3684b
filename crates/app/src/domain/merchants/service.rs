//! Merchants service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::merchants::{
        errors::MerchantsServiceError,
        models::{Merchant, MerchantUuid, NewMerchant},
        repository::PgMerchantsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgMerchantsService {
    db: Db,
    repository: PgMerchantsRepository,
}

impl PgMerchantsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgMerchantsRepository::new(),
        }
    }
}

#[async_trait]
impl MerchantsService for PgMerchantsService {
    async fn create_merchant(
        &self,
        merchant: NewMerchant,
    ) -> Result<Merchant, MerchantsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_merchant(&mut tx, merchant).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_merchant(
        &self,
        merchant: MerchantUuid,
    ) -> Result<Merchant, MerchantsServiceError> {
        let mut tx = self.db.begin().await?;

        let merchant = self.repository.get_merchant(&mut tx, merchant).await?;

        tx.commit().await?;

        Ok(merchant)
    }
}

#[automock]
#[async_trait]
/// Merchant account operations.
pub trait MerchantsService: Send + Sync {
    /// Creates a new merchant.
    async fn create_merchant(
        &self,
        merchant: NewMerchant,
    ) -> Result<Merchant, MerchantsServiceError>;

    /// Retrieve a single merchant.
    async fn get_merchant(&self, merchant: MerchantUuid)
    -> Result<Merchant, MerchantsServiceError>;
}
