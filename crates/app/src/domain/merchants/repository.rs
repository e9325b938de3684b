//! Merchants Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::merchants::models::{Merchant, MerchantUuid, NewMerchant};

const CREATE_MERCHANT_SQL: &str = include_str!("sql/create_merchant.sql");
const GET_MERCHANT_SQL: &str = include_str!("sql/get_merchant.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgMerchantsRepository;

impl PgMerchantsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_merchant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        merchant: NewMerchant,
    ) -> Result<Merchant, sqlx::Error> {
        query_as::<Postgres, Merchant>(CREATE_MERCHANT_SQL)
            .bind(merchant.uuid.into_uuid())
            .bind(merchant.name)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_merchant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        merchant: MerchantUuid,
    ) -> Result<Merchant, sqlx::Error> {
        query_as::<Postgres, Merchant>(GET_MERCHANT_SQL)
            .bind(merchant.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Merchant {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: MerchantUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
