//! Products Repository
//!
//! Also holds the inventory ledger: `take_stock` and `return_stock` are the
//! only statements that move the stock counter. `return_stock` skips retired
//! products; that guard lives in its SQL and nowhere else.

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::domain::{
    merchants::models::MerchantUuid,
    products::models::{NewProduct, Product, ProductUpdate, ProductUuid},
};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const LIST_MERCHANT_PRODUCTS_SQL: &str = include_str!("sql/list_merchant_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const RETIRE_PRODUCT_SQL: &str = include_str!("sql/retire_product.sql");
const LOCK_PRODUCTS_SQL: &str = include_str!("sql/lock_products.sql");
const TAKE_STOCK_SQL: &str = include_str!("sql/take_stock.sql");
const RETURN_STOCK_SQL: &str = include_str!("sql/return_stock.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Product>, sqlx::Error> {
        query_as::<Postgres, Product>(LIST_PRODUCTS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_merchant_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        merchant: MerchantUuid,
    ) -> Result<Vec<Product>, sqlx::Error> {
        query_as::<Postgres, Product>(LIST_MERCHANT_PRODUCTS_SQL)
            .bind(merchant.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: NewProduct,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(product.merchant_uuid.into_uuid())
            .bind(product.name)
            .bind(product.description)
            .bind(try_to_amount(product.price, "price")?)
            .bind(try_to_amount(product.stock, "stock")?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(UPDATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(update.name)
            .bind(update.description)
            .bind(try_to_amount(update.price, "price")?)
            .bind(try_to_amount(update.stock, "stock")?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn retire_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(RETIRE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Lock the given product rows (`FOR UPDATE`) and return fresh copies.
    ///
    /// Rows are locked in uuid order so concurrent multi-product
    /// transactions cannot deadlock against each other.
    pub(crate) async fn lock_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[ProductUuid],
    ) -> Result<Vec<Product>, sqlx::Error> {
        let uuids: Vec<Uuid> = products.iter().copied().map(ProductUuid::into_uuid).collect();

        query_as::<Postgres, Product>(LOCK_PRODUCTS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }

    /// Remove `amount` units from a product's stock, unconditionally.
    ///
    /// The caller must already hold the row lock and have verified that the
    /// product has at least `amount` units; the schema's `stock >= 0` check
    /// rejects the update otherwise.
    pub(crate) async fn take_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        amount: u64,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(TAKE_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(try_to_amount(amount, "stock")?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Return `amount` units to a product's stock.
    ///
    /// No-op for retired products: discontinued items do not come back into
    /// inventory when an order is cancelled.
    pub(crate) async fn return_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        amount: u64,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(RETURN_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(try_to_amount(amount, "stock")?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for Product {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            merchant_uuid: MerchantUuid::from_uuid(row.try_get("merchant_uuid")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: try_get_amount(row, "price")?,
            stock: try_get_amount(row, "stock")?,
            retired: row.try_get("retired")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

pub(crate) fn try_get_amount(row: &PgRow, col: &str) -> Result<u64, sqlx::Error> {
    let amount_i64: i64 = row.try_get(col)?;

    u64::try_from(amount_i64).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn try_to_amount(amount: u64, col: &str) -> Result<i64, sqlx::Error> {
    i64::try_from(amount).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}
