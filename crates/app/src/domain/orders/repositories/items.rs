//! Order Items Repository
//!
//! Items are always read joined against their product, so every row carries
//! the product's current name, price, stock and retirement flag.

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    merchants::models::MerchantUuid,
    orders::models::{FulfillmentItem, NewOrderItem, OrderItem, OrderItemUuid, OrderUuid},
    products::{
        models::ProductUuid,
        repository::{try_get_amount, try_to_amount},
    },
};

const GET_ORDER_ITEMS_SQL: &str = include_str!("../sql/get_order_items.sql");
const GET_ORDER_ITEM_SQL: &str = include_str!("../sql/get_order_item.sql");
const CREATE_ORDER_ITEM_SQL: &str = include_str!("../sql/create_order_item.sql");
const SET_ORDER_ITEM_QUANTITY_SQL: &str = include_str!("../sql/set_order_item_quantity.sql");
const DELETE_ORDER_ITEM_SQL: &str = include_str!("../sql/delete_order_item.sql");
const MARK_ORDER_ITEM_SHIPPED_SQL: &str = include_str!("../sql/mark_order_item_shipped.sql");
const LIST_FULFILLMENT_ITEMS_SQL: &str = include_str!("../sql/list_fulfillment_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderItemsRepository;

impl PgOrderItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        query_as::<Postgres, OrderItem>(GET_ORDER_ITEMS_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        item: OrderItemUuid,
    ) -> Result<OrderItem, sqlx::Error> {
        query_as::<Postgres, OrderItem>(GET_ORDER_ITEM_SQL)
            .bind(item.into_uuid())
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        item: NewOrderItem,
    ) -> Result<OrderItem, sqlx::Error> {
        query(CREATE_ORDER_ITEM_SQL)
            .bind(item.uuid.into_uuid())
            .bind(order.into_uuid())
            .bind(item.product_uuid.into_uuid())
            .bind(try_to_amount(item.quantity, "quantity")?)
            .execute(&mut **tx)
            .await?;

        self.get_item(tx, order, item.uuid).await
    }

    pub(crate) async fn set_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        item: OrderItemUuid,
        quantity: u64,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SET_ORDER_ITEM_QUANTITY_SQL)
            .bind(item.into_uuid())
            .bind(order.into_uuid())
            .bind(try_to_amount(quantity, "quantity")?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        item: OrderItemUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ORDER_ITEM_SQL)
            .bind(item.into_uuid())
            .bind(order.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn mark_shipped(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        item: OrderItemUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(MARK_ORDER_ITEM_SHIPPED_SQL)
            .bind(item.into_uuid())
            .bind(order.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn list_fulfillment_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        merchant: MerchantUuid,
    ) -> Result<Vec<FulfillmentItem>, sqlx::Error> {
        query_as::<Postgres, FulfillmentItem>(LIST_FULFILLMENT_ITEMS_SQL)
            .bind(merchant.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            product_name: row.try_get("product_name")?,
            merchant_uuid: MerchantUuid::from_uuid(row.try_get("merchant_uuid")?),
            quantity: try_get_amount(row, "quantity")?,
            shipped: row.try_get("shipped")?,
            unit_price: try_get_amount(row, "unit_price")?,
            stock: try_get_amount(row, "stock")?,
            retired: row.try_get("retired")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for FulfillmentItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            item_uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            product_name: row.try_get("product_name")?,
            quantity: try_get_amount(row, "quantity")?,
            shipped: row.try_get("shipped")?,
            ordered_at: row.try_get::<SqlxTimestamp, _>("ordered_at")?.to_jiff(),
        })
    }
}
