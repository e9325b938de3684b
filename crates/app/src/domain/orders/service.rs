//! Orders service.
//!
//! Every operation runs inside a single transaction, so a failed checkout or
//! cancellation never leaves a partially adjusted inventory behind. Checkout
//! and cancellation lock the order row first and the touched product rows
//! second (in uuid order), which serializes concurrent attempts against the
//! same stock.

use std::collections::HashMap;

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        merchants::models::MerchantUuid,
        orders::{
            checkout::{self, CheckoutFields},
            errors::OrdersServiceError,
            models::{
                FulfillmentItem, NewOrder, NewOrderItem, Order, OrderItem, OrderItemUuid,
                OrderStatus, OrderUuid,
            },
            repositories::{PgOrderItemsRepository, PgOrdersRepository},
        },
        products::{models::ProductUuid, repository::PgProductsRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders_repository: PgOrdersRepository,
    items_repository: PgOrderItemsRepository,
    products_repository: PgProductsRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders_repository: PgOrdersRepository::new(),
            items_repository: PgOrderItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }

    /// Lock the product rows behind `items` and overwrite each item's stock
    /// with the value read under the lock.
    async fn lock_item_products(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        items: &mut [OrderItem],
    ) -> Result<(), OrdersServiceError> {
        let mut product_uuids: Vec<ProductUuid> =
            items.iter().map(|item| item.product_uuid).collect();
        product_uuids.sort_unstable();
        product_uuids.dedup();

        let locked = self
            .products_repository
            .lock_products(tx, &product_uuids)
            .await?;

        let stock_by_product: HashMap<ProductUuid, u64> = locked
            .into_iter()
            .map(|product| (product.uuid, product.stock))
            .collect();

        for item in items {
            if let Some(stock) = stock_by_product.get(&item.product_uuid) {
                item.stock = *stock;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.orders_repository.create_order(&mut tx, order.uuid).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut order = self.orders_repository.get_order(&mut tx, order).await?;
        let items = self.items_repository.get_items(&mut tx, order.uuid).await?;

        tx.commit().await?;

        order.items = items;

        Ok(order)
    }

    async fn add_item(
        &self,
        order: OrderUuid,
        item: NewOrderItem,
    ) -> Result<OrderItem, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order_row = self.orders_repository.get_order(&mut tx, order).await?;

        if order_row.status != OrderStatus::Pending {
            return Err(OrdersServiceError::NotPending);
        }

        let product = self
            .products_repository
            .get_product(&mut tx, item.product_uuid)
            .await
            .map_err(|error| match error {
                sqlx::Error::RowNotFound => OrdersServiceError::InvalidReference,
                other => other.into(),
            })?;

        checkout::validate_item_quantity(item.quantity, product.stock)?;

        let created = self.items_repository.create_item(&mut tx, order, item).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn set_item_quantity(
        &self,
        order: OrderUuid,
        item: OrderItemUuid,
        quantity: u64,
    ) -> Result<OrderItem, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order_row = self.orders_repository.get_order(&mut tx, order).await?;

        if order_row.status != OrderStatus::Pending {
            return Err(OrdersServiceError::NotPending);
        }

        let existing = self.items_repository.get_item(&mut tx, order, item).await?;

        checkout::validate_item_quantity(quantity, existing.stock)?;

        self.items_repository
            .set_quantity(&mut tx, order, item, quantity)
            .await?;

        let updated = self.items_repository.get_item(&mut tx, order, item).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn remove_item(
        &self,
        order: OrderUuid,
        item: OrderItemUuid,
    ) -> Result<(), OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order_row = self.orders_repository.get_order(&mut tx, order).await?;

        if order_row.status != OrderStatus::Pending {
            return Err(OrdersServiceError::NotPending);
        }

        let rows_affected = self.items_repository.delete_item(&mut tx, order, item).await?;

        if rows_affected == 0 {
            return Err(OrdersServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn checkout(
        &self,
        order: OrderUuid,
        fields: CheckoutFields,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order_row = self
            .orders_repository
            .get_order_for_update(&mut tx, order)
            .await?;

        if order_row.status != OrderStatus::Pending {
            return Err(OrdersServiceError::NotPending);
        }

        let mut items = self.items_repository.get_items(&mut tx, order).await?;

        // Validation runs against stock read under the row locks, so a
        // concurrent checkout of the same products cannot slip past it.
        self.lock_item_products(&mut tx, &mut items).await?;

        checkout::validate_for_checkout(&fields, &items)?;

        for item in &items {
            self.products_repository
                .take_stock(&mut tx, item.product_uuid, item.quantity)
                .await?;
        }

        self.orders_repository
            .apply_checkout(&mut tx, order, &fields)
            .await?;

        let mut updated = self.orders_repository.get_order(&mut tx, order).await?;
        let items = self.items_repository.get_items(&mut tx, order).await?;

        tx.commit().await?;

        info!(%order, items = items.len(), "order paid");

        updated.items = items;

        Ok(updated)
    }

    async fn cancel(&self, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order_row = self
            .orders_repository
            .get_order_for_update(&mut tx, order)
            .await?;

        match order_row.status {
            // A cart never took any stock, so none comes back.
            OrderStatus::Pending => {
                self.orders_repository
                    .set_status(&mut tx, order, OrderStatus::Cancel)
                    .await?;
            }
            // A paid order returns its stock, except for retired products.
            OrderStatus::Paid => {
                let mut items = self.items_repository.get_items(&mut tx, order).await?;

                self.lock_item_products(&mut tx, &mut items).await?;

                for item in &items {
                    self.products_repository
                        .return_stock(&mut tx, item.product_uuid, item.quantity)
                        .await?;
                }

                self.orders_repository
                    .set_status(&mut tx, order, OrderStatus::Cancel)
                    .await?;
            }
            OrderStatus::Complete | OrderStatus::Cancel => {
                return Err(OrdersServiceError::Terminal);
            }
        }

        let mut updated = self.orders_repository.get_order(&mut tx, order).await?;
        let items = self.items_repository.get_items(&mut tx, order).await?;

        tx.commit().await?;

        info!(%order, from = %order_row.status, "order cancelled");

        updated.items = items;

        Ok(updated)
    }

    async fn mark_item_shipped(
        &self,
        order: OrderUuid,
        item: OrderItemUuid,
    ) -> Result<OrderItem, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order_row = self
            .orders_repository
            .get_order_for_update(&mut tx, order)
            .await?;

        if order_row.status != OrderStatus::Paid {
            return Err(OrdersServiceError::NotPaid);
        }

        let rows_affected = self.items_repository.mark_shipped(&mut tx, order, item).await?;

        if rows_affected == 0 {
            return Err(OrdersServiceError::NotFound);
        }

        let updated = self.items_repository.get_item(&mut tx, order, item).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn try_complete(&self, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order_row = self
            .orders_repository
            .get_order_for_update(&mut tx, order)
            .await?;

        // Only a fully shipped paid order completes; anything else is left
        // untouched, which makes repeated calls harmless.
        if order_row.status == OrderStatus::Paid {
            let items = self.items_repository.get_items(&mut tx, order).await?;

            if items.iter().all(|item| item.shipped) {
                self.orders_repository
                    .set_status(&mut tx, order, OrderStatus::Complete)
                    .await?;
            }
        }

        let mut updated = self.orders_repository.get_order(&mut tx, order).await?;
        let items = self.items_repository.get_items(&mut tx, order).await?;

        tx.commit().await?;

        updated.items = items;

        Ok(updated)
    }

    async fn is_order_of(
        &self,
        order: OrderUuid,
        merchant: MerchantUuid,
    ) -> Result<bool, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut order = self.orders_repository.get_order(&mut tx, order).await?;
        let items = self.items_repository.get_items(&mut tx, order.uuid).await?;

        tx.commit().await?;

        order.items = items;

        Ok(order.involves_merchant(merchant))
    }

    async fn list_fulfillment_items(
        &self,
        merchant: MerchantUuid,
    ) -> Result<Vec<FulfillmentItem>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let items = self
            .items_repository
            .list_fulfillment_items(&mut tx, merchant)
            .await?;

        tx.commit().await?;

        Ok(items)
    }
}

#[automock]
#[async_trait]
/// Cart, checkout and fulfillment operations.
pub trait OrdersService: Send + Sync {
    /// Creates a new, empty cart.
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError>;

    /// Retrieve an order with its items.
    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError>;

    /// Add a product to a pending cart.
    async fn add_item(
        &self,
        order: OrderUuid,
        item: NewOrderItem,
    ) -> Result<OrderItem, OrdersServiceError>;

    /// Change the quantity of an item in a pending cart.
    async fn set_item_quantity(
        &self,
        order: OrderUuid,
        item: OrderItemUuid,
        quantity: u64,
    ) -> Result<OrderItem, OrdersServiceError>;

    /// Remove an item from a pending cart.
    async fn remove_item(
        &self,
        order: OrderUuid,
        item: OrderItemUuid,
    ) -> Result<(), OrdersServiceError>;

    /// Convert a pending cart into a paid order, consuming stock.
    async fn checkout(
        &self,
        order: OrderUuid,
        fields: CheckoutFields,
    ) -> Result<Order, OrdersServiceError>;

    /// Cancel a pending or paid order. Paid orders return their stock,
    /// except for retired products.
    async fn cancel(&self, order: OrderUuid) -> Result<Order, OrdersServiceError>;

    /// Mark one item of a paid order as shipped.
    async fn mark_item_shipped(
        &self,
        order: OrderUuid,
        item: OrderItemUuid,
    ) -> Result<OrderItem, OrdersServiceError>;

    /// Complete a paid order once every item has shipped; otherwise leave it
    /// unchanged.
    async fn try_complete(&self, order: OrderUuid) -> Result<Order, OrdersServiceError>;

    /// True when at least one item of the order is a product of the given
    /// merchant. The order must exist.
    async fn is_order_of(
        &self,
        order: OrderUuid,
        merchant: MerchantUuid,
    ) -> Result<bool, OrdersServiceError>;

    /// Items of paid orders that the merchant still has to ship (or already
    /// shipped, while the order is open).
    async fn list_fulfillment_items(
        &self,
        merchant: MerchantUuid,
    ) -> Result<Vec<FulfillmentItem>, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::orders::checkout::{CheckoutField, OUT_OF_STOCK_MESSAGE},
        domain::products::service::ProductsService,
        test::TestContext,
    };

    use super::*;

    #[tokio::test]
    async fn create_order_starts_as_empty_pending_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = OrderUuid::new();

        let order = ctx.orders.create_order(NewOrder { uuid }).await?;

        assert_eq!(order.uuid, uuid);
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.items.is_empty());
        assert_eq!(order.total(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn get_order_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.orders.get_order(OrderUuid::new()).await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn add_item_records_product_and_quantity() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx.create_product("Walnut board", 45_00, 10).await?;
        let cart = ctx.create_cart().await;

        let item = ctx
            .orders
            .add_item(
                cart.uuid,
                NewOrderItem {
                    uuid: OrderItemUuid::new(),
                    product_uuid: product.uuid,
                    quantity: 3,
                },
            )
            .await?;

        assert_eq!(item.product_uuid, product.uuid);
        assert_eq!(item.quantity, 3);
        assert_eq!(item.unit_price, 45_00);
        assert!(!item.shipped);
        assert_eq!(item.subtotal(), 135_00);

        Ok(())
    }

    #[tokio::test]
    async fn add_item_beyond_stock_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx.create_product("Scarce", 10_00, 2).await?;
        let cart = ctx.create_cart().await;

        let result = ctx
            .orders
            .add_item(
                cart.uuid,
                NewOrderItem {
                    uuid: OrderItemUuid::new(),
                    product_uuid: product.uuid,
                    quantity: 3,
                },
            )
            .await;

        match result {
            Err(OrdersServiceError::Rejected(rejection)) => {
                assert!(rejection.has_field(CheckoutField::Quantity));
                assert_eq!(rejection.errors[0].message, OUT_OF_STOCK_MESSAGE);
            }
            other => panic!("expected Rejected, got {other:?}"),
        }

        Ok(())
    }

    #[tokio::test]
    async fn add_item_zero_quantity_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx.create_product("Any", 10_00, 5).await?;
        let cart = ctx.create_cart().await;

        let result = ctx
            .orders
            .add_item(
                cart.uuid,
                NewOrderItem {
                    uuid: OrderItemUuid::new(),
                    product_uuid: product.uuid,
                    quantity: 0,
                },
            )
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::Rejected(_))),
            "expected Rejected, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_item_unknown_product_returns_invalid_reference() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = ctx.create_cart().await;

        let result = ctx
            .orders
            .add_item(
                cart.uuid,
                NewOrderItem {
                    uuid: OrderItemUuid::new(),
                    product_uuid: ProductUuid::new(),
                    quantity: 1,
                },
            )
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn set_item_quantity_updates_and_validates() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx.create_product("Mug", 18_00, 4).await?;
        let cart = ctx.create_cart().await;
        let item = ctx.add_to_cart(cart.uuid, product.uuid, 1).await;

        let updated = ctx
            .orders
            .set_item_quantity(cart.uuid, item.uuid, 4)
            .await?;

        assert_eq!(updated.quantity, 4);

        let result = ctx.orders.set_item_quantity(cart.uuid, item.uuid, 5).await;

        assert!(
            matches!(result, Err(OrdersServiceError::Rejected(_))),
            "expected Rejected, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn remove_item_deletes_it_from_the_cart() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx.create_product("Mug", 18_00, 4).await?;
        let cart = ctx.create_cart().await;
        let item = ctx.add_to_cart(cart.uuid, product.uuid, 2).await;

        ctx.orders.remove_item(cart.uuid, item.uuid).await?;

        let order = ctx.orders.get_order(cart.uuid).await?;
        assert!(order.items.is_empty());

        let result = ctx.orders.remove_item(cart.uuid, item.uuid).await;
        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound for missing item, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn checkout_marks_order_paid_and_takes_stock() -> TestResult {
        let ctx = TestContext::new().await;

        let board = ctx.create_product("Board", 45_00, 10).await?;
        let mug = ctx.create_product("Mug", 18_00, 6).await?;

        let cart = ctx.create_cart().await;
        ctx.add_to_cart(cart.uuid, board.uuid, 2).await;
        ctx.add_to_cart(cart.uuid, mug.uuid, 5).await;

        let order = ctx
            .orders
            .checkout(cart.uuid, TestContext::checkout_fields())
            .await?;

        assert_eq!(order.status, OrderStatus::Paid);
        assert_eq!(order.total(), 2 * 45_00 + 5 * 18_00);
        assert_eq!(order.email.as_deref(), Some("buyer@example.com"));

        assert_eq!(ctx.products.get_product(board.uuid).await?.stock, 8);
        assert_eq!(ctx.products.get_product(mug.uuid).await?.stock, 1);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_empty_cart_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = ctx.create_cart().await;

        let result = ctx
            .orders
            .checkout(cart.uuid, TestContext::checkout_fields())
            .await;

        match result {
            Err(OrdersServiceError::Rejected(rejection)) => {
                assert!(rejection.has_field(CheckoutField::Items));
            }
            other => panic!("expected Rejected, got {other:?}"),
        }

        let order = ctx.orders.get_order(cart.uuid).await?;
        assert_eq!(order.status, OrderStatus::Pending);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_with_bad_fields_reports_them_all_and_mutates_nothing() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx.create_product("Board", 45_00, 10).await?;
        let cart = ctx.create_cart().await;
        ctx.add_to_cart(cart.uuid, product.uuid, 2).await;

        let fields = CheckoutFields {
            cc_num: "12".to_string(),
            cvv: "abc".to_string(),
            zip: String::new(),
            ..TestContext::checkout_fields()
        };

        let result = ctx.orders.checkout(cart.uuid, fields).await;

        match result {
            Err(OrdersServiceError::Rejected(rejection)) => {
                assert!(rejection.has_field(CheckoutField::CcNum));
                assert!(rejection.has_field(CheckoutField::Cvv));
                assert!(rejection.has_field(CheckoutField::Zip));
            }
            other => panic!("expected Rejected, got {other:?}"),
        }

        let order = ctx.orders.get_order(cart.uuid).await?;
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(ctx.products.get_product(product.uuid).await?.stock, 10);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_short_on_one_product_rejects_the_whole_order() -> TestResult {
        let ctx = TestContext::new().await;

        let plenty = ctx.create_product("Plenty", 10_00, 10).await?;
        let scarce = ctx.create_product("Scarce", 10_00, 5).await?;

        let cart = ctx.create_cart().await;
        ctx.add_to_cart(cart.uuid, plenty.uuid, 2).await;
        ctx.add_to_cart(cart.uuid, scarce.uuid, 4).await;

        // The shelf empties between adding to the cart and checking out.
        ctx.products
            .update_product(
                scarce.uuid,
                crate::domain::products::models::ProductUpdate {
                    name: scarce.name.clone(),
                    description: scarce.description.clone(),
                    price: scarce.price,
                    stock: 3,
                },
            )
            .await?;

        let result = ctx
            .orders
            .checkout(cart.uuid, TestContext::checkout_fields())
            .await;

        match result {
            Err(OrdersServiceError::Rejected(rejection)) => {
                assert!(rejection.has_field(CheckoutField::Quantity));
            }
            other => panic!("expected Rejected, got {other:?}"),
        }

        // Neither product moved: the checkout is all-or-nothing.
        assert_eq!(ctx.products.get_product(plenty.uuid).await?.stock, 10);
        assert_eq!(ctx.products.get_product(scarce.uuid).await?.stock, 3);
        assert_eq!(
            ctx.orders.get_order(cart.uuid).await?.status,
            OrderStatus::Pending
        );

        Ok(())
    }

    #[tokio::test]
    async fn checkout_twice_returns_not_pending() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx.create_product("Board", 45_00, 10).await?;
        let cart = ctx.create_cart().await;
        ctx.add_to_cart(cart.uuid, product.uuid, 1).await;

        ctx.orders
            .checkout(cart.uuid, TestContext::checkout_fields())
            .await?;

        let result = ctx
            .orders
            .checkout(cart.uuid, TestContext::checkout_fields())
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotPending)),
            "expected NotPending, got {result:?}"
        );

        assert_eq!(ctx.products.get_product(product.uuid).await?.stock, 9);

        Ok(())
    }

    #[tokio::test]
    async fn add_item_to_paid_order_returns_not_pending() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx.create_product("Board", 45_00, 10).await?;
        let cart = ctx.create_cart().await;
        ctx.add_to_cart(cart.uuid, product.uuid, 1).await;

        ctx.orders
            .checkout(cart.uuid, TestContext::checkout_fields())
            .await?;

        let result = ctx
            .orders
            .add_item(
                cart.uuid,
                NewOrderItem {
                    uuid: OrderItemUuid::new(),
                    product_uuid: product.uuid,
                    quantity: 1,
                },
            )
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotPending)),
            "expected NotPending, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn cancel_pending_cart_leaves_stock_alone() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx.create_product("Board", 45_00, 10).await?;
        let cart = ctx.create_cart().await;
        ctx.add_to_cart(cart.uuid, product.uuid, 4).await;

        let order = ctx.orders.cancel(cart.uuid).await?;

        assert_eq!(order.status, OrderStatus::Cancel);
        assert_eq!(ctx.products.get_product(product.uuid).await?.stock, 10);

        Ok(())
    }

    #[tokio::test]
    async fn cancel_paid_order_returns_stock() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx.create_product("Board", 45_00, 10).await?;
        let cart = ctx.create_cart().await;
        ctx.add_to_cart(cart.uuid, product.uuid, 4).await;

        ctx.orders
            .checkout(cart.uuid, TestContext::checkout_fields())
            .await?;
        assert_eq!(ctx.products.get_product(product.uuid).await?.stock, 6);

        let order = ctx.orders.cancel(cart.uuid).await?;

        assert_eq!(order.status, OrderStatus::Cancel);
        assert_eq!(ctx.products.get_product(product.uuid).await?.stock, 10);

        Ok(())
    }

    #[tokio::test]
    async fn cancel_paid_order_skips_retired_products() -> TestResult {
        let ctx = TestContext::new().await;

        let keep = ctx.create_product("Keep", 10_00, 10).await?;
        let retire = ctx.create_product("Retire", 10_00, 10).await?;

        let cart = ctx.create_cart().await;
        ctx.add_to_cart(cart.uuid, keep.uuid, 2).await;
        ctx.add_to_cart(cart.uuid, retire.uuid, 3).await;

        ctx.orders
            .checkout(cart.uuid, TestContext::checkout_fields())
            .await?;

        // The merchant discontinues one product before the cancellation.
        ctx.products.retire_product(retire.uuid).await?;

        let order = ctx.orders.cancel(cart.uuid).await?;

        assert_eq!(order.status, OrderStatus::Cancel);
        assert_eq!(ctx.products.get_product(keep.uuid).await?.stock, 10);
        assert_eq!(ctx.products.get_product(retire.uuid).await?.stock, 7);

        Ok(())
    }

    #[tokio::test]
    async fn cancel_terminal_order_is_refused() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx.create_product("Board", 45_00, 10).await?;
        let cart = ctx.create_cart().await;
        let item = ctx.add_to_cart(cart.uuid, product.uuid, 1).await;

        ctx.orders
            .checkout(cart.uuid, TestContext::checkout_fields())
            .await?;
        ctx.orders.mark_item_shipped(cart.uuid, item.uuid).await?;
        ctx.orders.try_complete(cart.uuid).await?;

        let result = ctx.orders.cancel(cart.uuid).await;
        assert!(
            matches!(result, Err(OrdersServiceError::Terminal)),
            "expected Terminal for complete order, got {result:?}"
        );

        let other_cart = ctx.create_cart().await;
        ctx.orders.cancel(other_cart.uuid).await?;

        let result = ctx.orders.cancel(other_cart.uuid).await;
        assert!(
            matches!(result, Err(OrdersServiceError::Terminal)),
            "expected Terminal for cancelled order, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn shipping_every_item_completes_the_order() -> TestResult {
        let ctx = TestContext::new().await;

        let board = ctx.create_product("Board", 45_00, 10).await?;
        let mug = ctx.create_product("Mug", 18_00, 10).await?;

        let cart = ctx.create_cart().await;
        let first = ctx.add_to_cart(cart.uuid, board.uuid, 1).await;
        let second = ctx.add_to_cart(cart.uuid, mug.uuid, 1).await;

        ctx.orders
            .checkout(cart.uuid, TestContext::checkout_fields())
            .await?;

        ctx.orders.mark_item_shipped(cart.uuid, first.uuid).await?;

        // One item still unshipped: the order stays paid.
        let order = ctx.orders.try_complete(cart.uuid).await?;
        assert_eq!(order.status, OrderStatus::Paid);

        ctx.orders.mark_item_shipped(cart.uuid, second.uuid).await?;

        let order = ctx.orders.try_complete(cart.uuid).await?;
        assert_eq!(order.status, OrderStatus::Complete);

        // Completing again changes nothing.
        let order = ctx.orders.try_complete(cart.uuid).await?;
        assert_eq!(order.status, OrderStatus::Complete);

        Ok(())
    }

    #[tokio::test]
    async fn try_complete_leaves_pending_orders_alone() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = ctx.create_cart().await;

        let order = ctx.orders.try_complete(cart.uuid).await?;

        assert_eq!(order.status, OrderStatus::Pending);

        Ok(())
    }

    #[tokio::test]
    async fn mark_item_shipped_requires_paid_order() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx.create_product("Board", 45_00, 10).await?;
        let cart = ctx.create_cart().await;
        let item = ctx.add_to_cart(cart.uuid, product.uuid, 1).await;

        let result = ctx.orders.mark_item_shipped(cart.uuid, item.uuid).await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotPaid)),
            "expected NotPaid, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn total_follows_the_current_product_price() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx.create_product("Board", 45_00, 10).await?;
        let cart = ctx.create_cart().await;
        ctx.add_to_cart(cart.uuid, product.uuid, 2).await;

        assert_eq!(ctx.orders.get_order(cart.uuid).await?.total(), 90_00);

        ctx.products
            .update_product(
                product.uuid,
                crate::domain::products::models::ProductUpdate {
                    name: product.name.clone(),
                    description: product.description.clone(),
                    price: 50_00,
                    stock: product.stock,
                },
            )
            .await?;

        assert_eq!(ctx.orders.get_order(cart.uuid).await?.total(), 100_00);

        Ok(())
    }

    #[tokio::test]
    async fn is_order_of_matches_item_merchants() -> TestResult {
        let ctx = TestContext::new().await;

        let other_merchant = ctx.create_merchant("Other").await;
        let ours = ctx.create_product("Ours", 10_00, 10).await?;
        let theirs = ctx
            .create_product_for(other_merchant, "Theirs", 10_00, 10)
            .await?;

        let cart = ctx.create_cart().await;
        ctx.add_to_cart(cart.uuid, ours.uuid, 1).await;
        ctx.add_to_cart(cart.uuid, theirs.uuid, 1).await;

        assert!(ctx.orders.is_order_of(cart.uuid, ctx.merchant_uuid).await?);
        assert!(ctx.orders.is_order_of(cart.uuid, other_merchant).await?);

        let uninvolved = ctx.create_merchant("Uninvolved").await;
        assert!(!ctx.orders.is_order_of(cart.uuid, uninvolved).await?);

        let result = ctx.orders.is_order_of(OrderUuid::new(), ctx.merchant_uuid).await;
        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound for unknown order, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn fulfillment_list_shows_only_paid_items_of_the_merchant() -> TestResult {
        let ctx = TestContext::new().await;

        let other_merchant = ctx.create_merchant("Other").await;
        let ours = ctx.create_product("Ours", 10_00, 10).await?;
        let theirs = ctx
            .create_product_for(other_merchant, "Theirs", 10_00, 10)
            .await?;

        let paid_cart = ctx.create_cart().await;
        let ours_item = ctx.add_to_cart(paid_cart.uuid, ours.uuid, 2).await;
        ctx.add_to_cart(paid_cart.uuid, theirs.uuid, 1).await;
        ctx.orders
            .checkout(paid_cart.uuid, TestContext::checkout_fields())
            .await?;

        // A cart that never checked out must not show up.
        let open_cart = ctx.create_cart().await;
        ctx.add_to_cart(open_cart.uuid, ours.uuid, 1).await;

        let queue = ctx.orders.list_fulfillment_items(ctx.merchant_uuid).await?;

        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].item_uuid, ours_item.uuid);
        assert_eq!(queue[0].order_uuid, paid_cart.uuid);
        assert_eq!(queue[0].quantity, 2);
        assert!(!queue[0].shipped);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_checkouts_cannot_oversell() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx.create_product("Contested", 10_00, 10).await?;

        let cart_a = ctx.create_cart().await;
        ctx.add_to_cart(cart_a.uuid, product.uuid, 6).await;

        let cart_b = ctx.create_cart().await;
        ctx.add_to_cart(cart_b.uuid, product.uuid, 6).await;

        let orders_a = ctx.orders.clone();
        let orders_b = ctx.orders.clone();

        let (first, second) = tokio::join!(
            tokio::spawn(async move {
                orders_a
                    .checkout(cart_a.uuid, TestContext::checkout_fields())
                    .await
            }),
            tokio::spawn(async move {
                orders_b
                    .checkout(cart_b.uuid, TestContext::checkout_fields())
                    .await
            }),
        );

        let results = [first?, second?];
        let successes = results.iter().filter(|r| r.is_ok()).count();

        assert_eq!(successes, 1, "exactly one checkout may win the stock");
        assert!(
            results
                .iter()
                .any(|r| matches!(r, Err(OrdersServiceError::Rejected(_)))),
            "the loser must be rejected, got {results:?}"
        );

        assert_eq!(ctx.products.get_product(product.uuid).await?.stock, 4);

        Ok(())
    }
}
