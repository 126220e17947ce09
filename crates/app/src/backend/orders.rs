//! Order tables.

use async_trait::async_trait;
use platter::checkout::{Order, OrderId};
use reqwest::Method;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    backend::{
        BackendError, RestBackend, check,
        rows::{CreatedRow, OrderItemRow, OrderRow},
    },
    orders::{OrderSink, OrderSinkError},
};

impl RestBackend {
    async fn insert_order_items(&self, items: &[OrderItemRow<'_>]) -> Result<(), BackendError> {
        let response = self
            .request(Method::POST, "rest/v1/order_items")
            .header("Prefer", "return=minimal")
            .json(items)
            .send()
            .await?;

        check(response).await?;

        Ok(())
    }

    async fn delete_order(&self, order_id: Uuid) -> Result<(), BackendError> {
        let response = self
            .request(Method::DELETE, &format!("rest/v1/orders?id=eq.{order_id}"))
            .send()
            .await?;

        check(response).await?;

        Ok(())
    }
}

#[async_trait]
impl OrderSink for RestBackend {
    /// Insert the order row, then one row per line under the stored id. If the
    /// lines are rejected the order row is deleted again.
    #[instrument(skip_all, fields(order_id = %order.id()))]
    async fn create_order(&self, order: &Order) -> Result<OrderId, OrderSinkError> {
        let response = self
            .request(Method::POST, "rest/v1/orders")
            .header("Prefer", "return=representation")
            .json(&[OrderRow::from(order)])
            .send()
            .await
            .map_err(BackendError::from)?;

        let created: Vec<CreatedRow> = check(response)
            .await?
            .json()
            .await
            .map_err(BackendError::from)?;

        let order_id = created
            .first()
            .map(|row| row.id)
            .ok_or_else(|| BackendError::UnexpectedResponse("no order row returned".to_string()))?;

        let items: Vec<OrderItemRow<'_>> = order
            .lines()
            .iter()
            .map(|line| OrderItemRow {
                order_id,
                menu_item_id: line.item_id,
                name: &line.name,
                unit_price: line.unit_price,
                quantity: line.quantity,
            })
            .collect();

        if let Err(rejected) = self.insert_order_items(&items).await {
            warn!(%order_id, error = %rejected, "order lines rejected, removing order row");

            if let Err(cleanup) = self.delete_order(order_id).await {
                error!(%order_id, error = %cleanup, "order row left without lines");
            }

            return Err(rejected.into());
        }

        info!(%order_id, lines = items.len(), "order stored");

        Ok(OrderId::from_uuid(order_id))
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    use axum::{
        Json, Router,
        extract::{Query, State},
        http::StatusCode,
        routing::{MethodRouter, post},
    };
    use jiff::Timestamp;
    use platter::{
        cart::Cart,
        checkout::{DeliveryDetails, OrderDraft},
    };
    use rust_decimal::Decimal;
    use serde_json::{Value, json};
    use testresult::TestResult;
    use tokio::net::TcpListener;

    use super::*;
    use crate::{backend::BackendConfig, test::fixtures::menu_item};

    /// Order rows the fake backend currently holds.
    type Rows = Arc<Mutex<Vec<Uuid>>>;

    async fn insert_order(
        State(rows): State<Rows>,
        Json(body): Json<Vec<Value>>,
    ) -> (StatusCode, Json<Value>) {
        let id = body
            .first()
            .and_then(|row| row.get("id"))
            .and_then(Value::as_str)
            .and_then(|id| id.parse::<Uuid>().ok())
            .unwrap_or_else(Uuid::now_v7);

        if let Ok(mut rows) = rows.lock() {
            rows.push(id);
        }

        (StatusCode::CREATED, Json(json!([{ "id": id }])))
    }

    async fn delete_order(
        State(rows): State<Rows>,
        Query(params): Query<HashMap<String, String>>,
    ) -> StatusCode {
        let id = params
            .get("id")
            .and_then(|filter| filter.strip_prefix("eq."))
            .and_then(|id| id.parse::<Uuid>().ok());

        if let (Some(id), Ok(mut rows)) = (id, rows.lock()) {
            rows.retain(|row| *row != id);
        }

        StatusCode::NO_CONTENT
    }

    async fn reject_items() -> (StatusCode, Json<Value>) {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "items insert failed" })),
        )
    }

    async fn accept_items() -> StatusCode {
        StatusCode::CREATED
    }

    /// Serve the orders tables on a local port.
    async fn serve(items: MethodRouter<Rows>) -> TestResult<(RestBackend, Rows)> {
        let rows = Rows::default();
        let app = Router::new()
            .route("/rest/v1/orders", post(insert_order).delete(delete_order))
            .route("/rest/v1/order_items", items)
            .with_state(Arc::clone(&rows));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let address = listener.local_addr()?;

        tokio::spawn(async move { axum::serve(listener, app).await });

        let backend = RestBackend::new(BackendConfig {
            url: format!("http://{address}"),
            anon_key: "anon".to_string(),
        });

        Ok((backend, rows))
    }

    fn order() -> TestResult<Order> {
        let mut cart = Cart::new();
        cart.add_item(&menu_item("Ramen", Decimal::from(12)));

        let delivery = DeliveryDetails {
            delivery_address: "1 Main St".to_string(),
            phone_number: "5551234567".to_string(),
            ..DeliveryDetails::default()
        }
        .validate()?;

        let draft = OrderDraft::snapshot(&cart, None, None, delivery);

        Ok(Order::place(OrderId::now_v7(), draft, Timestamp::now())?)
    }

    fn stored(rows: &Rows) -> usize {
        rows.lock().map(|rows| rows.len()).unwrap_or_default()
    }

    #[tokio::test]
    async fn rejected_lines_leave_no_order_behind() -> TestResult {
        let (backend, rows) = serve(post(reject_items)).await?;

        let first = backend.create_order(&order()?).await;
        let second = backend.create_order(&order()?).await;

        assert!(matches!(first, Err(OrderSinkError::Unavailable(_))));
        assert!(matches!(second, Err(OrderSinkError::Unavailable(_))));
        assert_eq!(stored(&rows), 0);

        Ok(())
    }

    #[tokio::test]
    async fn stored_order_keeps_its_row() -> TestResult {
        let (backend, rows) = serve(post(accept_items)).await?;
        let order = order()?;

        let id = backend.create_order(&order).await?;

        assert_eq!(id, order.id());
        assert_eq!(stored(&rows), 1);

        Ok(())
    }
}
