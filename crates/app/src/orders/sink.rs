//! Order sink.

use async_trait::async_trait;
use mockall::automock;
use platter::checkout::{Order, OrderId};

use crate::orders::errors::OrderSinkError;

#[automock]
#[async_trait]
pub trait OrderSink: Send + Sync {
    /// Store an order and its lines, returning the id it was stored under.
    async fn create_order(&self, order: &Order) -> Result<OrderId, OrderSinkError>;
}
