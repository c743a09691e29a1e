use crate::services::orders::{EventOrderRow, UserOrderRow};
use serde::{Deserialize, Serialize};

/// Purchase intent as submitted by the storefront.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub event_id: Option<String>,
    pub event_title: Option<String>,
    /// Ticket price in major units; ignored when `is_free`.
    pub price: Option<f64>,
    #[serde(default)]
    pub is_free: bool,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    /// Hosted checkout URL for client-side redirect.
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct UserOrdersQuery {
    pub page: Option<u64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct UserOrderItem {
    pub id: String,
    pub event_id: String,
    pub event_title: String,
    pub organizer_name: String,
    pub total_amount: i64,
    pub price: f64,
    pub created_at: String,
}

impl From<UserOrderRow> for UserOrderItem {
    fn from(row: UserOrderRow) -> Self {
        Self {
            id: row.id,
            event_id: row.event_id,
            event_title: row.event_title,
            organizer_name: row.organizer_name,
            total_amount: row.total_amount,
            price: row.price,
            created_at: row.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserOrdersResponse {
    pub data: Vec<UserOrderItem>,
    pub total_pages: u64,
}

#[derive(Debug, Deserialize)]
pub struct EventOrdersQuery {
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Serialize)]
pub struct EventOrderItem {
    pub id: String,
    pub event_id: String,
    pub event_title: String,
    pub buyer: String,
    pub total_amount: i64,
    pub created_at: String,
}

impl From<EventOrderRow> for EventOrderItem {
    fn from(row: EventOrderRow) -> Self {
        Self {
            id: row.id,
            event_id: row.event_id,
            event_title: row.event_title,
            buyer: row.buyer,
            total_amount: row.total_amount,
            created_at: row.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventOrdersResponse {
    pub data: Vec<EventOrderItem>,
}
