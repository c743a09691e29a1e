use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Purchase record correlated with a provider checkout session.
///
/// Written as soon as the hosted session is created, so an order can exist
/// for a checkout the buyer later abandons. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,
    /// Provider checkout session id. Unique index.
    pub stripe_session_id: String,
    /// Event id.
    pub event: String,
    /// Buyer user id.
    pub buyer: String,
    /// Total the provider reported for the session, in minor units.
    pub total_amount: i64,
    /// Listed ticket price in major units at time of purchase.
    pub price: f64,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn new(
        stripe_session_id: String,
        event: String,
        buyer: String,
        total_amount: i64,
        price: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            stripe_session_id,
            event,
            buyer,
            total_amount,
            price,
            created_at: Utc::now(),
        }
    }
}
