use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event listing, referenced by orders and reviews.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    /// User id of the organizer.
    pub organizer: String,
    /// Ticket price in major currency units.
    pub price: f64,
    pub is_free: bool,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn new(title: String, organizer: String, price: f64, is_free: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            organizer,
            price,
            is_free,
            created_at: Utc::now(),
        }
    }
}
