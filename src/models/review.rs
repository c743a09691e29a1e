use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_REVIEW_ROLE: &str = "Attendee";
pub const DEFAULT_REVIEW_BG_COLOR: &str = "#F5F5F5";

/// Per-event attendee feedback. At most one per (event, user) pair,
/// enforced by a unique compound index. No edit path; the author may
/// hard-delete it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: String,
    pub quote: String,
    /// Reviewer display name, denormalized at creation.
    pub name: String,
    pub role: String,
    /// Avatar reference, denormalized from the user record.
    pub avatar: String,
    pub rating: i32,
    pub bg_color: String,
    /// Event id.
    pub event: String,
    /// Author user id.
    pub user: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Review {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        quote: String,
        name: String,
        role: String,
        avatar: String,
        rating: i32,
        bg_color: String,
        event: String,
        user: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            quote,
            name,
            role,
            avatar,
            rating,
            bg_color,
            event,
            user,
            created_at: Utc::now(),
        }
    }
}
