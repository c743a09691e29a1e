use crate::models::Review;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(length(min = 1, message = "Event ID is required"))]
    pub event_id: String,

    /// Trimmed length is enforced at the handler; the derive only checks
    /// the raw field.
    #[validate(length(min = 10, message = "Review text must be at least 10 characters"))]
    pub quote: String,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    pub role: Option<String>,
    pub bg_color: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: String,
    pub quote: String,
    pub name: String,
    pub role: String,
    pub avatar: String,
    pub rating: i32,
    pub bg_color: String,
    pub event_id: String,
    pub user_id: String,
    pub created_at: String,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            quote: review.quote,
            name: review.name,
            role: review.role,
            avatar: review.avatar,
            rating: review.rating,
            bg_color: review.bg_color,
            event_id: review.event,
            user_id: review.user,
            created_at: review.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewListResponse {
    pub data: Vec<ReviewResponse>,
    pub total_pages: u64,
}

#[derive(Debug, Deserialize)]
pub struct ReviewListQuery {
    pub page: Option<u64>,
    pub limit: Option<i64>,
}

/// Ring navigation addresses a review within one event's ring.
#[derive(Debug, Deserialize)]
pub struct RingQuery {
    pub event_id: String,
}
