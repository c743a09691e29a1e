use crate::models::{Statistics, Testimonial, TestimonialStatus};
use crate::services::testimonials::TestimonialRow;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTestimonialRequest {
    #[validate(length(min = 1, message = "Testimonial text is required"))]
    pub text: String,

    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
}

/// Moderation verdict. Only `approved` and `rejected` are accepted; the
/// handler rejects anything else before touching the store.
#[derive(Debug, Deserialize)]
pub struct ModerateTestimonialRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct TestimonialResponse {
    pub id: String,
    pub user_id: String,
    pub text: String,
    pub role: String,
    pub rating: i32,
    pub status: TestimonialStatus,
    pub created_at: String,
}

impl From<Testimonial> for TestimonialResponse {
    fn from(t: Testimonial) -> Self {
        Self {
            id: t.id,
            user_id: t.user,
            text: t.text,
            role: t.role,
            rating: t.rating,
            status: t.status,
            created_at: t.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TestimonialItem {
    pub id: String,
    pub user_id: String,
    pub submitter_name: String,
    pub text: String,
    pub role: String,
    pub rating: i32,
    pub status: TestimonialStatus,
    pub created_at: String,
}

impl From<TestimonialRow> for TestimonialItem {
    fn from(row: TestimonialRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user,
            submitter_name: row.submitter_name,
            text: row.text,
            role: row.role,
            rating: row.rating,
            status: row.status,
            created_at: row.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TestimonialListResponse {
    pub testimonials: Vec<TestimonialItem>,
}

#[derive(Debug, Serialize)]
pub struct StatisticsResponse {
    pub total_testimonials: i64,
    pub approved_testimonials: i64,
    pub pending_testimonials: i64,
    pub rejected_testimonials: i64,
    pub total_dollars_generated: i64,
    pub last_updated: String,
}

impl From<Statistics> for StatisticsResponse {
    fn from(s: Statistics) -> Self {
        Self {
            total_testimonials: s.total_testimonials,
            approved_testimonials: s.approved_testimonials,
            pending_testimonials: s.pending_testimonials,
            rejected_testimonials: s.rejected_testimonials,
            total_dollars_generated: s.total_dollars_generated,
            last_updated: s.last_updated.to_rfc3339(),
        }
    }
}
