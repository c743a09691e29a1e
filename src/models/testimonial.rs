use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Credit added to `total_dollars_generated` per submitted testimonial.
pub const DOLLARS_PER_TESTIMONIAL: i64 = 5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TestimonialStatus {
    Pending,
    Approved,
    Rejected,
}

impl TestimonialStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestimonialStatus::Pending => "pending",
            TestimonialStatus::Approved => "approved",
            TestimonialStatus::Rejected => "rejected",
        }
    }

    /// Statistics counter field tracking this status.
    pub fn counter_field(&self) -> &'static str {
        match self {
            TestimonialStatus::Pending => "pending_testimonials",
            TestimonialStatus::Approved => "approved_testimonials",
            TestimonialStatus::Rejected => "rejected_testimonials",
        }
    }
}

/// Site-wide marketing endorsement. Enters as `pending`; moderation moves
/// it to `approved` or `rejected` (and may flip between those two); a
/// testimonial never re-enters `pending`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Testimonial {
    #[serde(rename = "_id")]
    pub id: String,
    /// Submitter user id.
    pub user: String,
    pub text: String,
    pub role: String,
    pub rating: i32,
    pub status: TestimonialStatus,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Testimonial {
    pub fn new(user: String, text: String, role: String, rating: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user,
            text,
            role,
            rating,
            status: TestimonialStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

/// Singleton aggregate over testimonial statuses.
///
/// Counters are maintained by `$inc` updates applied in the same document
/// write as each status transition; they are never recomputed from scratch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub total_testimonials: i64,
    #[serde(default)]
    pub approved_testimonials: i64,
    #[serde(default)]
    pub pending_testimonials: i64,
    #[serde(default)]
    pub rejected_testimonials: i64,
    #[serde(default)]
    pub total_dollars_generated: i64,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub last_updated: DateTime<Utc>,
}
