use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsletterPreferences {
    #[serde(default)]
    pub event_alerts: bool,
    #[serde(default)]
    pub monthly_calendar: bool,
    #[serde(default)]
    pub industry_insights: bool,
    #[serde(default)]
    pub exclusive_offers: bool,
}

/// Newsletter subscriber keyed by email (unique index, lowercased).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsletterSubscriber {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub preferences: NewsletterPreferences,
    pub is_active: bool,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub subscribed_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl NewsletterSubscriber {
    pub fn new(name: String, email: String, preferences: NewsletterPreferences) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email: email.trim().to_lowercase(),
            preferences,
            is_active: true,
            subscribed_at: now,
            updated_at: now,
        }
    }
}
