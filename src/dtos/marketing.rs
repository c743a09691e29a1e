use crate::models::{Contact, NewsletterPreferences, NewsletterSubscriber};
use crate::services::marketing::PreferenceStats;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Contact form. Fields are optional at the serde layer so a missing
/// field surfaces as a 400 validation failure rather than a decode error.
#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    #[validate(required(message = "Name is required"), length(min = 1, message = "Name is required"))]
    pub name: Option<String>,

    #[validate(required(message = "Email is required"), email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(required(message = "Subject is required"), length(min = 1, message = "Subject is required"))]
    pub subject: Option<String>,

    #[validate(required(message = "Message is required"), length(min = 1, message = "Message is required"))]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub message: String,
    pub contact: ContactItem,
}

#[derive(Debug, Serialize)]
pub struct ContactItem {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub created_at: String,
}

impl From<Contact> for ContactItem {
    fn from(c: Contact) -> Self {
        Self {
            id: c.id,
            name: c.name,
            email: c.email,
            subject: c.subject,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewsletterRequest {
    #[validate(required(message = "Name is required"), length(min = 1, message = "Name is required"))]
    pub name: Option<String>,

    #[validate(required(message = "Email is required"), email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(required(message = "Preferences are required"))]
    pub preferences: Option<NewsletterPreferences>,
}

#[derive(Debug, Serialize)]
pub struct SubscriberResponse {
    pub message: String,
    pub subscriber: SubscriberItem,
}

#[derive(Debug, Serialize)]
pub struct SubscriberItem {
    pub id: String,
    pub name: String,
    pub email: String,
    pub preferences: NewsletterPreferences,
    pub subscribed_at: String,
}

impl From<NewsletterSubscriber> for SubscriberItem {
    fn from(s: NewsletterSubscriber) -> Self {
        Self {
            id: s.id,
            name: s.name,
            email: s.email,
            preferences: s.preferences,
            subscribed_at: s.subscribed_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NewsletterStatsResponse {
    pub subscriber_count: u64,
    pub preference_stats: PreferenceStats,
}
