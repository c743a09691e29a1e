use crate::error::AppError;
use crate::models::{Contact, NewsletterPreferences, NewsletterSubscriber};
use crate::services::database::EventDb;
use futures::TryStreamExt;
use mongodb::bson::{doc, from_document, to_bson, DateTime as BsonDateTime};
use serde::Deserialize;

/// Per-preference subscriber counts.
#[derive(Debug, Default, Deserialize, serde::Serialize)]
pub struct PreferenceStats {
    #[serde(default)]
    pub event_alerts: i64,
    #[serde(default)]
    pub monthly_calendar: i64,
    #[serde(default)]
    pub industry_insights: i64,
    #[serde(default)]
    pub exclusive_offers: i64,
}

#[derive(Clone)]
pub struct MarketingRepository {
    db: EventDb,
}

impl MarketingRepository {
    pub fn new(db: EventDb) -> Self {
        Self { db }
    }

    pub async fn create_contact(&self, contact: Contact) -> Result<Contact, AppError> {
        self.db.contacts().insert_one(&contact, None).await?;
        Ok(contact)
    }

    /// Subscribe or re-subscribe. Email is the natural key: an existing
    /// subscriber gets their name and preferences replaced. Returns the
    /// stored record and whether it was newly created.
    pub async fn upsert_subscriber(
        &self,
        name: &str,
        email: &str,
        preferences: NewsletterPreferences,
    ) -> Result<(NewsletterSubscriber, bool), AppError> {
        let email = email.trim().to_lowercase();

        let existing = self
            .db
            .newsletter()
            .find_one(doc! { "email": &email }, None)
            .await?;

        match existing {
            Some(mut subscriber) => {
                let preferences_bson = to_bson(&preferences)
                    .map_err(|e| AppError::InternalError(anyhow::anyhow!(e)))?;
                self.db
                    .newsletter()
                    .update_one(
                        doc! { "_id": &subscriber.id },
                        doc! { "$set": {
                            "name": name,
                            "preferences": preferences_bson,
                            "is_active": true,
                            "updated_at": BsonDateTime::now(),
                        }},
                        None,
                    )
                    .await?;
                subscriber.name = name.to_string();
                subscriber.preferences = preferences;
                subscriber.is_active = true;
                Ok((subscriber, false))
            }
            None => {
                let subscriber =
                    NewsletterSubscriber::new(name.to_string(), email, preferences);
                self.db.newsletter().insert_one(&subscriber, None).await?;
                Ok((subscriber, true))
            }
        }
    }

    /// Total subscriber count plus per-preference tallies.
    pub async fn newsletter_stats(&self) -> Result<(u64, PreferenceStats), AppError> {
        let count = self.db.newsletter().count_documents(doc! {}, None).await?;

        let pipeline = vec![doc! { "$group": {
            "_id": null,
            "event_alerts": { "$sum": { "$cond": ["$preferences.event_alerts", 1, 0] } },
            "monthly_calendar": { "$sum": { "$cond": ["$preferences.monthly_calendar", 1, 0] } },
            "industry_insights": { "$sum": { "$cond": ["$preferences.industry_insights", 1, 0] } },
            "exclusive_offers": { "$sum": { "$cond": ["$preferences.exclusive_offers", 1, 0] } },
        }}];

        let mut cursor = self.db.newsletter().aggregate(pipeline, None).await?;
        let stats = match cursor.try_next().await? {
            Some(document) => {
                from_document(document).map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?
            }
            None => PreferenceStats::default(),
        };

        Ok((count, stats))
    }
}
