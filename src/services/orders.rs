use crate::error::AppError;
use crate::models::Order;
use crate::services::database::{is_duplicate_key, EventDb};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{doc, from_document};
use serde::Deserialize;

/// Order row joined with its event, for buyer-side listings.
#[derive(Debug, Deserialize)]
pub struct UserOrderRow {
    #[serde(rename = "_id")]
    pub id: String,
    pub event_id: String,
    pub event_title: String,
    pub organizer_name: String,
    pub total_amount: i64,
    pub price: f64,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

/// Order row joined with its buyer, for organizer-side reporting.
#[derive(Debug, Deserialize)]
pub struct EventOrderRow {
    #[serde(rename = "_id")]
    pub id: String,
    pub event_id: String,
    pub event_title: String,
    pub buyer: String,
    pub total_amount: i64,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct OrderRepository {
    db: EventDb,
}

impl OrderRepository {
    pub fn new(db: EventDb) -> Self {
        Self { db }
    }

    /// Insert the order recorded for a checkout session. The unique index
    /// on the session id rejects a repeat write for the same session.
    pub async fn create(&self, order: Order) -> Result<(), AppError> {
        self.db.orders().insert_one(&order, None).await.map_err(|e| {
            if is_duplicate_key(&e) {
                AppError::BookingError(anyhow::anyhow!(
                    "An order already exists for this checkout session"
                ))
            } else {
                AppError::from(e)
            }
        })?;
        Ok(())
    }

    /// Buyer's orders, newest first, at most one per distinct event.
    ///
    /// Pagination follows the raw order stream (the original behavior);
    /// the page total counts distinct events.
    pub async fn list_by_user(
        &self,
        user_id: &str,
        page: u64,
        limit: i64,
    ) -> Result<(Vec<UserOrderRow>, u64), AppError> {
        let filter = doc! { "buyer": user_id };

        let distinct_events = self.db.orders().distinct("event", filter.clone(), None).await?;
        let total_pages = (distinct_events.len() as u64).div_ceil(limit.max(1) as u64);

        let skip = (page.saturating_sub(1)) * limit.max(1) as u64;
        let pipeline = vec![
            doc! { "$match": filter },
            doc! { "$sort": { "created_at": -1 } },
            doc! { "$skip": skip as i64 },
            doc! { "$limit": limit },
            doc! { "$lookup": {
                "from": "events",
                "localField": "event",
                "foreignField": "_id",
                "as": "event_doc",
            }},
            doc! { "$unwind": "$event_doc" },
            doc! { "$lookup": {
                "from": "users",
                "localField": "event_doc.organizer",
                "foreignField": "_id",
                "as": "organizer_doc",
            }},
            doc! { "$unwind": "$organizer_doc" },
            doc! { "$project": {
                "_id": 1,
                "total_amount": 1,
                "price": 1,
                "created_at": 1,
                "event_id": "$event_doc._id",
                "event_title": "$event_doc.title",
                "organizer_name": {
                    "$concat": ["$organizer_doc.first_name", " ", "$organizer_doc.last_name"]
                },
            }},
        ];

        let mut cursor = self.db.orders().aggregate(pipeline, None).await?;
        let mut rows = Vec::new();
        let mut seen_events = std::collections::HashSet::new();
        while let Some(document) = cursor.try_next().await? {
            let row: UserOrderRow = from_document(document)
                .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
            if seen_events.insert(row.event_id.clone()) {
                rows.push(row);
            }
        }

        Ok((rows, total_pages))
    }

    /// Organizer-side search over an event's orders by buyer display name,
    /// case-insensitive substring match.
    pub async fn list_by_event(
        &self,
        event_id: &str,
        search: &str,
    ) -> Result<Vec<EventOrderRow>, AppError> {
        let pipeline = vec![
            doc! { "$lookup": {
                "from": "users",
                "localField": "buyer",
                "foreignField": "_id",
                "as": "buyer_doc",
            }},
            doc! { "$unwind": "$buyer_doc" },
            doc! { "$lookup": {
                "from": "events",
                "localField": "event",
                "foreignField": "_id",
                "as": "event_doc",
            }},
            doc! { "$unwind": "$event_doc" },
            doc! { "$project": {
                "_id": 1,
                "total_amount": 1,
                "created_at": 1,
                "event_id": "$event_doc._id",
                "event_title": "$event_doc.title",
                "buyer": {
                    "$concat": ["$buyer_doc.first_name", " ", "$buyer_doc.last_name"]
                },
            }},
            doc! { "$match": {
                "$and": [
                    { "event_id": event_id },
                    { "buyer": { "$regex": search, "$options": "i" } },
                ],
            }},
        ];

        let mut cursor = self.db.orders().aggregate(pipeline, None).await?;
        let mut rows = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            rows.push(
                from_document(document).map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?,
            );
        }
        Ok(rows)
    }

    /// At least one order placed by this buyer.
    pub async fn buyer_has_orders(&self, user_id: &str) -> Result<bool, AppError> {
        let order = self
            .db
            .orders()
            .find_one(doc! { "buyer": user_id }, None)
            .await?;
        Ok(order.is_some())
    }
}
