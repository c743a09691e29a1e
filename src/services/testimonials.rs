use crate::error::AppError;
use crate::models::{
    testimonial::DOLLARS_PER_TESTIMONIAL, Statistics, Testimonial, TestimonialStatus,
};
use crate::services::database::EventDb;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, from_document, DateTime as BsonDateTime},
    options::{FindOneAndUpdateOptions, ReturnDocument},
};
use serde::Deserialize;

/// Testimonial joined with its submitter's display name.
#[derive(Debug, Deserialize)]
pub struct TestimonialRow {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: String,
    pub submitter_name: String,
    pub text: String,
    pub role: String,
    pub rating: i32,
    pub status: TestimonialStatus,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct TestimonialRepository {
    db: EventDb,
}

impl TestimonialRepository {
    pub fn new(db: EventDb) -> Self {
        Self { db }
    }

    /// A user may submit a testimonial once they have organized an event
    /// or bought an order. Order eligibility is checked by the caller
    /// against the order repository.
    pub async fn user_has_organized_events(&self, user_id: &str) -> Result<bool, AppError> {
        let event = self
            .db
            .events()
            .find_one(doc! { "organizer": user_id }, None)
            .await?;
        Ok(event.is_some())
    }

    /// Insert the testimonial, then apply the submission counter bundle
    /// (total +1, pending +1, dollars +credit) as one atomic `$inc` upsert.
    /// A failure after the insert surfaces as a server error; the counters
    /// are never adjusted piecemeal.
    pub async fn create(&self, testimonial: Testimonial) -> Result<Testimonial, AppError> {
        self.db.testimonials().insert_one(&testimonial, None).await?;

        self.apply_statistics_update(doc! {
            "$inc": {
                "total_testimonials": 1_i64,
                "pending_testimonials": 1_i64,
                "total_dollars_generated": DOLLARS_PER_TESTIMONIAL,
            },
            "$set": { "last_updated": BsonDateTime::now() },
        })
        .await?;

        Ok(testimonial)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Testimonial>, AppError> {
        Ok(self.db.testimonials().find_one(doc! { "_id": id }, None).await?)
    }

    /// Re-point the testimonial's status and shift the per-status counters
    /// by -1 outgoing / +1 incoming in a single statistics update.
    pub async fn set_status(
        &self,
        id: &str,
        from: TestimonialStatus,
        to: TestimonialStatus,
    ) -> Result<Testimonial, AppError> {
        let updated = self
            .db
            .testimonials()
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": { "status": to.as_str() } },
                FindOneAndUpdateOptions::builder()
                    .return_document(ReturnDocument::After)
                    .build(),
            )
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Testimonial not found")))?;

        if from != to {
            let mut deltas = mongodb::bson::Document::new();
            deltas.insert(from.counter_field(), -1_i64);
            deltas.insert(to.counter_field(), 1_i64);
            self.apply_statistics_update(doc! {
                "$inc": deltas,
                "$set": { "last_updated": BsonDateTime::now() },
            })
            .await?;
        }

        Ok(updated)
    }

    /// Up to `limit` most recent approved testimonials with submitter names.
    pub async fn list_approved(&self, limit: i64) -> Result<Vec<TestimonialRow>, AppError> {
        self.list(Some(doc! { "status": "approved" }), Some(limit)).await
    }

    /// All testimonials, newest first, with submitter names.
    pub async fn list_all(&self) -> Result<Vec<TestimonialRow>, AppError> {
        self.list(None, None).await
    }

    async fn list(
        &self,
        filter: Option<mongodb::bson::Document>,
        limit: Option<i64>,
    ) -> Result<Vec<TestimonialRow>, AppError> {
        let mut pipeline = Vec::new();
        if let Some(filter) = filter {
            pipeline.push(doc! { "$match": filter });
        }
        pipeline.push(doc! { "$sort": { "created_at": -1 } });
        if let Some(limit) = limit {
            pipeline.push(doc! { "$limit": limit });
        }
        pipeline.extend([
            doc! { "$lookup": {
                "from": "users",
                "localField": "user",
                "foreignField": "_id",
                "as": "user_doc",
            }},
            doc! { "$unwind": "$user_doc" },
            doc! { "$project": {
                "_id": 1,
                "user": 1,
                "text": 1,
                "role": 1,
                "rating": 1,
                "status": 1,
                "created_at": 1,
                "submitter_name": {
                    "$concat": ["$user_doc.first_name", " ", "$user_doc.last_name"]
                },
            }},
        ]);

        let mut cursor = self.db.testimonials().aggregate(pipeline, None).await?;
        let mut rows = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            rows.push(
                from_document(document).map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?,
            );
        }
        Ok(rows)
    }

    /// The singleton aggregate, created with zeroed counters on first read.
    pub async fn get_or_create_statistics(&self) -> Result<Statistics, AppError> {
        let statistics = self
            .db
            .statistics()
            .find_one_and_update(
                doc! {},
                doc! { "$setOnInsert": {
                    "total_testimonials": 0_i64,
                    "approved_testimonials": 0_i64,
                    "pending_testimonials": 0_i64,
                    "rejected_testimonials": 0_i64,
                    "total_dollars_generated": 0_i64,
                    "last_updated": BsonDateTime::now(),
                }},
                FindOneAndUpdateOptions::builder()
                    .upsert(true)
                    .return_document(ReturnDocument::After)
                    .build(),
            )
            .await?
            .ok_or_else(|| {
                AppError::InternalError(anyhow::anyhow!("Statistics upsert returned no document"))
            })?;
        Ok(statistics)
    }

    /// All counter mutations route through a single `$inc` upsert so the
    /// bundle applies atomically under concurrent writers.
    async fn apply_statistics_update(
        &self,
        update: mongodb::bson::Document,
    ) -> Result<(), AppError> {
        self.db
            .statistics()
            .find_one_and_update(
                doc! {},
                update,
                FindOneAndUpdateOptions::builder().upsert(true).build(),
            )
            .await?;
        Ok(())
    }
}
