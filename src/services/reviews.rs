use crate::error::AppError;
use crate::models::Review;
use crate::services::database::{is_duplicate_key, EventDb};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, DateTime as BsonDateTime},
    options::{FindOneOptions, FindOptions},
};

#[derive(Clone)]
pub struct ReviewRepository {
    db: EventDb,
}

impl ReviewRepository {
    pub fn new(db: EventDb) -> Self {
        Self { db }
    }

    /// Insert a review. The unique (event, user) index turns a concurrent
    /// double-submit into the same error as the pre-check.
    pub async fn create(&self, review: Review) -> Result<Review, AppError> {
        self.db.reviews().insert_one(&review, None).await.map_err(|e| {
            if is_duplicate_key(&e) {
                AppError::ReviewError(anyhow::anyhow!("You have already reviewed this event"))
            } else {
                AppError::from(e)
            }
        })?;
        Ok(review)
    }

    pub async fn exists_for(&self, event_id: &str, user_id: &str) -> Result<bool, AppError> {
        let existing = self
            .db
            .reviews()
            .find_one(doc! { "event": event_id, "user": user_id }, None)
            .await?;
        Ok(existing.is_some())
    }

    pub async fn find_by_id(&self, review_id: &str) -> Result<Option<Review>, AppError> {
        Ok(self.db.reviews().find_one(doc! { "_id": review_id }, None).await?)
    }

    pub async fn list_by_event(
        &self,
        event_id: &str,
        page: u64,
        limit: i64,
    ) -> Result<(Vec<Review>, u64), AppError> {
        self.list(doc! { "event": event_id }, page, limit).await
    }

    pub async fn list_by_user(
        &self,
        user_id: &str,
        page: u64,
        limit: i64,
    ) -> Result<(Vec<Review>, u64), AppError> {
        self.list(doc! { "user": user_id }, page, limit).await
    }

    async fn list(
        &self,
        filter: mongodb::bson::Document,
        page: u64,
        limit: i64,
    ) -> Result<(Vec<Review>, u64), AppError> {
        let total = self.db.reviews().count_documents(filter.clone(), None).await?;
        let total_pages = total.div_ceil(limit.max(1) as u64);

        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .skip(page.saturating_sub(1) * limit.max(1) as u64)
            .limit(limit)
            .build();
        let cursor = self.db.reviews().find(filter, Some(options)).await?;
        let reviews: Vec<Review> = cursor.try_collect().await?;

        Ok((reviews, total_pages))
    }

    /// Next review in the ring: the next-older one for the same event,
    /// wrapping to the newest when the current review is the oldest.
    pub async fn next_in_ring(&self, event_id: &str, current: &Review) -> Result<Review, AppError> {
        let cursor_ts = BsonDateTime::from_chrono(current.created_at);
        let older = self
            .db
            .reviews()
            .find_one(
                doc! { "event": event_id, "created_at": { "$lt": cursor_ts } },
                FindOneOptions::builder().sort(doc! { "created_at": -1 }).build(),
            )
            .await?;

        match older {
            Some(review) => Ok(review),
            None => self.ring_boundary(event_id, -1).await,
        }
    }

    /// Previous review in the ring: the next-newer one, wrapping to the
    /// oldest when the current review is the newest.
    pub async fn prev_in_ring(&self, event_id: &str, current: &Review) -> Result<Review, AppError> {
        let cursor_ts = BsonDateTime::from_chrono(current.created_at);
        let newer = self
            .db
            .reviews()
            .find_one(
                doc! { "event": event_id, "created_at": { "$gt": cursor_ts } },
                FindOneOptions::builder().sort(doc! { "created_at": 1 }).build(),
            )
            .await?;

        match newer {
            Some(review) => Ok(review),
            None => self.ring_boundary(event_id, 1).await,
        }
    }

    /// Newest (-1) or oldest (1) review of the event.
    async fn ring_boundary(&self, event_id: &str, direction: i32) -> Result<Review, AppError> {
        self.db
            .reviews()
            .find_one(
                doc! { "event": event_id },
                FindOneOptions::builder()
                    .sort(doc! { "created_at": direction })
                    .build(),
            )
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("No reviews found for this event")))
    }

    /// Hard delete. Cascades nothing; review counts are not aggregated.
    pub async fn delete(&self, review_id: &str) -> Result<(), AppError> {
        self.db.reviews().delete_one(doc! { "_id": review_id }, None).await?;
        Ok(())
    }
}
