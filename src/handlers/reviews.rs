//! Review lifecycle handlers: create, list, ring navigation, delete.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use mongodb::bson::doc;
use validator::Validate;

use crate::{
    dtos::reviews::{
        CreateReviewRequest, ReviewListQuery, ReviewListResponse, ReviewResponse, RingQuery,
    },
    error::AppError,
    middleware::CurrentUser,
    models::{
        review::{DEFAULT_REVIEW_BG_COLOR, DEFAULT_REVIEW_ROLE},
        Review,
    },
    services::metrics,
    startup::AppState,
};

/// `POST /api/reviews`
pub async fn create_review(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>), AppError> {
    payload.validate()?;

    // Whitespace padding does not count toward the minimum.
    if payload.quote.trim().chars().count() < 10 {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Review text must be at least 10 characters"
        )));
    }

    let event = state
        .db
        .events()
        .find_one(doc! { "_id": &payload.event_id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Event not found")))?;

    let user = state
        .db
        .users()
        .find_one(doc! { "_id": &user_id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User not found")))?;

    if state.reviews.exists_for(&event.id, &user.id).await? {
        return Err(AppError::ReviewError(anyhow::anyhow!(
            "You have already reviewed this event"
        )));
    }

    let review = Review::new(
        payload.quote,
        user.display_name(),
        payload
            .role
            .unwrap_or_else(|| DEFAULT_REVIEW_ROLE.to_string()),
        user.photo.clone().unwrap_or_default(),
        payload.rating,
        payload
            .bg_color
            .unwrap_or_else(|| DEFAULT_REVIEW_BG_COLOR.to_string()),
        event.id.clone(),
        user.id.clone(),
    );

    let review = state.reviews.create(review).await?;
    metrics::record_review("created");

    tracing::info!(
        review_id = %review.id,
        event_id = %event.id,
        user_id = %user.id,
        "Review created"
    );

    Ok((StatusCode::CREATED, Json(review.into())))
}

/// `GET /api/reviews/event/{event_id}`
pub async fn list_event_reviews(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Query(query): Query<ReviewListQuery>,
) -> Result<Json<ReviewListResponse>, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(6).clamp(1, 50);

    let (reviews, total_pages) = state.reviews.list_by_event(&event_id, page, limit).await?;

    Ok(Json(ReviewListResponse {
        data: reviews.into_iter().map(Into::into).collect(),
        total_pages,
    }))
}

/// `GET /api/reviews/me`
pub async fn list_my_reviews(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<ReviewListQuery>,
) -> Result<Json<ReviewListResponse>, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(6).clamp(1, 50);

    let (reviews, total_pages) = state.reviews.list_by_user(&user_id, page, limit).await?;

    Ok(Json(ReviewListResponse {
        data: reviews.into_iter().map(Into::into).collect(),
        total_pages,
    }))
}

/// `GET /api/reviews/{id}/next`: the next-older review for the event,
/// wrapping to the newest. A single-review ring returns the same review.
pub async fn next_review(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
    Query(query): Query<RingQuery>,
) -> Result<Json<ReviewResponse>, AppError> {
    let current = state
        .reviews
        .find_by_id(&review_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Current review not found")))?;

    let next = state.reviews.next_in_ring(&query.event_id, &current).await?;
    Ok(Json(next.into()))
}

/// `GET /api/reviews/{id}/prev`: the next-newer review, wrapping to the oldest.
pub async fn prev_review(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
    Query(query): Query<RingQuery>,
) -> Result<Json<ReviewResponse>, AppError> {
    let current = state
        .reviews
        .find_by_id(&review_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Current review not found")))?;

    let prev = state.reviews.prev_in_ring(&query.event_id, &current).await?;
    Ok(Json(prev.into()))
}

/// `DELETE /api/reviews/{id}`: author-only hard delete.
pub async fn delete_review(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(review_id): Path<String>,
) -> Result<Json<ReviewResponse>, AppError> {
    let review = state
        .reviews
        .find_by_id(&review_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Review not found")))?;

    if review.user != user_id {
        return Err(AppError::Forbidden(anyhow::anyhow!(
            "Only the author can delete a review"
        )));
    }

    state.reviews.delete(&review.id).await?;
    metrics::record_review("deleted");

    tracing::info!(review_id = %review.id, "Review deleted");

    Ok(Json(review.into()))
}
