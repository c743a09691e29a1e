//! Testimonial submission, public feed, admin moderation, and statistics.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use mongodb::bson::doc;
use validator::Validate;

use crate::{
    dtos::testimonials::{
        CreateTestimonialRequest, ModerateTestimonialRequest, StatisticsResponse,
        TestimonialListResponse, TestimonialResponse,
    },
    error::AppError,
    middleware::{AdminUser, CurrentUser},
    models::{Testimonial, TestimonialStatus},
    services::metrics,
    startup::AppState,
};

/// `POST /api/testimonials`
///
/// Only users who have organized an event or bought an order may submit.
/// An ineligible request fails before any statistics mutation.
pub async fn submit_testimonial(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<CreateTestimonialRequest>,
) -> Result<(StatusCode, Json<TestimonialResponse>), AppError> {
    payload.validate()?;

    let user = state
        .db
        .users()
        .find_one(doc! { "_id": &user_id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User not found")))?;

    let has_events = state.testimonials.user_has_organized_events(&user.id).await?;
    let has_orders = state.orders.buyer_has_orders(&user.id).await?;

    if !has_events && !has_orders {
        return Err(AppError::Forbidden(anyhow::anyhow!(
            "You must create an event or purchase a ticket to submit a testimonial"
        )));
    }

    let testimonial = Testimonial::new(user.id, payload.text, payload.role, payload.rating);
    let testimonial = state.testimonials.create(testimonial).await?;
    metrics::record_testimonial("pending");

    tracing::info!(testimonial_id = %testimonial.id, "Testimonial submitted");

    Ok((StatusCode::CREATED, Json(testimonial.into())))
}

/// `GET /api/testimonials`: up to 10 most recent approved, public.
pub async fn list_approved_testimonials(
    State(state): State<AppState>,
) -> Result<Json<TestimonialListResponse>, AppError> {
    let rows = state.testimonials.list_approved(10).await?;
    Ok(Json(TestimonialListResponse {
        testimonials: rows.into_iter().map(Into::into).collect(),
    }))
}

/// `GET /api/testimonials/admin`: every testimonial, admin-only.
pub async fn list_all_testimonials(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<TestimonialListResponse>, AppError> {
    let rows = state.testimonials.list_all().await?;
    Ok(Json(TestimonialListResponse {
        testimonials: rows.into_iter().map(Into::into).collect(),
    }))
}

/// `PATCH /api/testimonials/admin/{id}`
///
/// Accepts only `approved` or `rejected`. The per-status counters move
/// -1 outgoing / +1 incoming in one statistics update; the total count
/// never changes on moderation.
pub async fn moderate_testimonial(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(testimonial_id): Path<String>,
    Json(payload): Json<ModerateTestimonialRequest>,
) -> Result<Json<TestimonialResponse>, AppError> {
    let verdict = match payload.status.as_str() {
        "approved" => TestimonialStatus::Approved,
        "rejected" => TestimonialStatus::Rejected,
        other => {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Invalid status: {}",
                other
            )))
        }
    };

    let current = state
        .testimonials
        .find_by_id(&testimonial_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Testimonial not found")))?;

    let updated = state
        .testimonials
        .set_status(&testimonial_id, current.status, verdict)
        .await?;
    metrics::record_testimonial(verdict.as_str());

    tracing::info!(
        testimonial_id = %updated.id,
        admin_id = %admin.id,
        from = current.status.as_str(),
        to = verdict.as_str(),
        "Testimonial moderated"
    );

    Ok(Json(updated.into()))
}

/// `GET /api/testimonials/statistics`: the lazily-created singleton.
pub async fn get_statistics(
    State(state): State<AppState>,
) -> Result<Json<StatisticsResponse>, AppError> {
    let statistics = state.testimonials.get_or_create_statistics().await?;
    Ok(Json(statistics.into()))
}
