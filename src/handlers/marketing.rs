//! Contact form and newsletter subscription endpoints. Both are public.

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{
    dtos::marketing::{
        ContactRequest, ContactResponse, NewsletterRequest, NewsletterStatsResponse,
        SubscriberResponse,
    },
    error::AppError,
    models::Contact,
    startup::AppState,
};

/// `POST /api/contact`
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> Result<(StatusCode, Json<ContactResponse>), AppError> {
    payload.validate()?;

    let contact = Contact::new(
        payload.name.unwrap_or_default(),
        payload.email.unwrap_or_default().trim().to_lowercase(),
        payload.subject.unwrap_or_default(),
        payload.message.unwrap_or_default(),
    );
    let contact = state.marketing.create_contact(contact).await?;

    tracing::info!(contact_id = %contact.id, "Contact message received");

    Ok((
        StatusCode::CREATED,
        Json(ContactResponse {
            message: "Your message has been sent. We will get back to you soon.".to_string(),
            contact: contact.into(),
        }),
    ))
}

/// `POST /api/newsletter`
///
/// Email is the natural key: a first-time subscriber gets a 201, a
/// returning one has their name and preferences replaced and gets a 200.
pub async fn subscribe_newsletter(
    State(state): State<AppState>,
    Json(payload): Json<NewsletterRequest>,
) -> Result<(StatusCode, Json<SubscriberResponse>), AppError> {
    payload.validate()?;

    let name = payload.name.unwrap_or_default();
    let email = payload.email.unwrap_or_default();
    let preferences = payload.preferences.unwrap_or_default();

    let (subscriber, created) = state
        .marketing
        .upsert_subscriber(&name, &email, preferences)
        .await?;

    let (status, message) = if created {
        (
            StatusCode::CREATED,
            "Successfully subscribed to newsletter",
        )
    } else {
        (
            StatusCode::OK,
            "Your newsletter preferences have been updated",
        )
    };

    tracing::info!(subscriber_id = %subscriber.id, created, "Newsletter subscription");

    Ok((
        status,
        Json(SubscriberResponse {
            message: message.to_string(),
            subscriber: subscriber.into(),
        }),
    ))
}

/// `GET /api/newsletter/stats`
pub async fn newsletter_stats(
    State(state): State<AppState>,
) -> Result<Json<NewsletterStatsResponse>, AppError> {
    let (subscriber_count, preference_stats) = state.marketing.newsletter_stats().await?;
    Ok(Json(NewsletterStatsResponse {
        subscriber_count,
        preference_stats,
    }))
}
