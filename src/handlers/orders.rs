//! Checkout and order query handlers.
//!
//! Checkout opens one hosted provider session per attempt and records the
//! order locally as soon as the session exists. There is no webhook leg:
//! an order can therefore exist for a checkout the buyer abandoned, which
//! is accepted and reconciled out-of-band.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    dtos::orders::{
        CheckoutRequest, CheckoutResponse, EventOrdersQuery, EventOrdersResponse,
        UserOrdersQuery, UserOrdersResponse,
    },
    error::AppError,
    middleware::CurrentUser,
    models::Order,
    services::{metrics, stripe::CheckoutSessionParams},
    startup::AppState,
};

/// Validated purchase intent, priced in minor units.
#[derive(Debug)]
struct PurchaseIntent {
    event_id: String,
    event_title: String,
    price: f64,
    unit_amount: i64,
}

/// Shape the raw request into a priced intent. Fails before any provider
/// call: missing event data is an event error, a missing buyer was already
/// an auth error at extraction.
fn normalize_intent(payload: CheckoutRequest) -> Result<PurchaseIntent, AppError> {
    let event_id = payload
        .event_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::EventError(anyhow::anyhow!("Event ID is required")))?;
    let event_title = payload
        .event_title
        .filter(|title| !title.is_empty())
        .ok_or_else(|| AppError::EventError(anyhow::anyhow!("Event title is required")))?;

    let (price, unit_amount) = if payload.is_free {
        (0.0, 0)
    } else {
        let price = payload
            .price
            .ok_or_else(|| AppError::EventError(anyhow::anyhow!("Event price is required")))?;
        if !price.is_finite() || price < 0.0 {
            return Err(AppError::EventError(anyhow::anyhow!("Invalid event price")));
        }
        (price, (price * 100.0).round() as i64)
    };

    Ok(PurchaseIntent {
        event_id,
        event_title,
        price,
        unit_amount,
    })
}

/// `POST /api/orders/checkout`
pub async fn checkout(
    State(state): State<AppState>,
    CurrentUser(buyer_id): CurrentUser,
    Json(payload): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutResponse>), AppError> {
    let intent = normalize_intent(payload)?;

    tracing::info!(
        event_id = %intent.event_id,
        buyer_id = %buyer_id,
        unit_amount = intent.unit_amount,
        "Creating checkout session"
    );

    let session = state
        .stripe
        .create_checkout_session(CheckoutSessionParams {
            event_id: intent.event_id.clone(),
            event_title: intent.event_title.clone(),
            buyer_id: buyer_id.clone(),
            unit_amount: intent.unit_amount,
            currency: "usd".to_string(),
        })
        .await
        .map_err(|e| {
            metrics::record_checkout_session("provider_error");
            tracing::error!(error = %e, "Failed to create checkout session");
            AppError::PaymentError(anyhow::anyhow!("Failed to create checkout session: {}", e))
        })?;

    // Record the intent keyed by the provider session before checking the
    // redirect URL, so a session the provider accepted is never lost.
    let order = Order::new(
        session.id.clone(),
        intent.event_id,
        buyer_id,
        session.amount_total.unwrap_or(0),
        intent.price,
    );
    state.orders.create(order).await?;

    let url = session.url.ok_or_else(|| {
        metrics::record_checkout_session("missing_url");
        AppError::PaymentError(anyhow::anyhow!("Failed to create checkout session URL"))
    })?;

    metrics::record_checkout_session("created");
    tracing::info!(session_id = %session.id, "Checkout session created");

    Ok((StatusCode::CREATED, Json(CheckoutResponse { url })))
}

/// `GET /api/orders/me`: buyer's orders, one per distinct event.
pub async fn list_my_orders(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<UserOrdersQuery>,
) -> Result<Json<UserOrdersResponse>, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(3).clamp(1, 50);

    let (rows, total_pages) = state.orders.list_by_user(&user_id, page, limit).await?;

    Ok(Json(UserOrdersResponse {
        data: rows.into_iter().map(Into::into).collect(),
        total_pages,
    }))
}

/// `GET /api/orders/event/{event_id}`: organizer-side search by buyer name.
pub async fn list_event_orders(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Path(event_id): Path<String>,
    Query(query): Query<EventOrdersQuery>,
) -> Result<Json<EventOrdersResponse>, AppError> {
    if event_id.is_empty() {
        return Err(AppError::EventError(anyhow::anyhow!("Event ID is required")));
    }

    let rows = state.orders.list_by_event(&event_id, &query.search).await?;

    Ok(Json(EventOrdersResponse {
        data: rows.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(price: Option<f64>, is_free: bool) -> CheckoutRequest {
        CheckoutRequest {
            event_id: Some("evt-1".to_string()),
            event_title: Some("Rust Meetup".to_string()),
            price,
            is_free,
        }
    }

    #[test]
    fn paid_price_converts_to_minor_units() {
        let intent = normalize_intent(request(Some(24.99), false)).unwrap();
        assert_eq!(intent.unit_amount, 2499);
        assert_eq!(intent.price, 24.99);
    }

    #[test]
    fn free_event_prices_at_zero() {
        let intent = normalize_intent(request(None, true)).unwrap();
        assert_eq!(intent.unit_amount, 0);
        assert_eq!(intent.price, 0.0);
    }

    #[test]
    fn missing_event_id_is_an_event_error() {
        let payload = CheckoutRequest {
            event_id: None,
            event_title: Some("Rust Meetup".to_string()),
            price: Some(10.0),
            is_free: false,
        };
        let err = normalize_intent(payload).unwrap_err();
        assert_eq!(err.kind(), "EVENT_ERROR");
    }

    #[test]
    fn negative_price_is_rejected() {
        let err = normalize_intent(request(Some(-5.0), false)).unwrap_err();
        assert_eq!(err.kind(), "EVENT_ERROR");
    }
}
