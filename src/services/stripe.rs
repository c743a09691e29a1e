//! Hosted-checkout provider client.
//!
//! Implements Stripe's Checkout Sessions API: one hosted session per
//! purchase attempt, carrying event/buyer metadata for later correlation.

use crate::config::StripeConfig;
use anyhow::{anyhow, Result};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;

/// Stripe client for creating hosted checkout sessions.
#[derive(Clone)]
pub struct StripeClient {
    client: Client,
    config: StripeConfig,
}

/// Inputs for a checkout session.
#[derive(Debug)]
pub struct CheckoutSessionParams {
    pub event_id: String,
    pub event_title: String,
    pub buyer_id: String,
    /// Line-item amount in minor units (0 for free events).
    pub unit_amount: i64,
    pub currency: String,
}

/// Checkout session as returned by the provider.
#[derive(Debug, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Hosted checkout URL the buyer is redirected to. Absent on some
    /// session states; treated as a payment error upstream.
    pub url: Option<String>,
    /// Session total in minor units.
    pub amount_total: Option<i64>,
    #[serde(default)]
    pub payment_status: Option<String>,
}

/// Stripe API error envelope.
#[derive(Debug, Deserialize)]
pub struct StripeApiError {
    pub error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct StripeErrorDetail {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: Option<String>,
    pub code: Option<String>,
}

impl StripeClient {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Check if Stripe is configured (secret key is set).
    pub fn is_configured(&self) -> bool {
        !self.config.secret_key.expose_secret().is_empty()
    }

    /// Create a hosted checkout session.
    ///
    /// Exactly one session per call; the caller records the returned
    /// session id locally.
    pub async fn create_checkout_session(
        &self,
        params: CheckoutSessionParams,
    ) -> Result<CheckoutSession> {
        if !self.is_configured() {
            return Err(anyhow!("Stripe credentials not configured"));
        }

        let form = session_form(&params, &self.config.success_url, &self.config.cancel_url);
        let url = format!("{}/checkout/sessions", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .basic_auth(self.config.secret_key.expose_secret(), None::<&str>)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(status = %status, body = %body, "Stripe create session response");

        if status.is_success() {
            let session: CheckoutSession = serde_json::from_str(&body)?;
            tracing::info!(
                session_id = %session.id,
                amount_total = ?session.amount_total,
                "Stripe checkout session created"
            );
            Ok(session)
        } else {
            let error: StripeApiError =
                serde_json::from_str(&body).unwrap_or_else(|_| StripeApiError {
                    error: StripeErrorDetail {
                        error_type: "unknown".to_string(),
                        message: Some(body.clone()),
                        code: None,
                    },
                });
            tracing::error!(
                error_type = %error.error.error_type,
                message = ?error.error.message,
                "Stripe session creation failed"
            );
            Err(anyhow!(
                "Stripe error: {} - {}",
                error.error.error_type,
                error.error.message.unwrap_or_default()
            ))
        }
    }
}

/// Form-encoded body for the Checkout Sessions API.
fn session_form(
    params: &CheckoutSessionParams,
    success_url: &str,
    cancel_url: &str,
) -> Vec<(String, String)> {
    vec![
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), success_url.to_string()),
        ("cancel_url".to_string(), cancel_url.to_string()),
        ("line_items[0][quantity]".to_string(), "1".to_string()),
        (
            "line_items[0][price_data][currency]".to_string(),
            params.currency.clone(),
        ),
        (
            "line_items[0][price_data][unit_amount]".to_string(),
            params.unit_amount.to_string(),
        ),
        (
            "line_items[0][price_data][product_data][name]".to_string(),
            params.event_title.clone(),
        ),
        ("metadata[event_id]".to_string(), params.event_id.clone()),
        ("metadata[buyer_id]".to_string(), params.buyer_id.clone()),
    ]
}
