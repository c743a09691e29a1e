mod common;

use common::TestApp;
use reqwest::Client;
use serde_json::json;

#[tokio::test]
async fn contact_form_is_stored() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/contact", app.address))
        .json(&json!({
            "name": "Alice Smith",
            "email": "Alice@Example.com",
            "subject": "Partnership",
            "message": "We would like to host our conference with you.",
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["contact"]["name"], "Alice Smith");
    assert_eq!(body["contact"]["email"], "alice@example.com");

    app.cleanup().await;
}

#[tokio::test]
async fn contact_form_requires_every_field() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/contact", app.address))
        .json(&json!({
            "name": "Alice Smith",
            "email": "alice@example.com",
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "VALIDATION_ERROR");

    app.cleanup().await;
}

#[tokio::test]
async fn newsletter_subscription_upserts_by_email() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let first = client
        .post(format!("{}/api/newsletter", app.address))
        .json(&json!({
            "name": "Alice Smith",
            "email": "Alice@Example.com",
            "preferences": { "event_alerts": true },
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(first.status().as_u16(), 201);
    let body: serde_json::Value = first.json().await.expect("Failed to parse JSON");
    assert_eq!(body["message"], "Successfully subscribed to newsletter");
    assert_eq!(body["subscriber"]["email"], "alice@example.com");
    assert_eq!(body["subscriber"]["preferences"]["event_alerts"], true);

    // Same email, different casing: preferences are replaced, not duplicated.
    let second = client
        .post(format!("{}/api/newsletter", app.address))
        .json(&json!({
            "name": "Alice S.",
            "email": "alice@example.com",
            "preferences": { "monthly_calendar": true },
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(second.status().as_u16(), 200);
    let body: serde_json::Value = second.json().await.expect("Failed to parse JSON");
    assert_eq!(body["message"], "Your newsletter preferences have been updated");
    assert_eq!(body["subscriber"]["preferences"]["event_alerts"], false);
    assert_eq!(body["subscriber"]["preferences"]["monthly_calendar"], true);

    let stats: serde_json::Value = client
        .get(format!("{}/api/newsletter/stats", app.address))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(stats["subscriber_count"], 1);
    assert_eq!(stats["preference_stats"]["monthly_calendar"], 1);
    assert_eq!(stats["preference_stats"]["event_alerts"], 0);

    app.cleanup().await;
}

#[tokio::test]
async fn newsletter_requires_name_email_and_preferences() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/newsletter", app.address))
        .json(&json!({ "email": "alice@example.com" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "VALIDATION_ERROR");

    app.cleanup().await;
}
