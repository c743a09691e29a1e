mod common;

use common::TestApp;
use evently_service::models::{User, UserRole};
use mongodb::bson::doc;
use reqwest::Client;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn spawn_with_mock_stripe() -> (TestApp, MockServer) {
    let mock_server = MockServer::start().await;
    let app = TestApp::spawn_with_stripe(&format!("{}/v1", mock_server.uri())).await;
    (app, mock_server)
}

fn checkout_body(event_id: &str, price: f64, is_free: bool) -> serde_json::Value {
    json!({
        "event_id": event_id,
        "event_title": "Rust Meetup",
        "price": price,
        "is_free": is_free,
    })
}

#[tokio::test]
async fn checkout_returns_url_and_persists_order() {
    let (app, mock_server) = spawn_with_mock_stripe().await;
    let client = Client::new();

    let organizer = app.seed_user(UserRole::User).await;
    let buyer = app.seed_user(UserRole::User).await;
    let event = app.seed_event(&organizer.id, 24.99, false).await;

    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cs_test_abc",
            "url": "https://checkout.stripe.com/c/pay/cs_test_abc",
            "amount_total": 2499,
            "payment_status": "unpaid",
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = client
        .post(format!("{}/api/orders/checkout", app.address))
        .header("X-User-ID", &buyer.id)
        .json(&checkout_body(&event.id, 24.99, false))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["url"], "https://checkout.stripe.com/c/pay/cs_test_abc");

    let order = app
        .db
        .orders()
        .find_one(doc! { "stripe_session_id": "cs_test_abc" }, None)
        .await
        .expect("Failed to query orders")
        .expect("Order was not persisted");
    assert_eq!(order.event, event.id);
    assert_eq!(order.buyer, buyer.id);
    assert_eq!(order.total_amount, 2499);
    assert_eq!(order.price, 24.99);

    app.cleanup().await;
}

#[tokio::test]
async fn free_event_checkout_charges_nothing() {
    let (app, mock_server) = spawn_with_mock_stripe().await;
    let client = Client::new();

    let organizer = app.seed_user(UserRole::User).await;
    let buyer = app.seed_user(UserRole::User).await;
    let event = app.seed_event(&organizer.id, 0.0, true).await;

    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cs_test_free",
            "url": "https://checkout.stripe.com/c/pay/cs_test_free",
            "amount_total": 0,
            "payment_status": "unpaid",
        })))
        .mount(&mock_server)
        .await;

    let response = client
        .post(format!("{}/api/orders/checkout", app.address))
        .header("X-User-ID", &buyer.id)
        .json(&json!({
            "event_id": event.id,
            "event_title": "Rust Meetup",
            "is_free": true,
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 201);

    let order = app
        .db
        .orders()
        .find_one(doc! { "stripe_session_id": "cs_test_free" }, None)
        .await
        .expect("Failed to query orders")
        .expect("Order was not persisted");
    assert_eq!(order.total_amount, 0);
    assert_eq!(order.price, 0.0);

    app.cleanup().await;
}

#[tokio::test]
async fn repeated_session_id_is_rejected_as_a_booking_error() {
    let (app, mock_server) = spawn_with_mock_stripe().await;
    let client = Client::new();

    let organizer = app.seed_user(UserRole::User).await;
    let buyer = app.seed_user(UserRole::User).await;
    let event = app.seed_event(&organizer.id, 24.99, false).await;

    // The provider hands back the same session id on both attempts; the
    // unique index on stripe_session_id rejects the second order.
    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cs_test_repeat",
            "url": "https://checkout.stripe.com/c/pay/cs_test_repeat",
            "amount_total": 2499,
            "payment_status": "unpaid",
        })))
        .mount(&mock_server)
        .await;

    let first = client
        .post(format!("{}/api/orders/checkout", app.address))
        .header("X-User-ID", &buyer.id)
        .json(&checkout_body(&event.id, 24.99, false))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(first.status().as_u16(), 201);

    let second = client
        .post(format!("{}/api/orders/checkout", app.address))
        .header("X-User-ID", &buyer.id)
        .json(&checkout_body(&event.id, 24.99, false))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(second.status().as_u16(), 400);
    let body: serde_json::Value = second.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "BOOKING_ERROR");

    let count = app
        .db
        .orders()
        .count_documents(doc! { "stripe_session_id": "cs_test_repeat" }, None)
        .await
        .expect("Failed to count orders");
    assert_eq!(count, 1);

    app.cleanup().await;
}

#[tokio::test]
async fn session_without_url_is_a_payment_error_but_keeps_the_order() {
    let (app, mock_server) = spawn_with_mock_stripe().await;
    let client = Client::new();

    let organizer = app.seed_user(UserRole::User).await;
    let buyer = app.seed_user(UserRole::User).await;
    let event = app.seed_event(&organizer.id, 24.99, false).await;

    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cs_test_nourl",
            "amount_total": 2499,
            "payment_status": "unpaid",
        })))
        .mount(&mock_server)
        .await;

    let response = client
        .post(format!("{}/api/orders/checkout", app.address))
        .header("X-User-ID", &buyer.id)
        .json(&checkout_body(&event.id, 24.99, false))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 502);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "PAYMENT_ERROR");

    // The provider accepted the session, so the order was still recorded.
    let order = app
        .db
        .orders()
        .find_one(doc! { "stripe_session_id": "cs_test_nourl" }, None)
        .await
        .expect("Failed to query orders");
    assert!(order.is_some());

    app.cleanup().await;
}

#[tokio::test]
async fn provider_rejection_is_a_payment_error_without_an_order() {
    let (app, mock_server) = spawn_with_mock_stripe().await;
    let client = Client::new();

    let organizer = app.seed_user(UserRole::User).await;
    let buyer = app.seed_user(UserRole::User).await;
    let event = app.seed_event(&organizer.id, 24.99, false).await;

    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .respond_with(ResponseTemplate::new(402).set_body_json(json!({
            "error": {
                "type": "card_error",
                "message": "Your card was declined.",
                "code": "card_declined",
            }
        })))
        .mount(&mock_server)
        .await;

    let response = client
        .post(format!("{}/api/orders/checkout", app.address))
        .header("X-User-ID", &buyer.id)
        .json(&checkout_body(&event.id, 24.99, false))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 502);

    let count = app
        .db
        .orders()
        .count_documents(doc! { "buyer": &buyer.id }, None)
        .await
        .expect("Failed to count orders");
    assert_eq!(count, 0);

    app.cleanup().await;
}

#[tokio::test]
async fn checkout_requires_event_fields_and_a_user() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let buyer = app.seed_user(UserRole::User).await;

    let missing_event = client
        .post(format!("{}/api/orders/checkout", app.address))
        .header("X-User-ID", &buyer.id)
        .json(&json!({ "event_title": "Rust Meetup", "price": 10.0 }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(missing_event.status().as_u16(), 400);
    let body: serde_json::Value = missing_event.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "EVENT_ERROR");

    let anonymous = client
        .post(format!("{}/api/orders/checkout", app.address))
        .json(&checkout_body("evt", 10.0, false))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(anonymous.status().as_u16(), 401);

    app.cleanup().await;
}

#[tokio::test]
async fn my_orders_collapse_repeat_purchases_per_event() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let organizer = app.seed_user(UserRole::User).await;
    let buyer = app.seed_user(UserRole::User).await;
    let event_a = app.seed_event(&organizer.id, 25.0, false).await;
    let event_b = app.seed_event(&organizer.id, 10.0, false).await;

    app.seed_order(&event_a.id, &buyer.id).await;
    app.seed_order(&event_a.id, &buyer.id).await;
    app.seed_order(&event_b.id, &buyer.id).await;

    let response = client
        .get(format!("{}/api/orders/me", app.address))
        .header("X-User-ID", &buyer.id)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(body["total_pages"], 1);

    let event_ids: Vec<&str> = data.iter().map(|row| row["event_id"].as_str().unwrap()).collect();
    assert!(event_ids.contains(&event_a.id.as_str()));
    assert!(event_ids.contains(&event_b.id.as_str()));
    assert_eq!(data[0]["organizer_name"], "Test Person");

    app.cleanup().await;
}

#[tokio::test]
async fn event_orders_search_matches_buyer_name_case_insensitively() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let organizer = app.seed_user(UserRole::User).await;
    let event = app.seed_event(&organizer.id, 25.0, false).await;

    let alice = User::new(
        "Alice".to_string(),
        "Smith".to_string(),
        "alice@example.com".to_string(),
    );
    let bob = User::new(
        "Bob".to_string(),
        "Jones".to_string(),
        "bob@example.com".to_string(),
    );
    app.db.users().insert_one(&alice, None).await.unwrap();
    app.db.users().insert_one(&bob, None).await.unwrap();

    app.seed_order(&event.id, &alice.id).await;
    app.seed_order(&event.id, &bob.id).await;

    let all: serde_json::Value = client
        .get(format!("{}/api/orders/event/{}", app.address, event.id))
        .header("X-User-ID", &organizer.id)
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(all["data"].as_array().unwrap().len(), 2);

    let filtered: serde_json::Value = client
        .get(format!(
            "{}/api/orders/event/{}?search=aLiCe",
            app.address, event.id
        ))
        .header("X-User-ID", &organizer.id)
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");
    let rows = filtered["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["buyer"], "Alice Smith");

    app.cleanup().await;
}
