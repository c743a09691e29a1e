use evently_service::config::{Config, DatabaseConfig, Environment, ServerConfig, StripeConfig};
use evently_service::models::{Event, Order, User, UserRole};
use evently_service::services::EventDb;
use evently_service::startup::Application;
use secrecy::Secret;
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: EventDb,
    pub db_name: String,
}

impl TestApp {
    pub async fn spawn() -> Self {
        // Unroutable provider base so an unstubbed checkout fails fast.
        Self::spawn_with_stripe("http://127.0.0.1:9/v1").await
    }

    /// Spawn with the checkout provider pointed at `stripe_base_url`,
    /// typically a wiremock server.
    pub async fn spawn_with_stripe(stripe_base_url: &str) -> Self {
        let db_name = format!("evently_test_{}", Uuid::new_v4());

        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url: Secret::new(
                    std::env::var("EVENTLY_DATABASE_URL")
                        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
                ),
                db_name: db_name.clone(),
            },
            stripe: StripeConfig {
                secret_key: Secret::new("sk_test_123".to_string()),
                api_base_url: stripe_base_url.to_string(),
                success_url: "http://localhost:3000/profile".to_string(),
                cancel_url: "http://localhost:3000/".to_string(),
            },
            environment: Environment::Dev,
            service_name: "evently-service".to_string(),
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let db = app.db().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept requests.
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            db,
            db_name,
        }
    }

    pub async fn seed_user(&self, role: UserRole) -> User {
        let mut user = User::new(
            "Test".to_string(),
            "Person".to_string(),
            format!("{}@example.com", Uuid::new_v4()),
        );
        user.role = role;
        self.db
            .users()
            .insert_one(&user, None)
            .await
            .expect("Failed to seed user");
        user
    }

    pub async fn seed_event(&self, organizer: &str, price: f64, is_free: bool) -> Event {
        let event = Event::new(
            "Rust Meetup".to_string(),
            organizer.to_string(),
            price,
            is_free,
        );
        self.db
            .events()
            .insert_one(&event, None)
            .await
            .expect("Failed to seed event");
        event
    }

    pub async fn seed_order(&self, event_id: &str, buyer_id: &str) -> Order {
        let order = Order::new(
            format!("cs_test_{}", Uuid::new_v4()),
            event_id.to_string(),
            buyer_id.to_string(),
            2500,
            25.0,
        );
        self.db
            .orders()
            .insert_one(&order, None)
            .await
            .expect("Failed to seed order");
        order
    }

    pub async fn cleanup(&self) {
        let _ = self.db.database().drop(None).await;
    }
}
