use crate::error::AppError;
use crate::models::{
    Contact, Event, NewsletterSubscriber, Order, Review, Statistics, Testimonial, User,
};
use mongodb::{
    bson::doc,
    options::{ClientOptions, IndexOptions},
    Client as MongoClient, Collection, Database, IndexModel,
};

/// Typed handle on the evently database.
///
/// Passed explicitly through `AppState`; there is no process-global cached
/// connection.
#[derive(Clone)]
pub struct EventDb {
    db: Database,
}

impl EventDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        let mut client_options = ClientOptions::parse(uri).await.map_err(|e| {
            tracing::error!("Failed to parse MongoDB connection string: {}", e);
            AppError::DatabaseError(e.into())
        })?;
        client_options.app_name = Some("evently-service".to_string());

        let client = MongoClient::with_options(client_options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::DatabaseError(e.into())
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Connected to MongoDB");
        Ok(Self { db })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn users(&self) -> Collection<User> {
        self.db.collection("users")
    }

    pub fn events(&self) -> Collection<Event> {
        self.db.collection("events")
    }

    pub fn orders(&self) -> Collection<Order> {
        self.db.collection("orders")
    }

    pub fn reviews(&self) -> Collection<Review> {
        self.db.collection("reviews")
    }

    pub fn testimonials(&self) -> Collection<Testimonial> {
        self.db.collection("testimonials")
    }

    pub fn statistics(&self) -> Collection<Statistics> {
        self.db.collection("statistics")
    }

    pub fn contacts(&self) -> Collection<Contact> {
        self.db.collection("contacts")
    }

    pub fn newsletter(&self) -> Collection<NewsletterSubscriber> {
        self.db.collection("newsletter_subscribers")
    }

    /// Ping the server.
    pub async fn health_check(&self) -> Result<(), AppError> {
        self.db.run_command(doc! { "ping": 1 }, None).await.map_err(|e| {
            tracing::error!("MongoDB health check failed: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e))
        })?;
        Ok(())
    }

    /// Create the indexes the lifecycle invariants rely on.
    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        // One review per (event, user).
        let review_unique = IndexModel::builder()
            .keys(doc! { "event": 1, "user": 1 })
            .options(
                IndexOptions::builder()
                    .name("review_event_user_unique_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        // Ring navigation and event listings walk (event, created_at).
        let review_ring = IndexModel::builder()
            .keys(doc! { "event": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("review_event_created_idx".to_string())
                    .build(),
            )
            .build();

        self.reviews().create_indexes([review_unique, review_ring], None).await?;

        // One order per provider checkout session.
        let order_session_unique = IndexModel::builder()
            .keys(doc! { "stripe_session_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("order_session_unique_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        let order_buyer = IndexModel::builder()
            .keys(doc! { "buyer": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("order_buyer_created_idx".to_string())
                    .build(),
            )
            .build();

        let order_event = IndexModel::builder()
            .keys(doc! { "event": 1 })
            .options(
                IndexOptions::builder()
                    .name("order_event_idx".to_string())
                    .build(),
            )
            .build();

        self.orders()
            .create_indexes([order_session_unique, order_buyer, order_event], None)
            .await?;

        // Public feed queries approved testimonials newest-first.
        let testimonial_status = IndexModel::builder()
            .keys(doc! { "status": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("testimonial_status_created_idx".to_string())
                    .build(),
            )
            .build();

        self.testimonials().create_index(testimonial_status, None).await?;

        // Email is the natural key for subscribers.
        let newsletter_email_unique = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .name("newsletter_email_unique_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.newsletter().create_index(newsletter_email_unique, None).await?;

        tracing::info!("Evently indexes initialized");
        Ok(())
    }
}

/// True when the error is a duplicate-key write rejection (code 11000).
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(we)) => we.code == 11000,
        ErrorKind::Command(ce) => ce.code == 11000,
        _ => false,
    }
}
