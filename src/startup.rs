use crate::config::Config;
use crate::error::AppError;
use crate::handlers;
use crate::middleware::request_id_middleware;
use crate::services::{
    EventDb, MarketingRepository, OrderRepository, ReviewRepository, StripeClient,
    TestimonialRepository,
};
use axum::{
    middleware::from_fn,
    routing::{delete, get, patch, post},
    Router,
};
use secrecy::ExposeSecret;
use std::future::IntoFuture;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: EventDb,
    pub orders: OrderRepository,
    pub reviews: ReviewRepository,
    pub testimonials: TestimonialRepository,
    pub marketing: MarketingRepository,
    pub stripe: StripeClient,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/metrics", get(handlers::health::metrics_endpoint))
        .route("/api/orders/checkout", post(handlers::orders::checkout))
        .route("/api/orders/me", get(handlers::orders::list_my_orders))
        .route(
            "/api/orders/event/:event_id",
            get(handlers::orders::list_event_orders),
        )
        .route("/api/reviews", post(handlers::reviews::create_review))
        .route("/api/reviews/me", get(handlers::reviews::list_my_reviews))
        .route(
            "/api/reviews/event/:event_id",
            get(handlers::reviews::list_event_reviews),
        )
        .route("/api/reviews/:id", delete(handlers::reviews::delete_review))
        .route("/api/reviews/:id/next", get(handlers::reviews::next_review))
        .route("/api/reviews/:id/prev", get(handlers::reviews::prev_review))
        .route(
            "/api/testimonials",
            post(handlers::testimonials::submit_testimonial)
                .get(handlers::testimonials::list_approved_testimonials),
        )
        .route(
            "/api/testimonials/admin",
            get(handlers::testimonials::list_all_testimonials),
        )
        .route(
            "/api/testimonials/admin/:id",
            patch(handlers::testimonials::moderate_testimonial),
        )
        .route(
            "/api/testimonials/statistics",
            get(handlers::testimonials::get_statistics),
        )
        .route("/api/contact", post(handlers::marketing::submit_contact))
        .route(
            "/api/newsletter",
            post(handlers::marketing::subscribe_newsletter),
        )
        .route(
            "/api/newsletter/stats",
            get(handlers::marketing::newsletter_stats),
        )
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    state: AppState,
}

impl Application {
    pub async fn build(config: Config) -> Result<Self, AppError> {
        let db = EventDb::connect(config.database.url.expose_secret(), &config.database.db_name)
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to MongoDB: {}", e);
                e
            })?;
        db.initialize_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;

        let stripe = StripeClient::new(config.stripe.clone());
        if !stripe.is_configured() {
            tracing::warn!("Stripe secret key is empty; checkout will fail until configured");
        }

        let state = AppState {
            config: config.clone(),
            db: db.clone(),
            orders: OrderRepository::new(db.clone()),
            reviews: ReviewRepository::new(db.clone()),
            testimonials: TestimonialRepository::new(db.clone()),
            marketing: MarketingRepository::new(db.clone()),
            stripe,
        };

        let app = build_router(state.clone());

        let addr = SocketAddr::new(config.server.host.parse().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("Invalid host {}: {}", config.server.host, e))
        })?, config.server.port);
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            state,
        })
    }

    pub fn db(&self) -> &EventDb {
        &self.state.db
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
