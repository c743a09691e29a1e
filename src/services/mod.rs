pub mod database;
pub mod marketing;
pub mod metrics;
pub mod orders;
pub mod reviews;
pub mod stripe;
pub mod testimonials;

pub use database::EventDb;
pub use marketing::MarketingRepository;
pub use metrics::{get_metrics, init_metrics};
pub use orders::OrderRepository;
pub use reviews::ReviewRepository;
pub use stripe::StripeClient;
pub use testimonials::TestimonialRepository;
