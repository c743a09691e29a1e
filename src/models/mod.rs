pub mod contact;
pub mod event;
pub mod newsletter;
pub mod order;
pub mod review;
pub mod testimonial;
pub mod user;

pub use contact::Contact;
pub use event::Event;
pub use newsletter::{NewsletterPreferences, NewsletterSubscriber};
pub use order::Order;
pub use review::Review;
pub use testimonial::{Statistics, Testimonial, TestimonialStatus};
pub use user::{User, UserRole};
