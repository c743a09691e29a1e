pub mod marketing;
pub mod orders;
pub mod reviews;
pub mod testimonials;
