pub mod auth;
pub mod bookings;
pub mod orders;
pub mod push;
pub mod rate_limits;
pub mod reviews;
pub mod websites;
