mod booking_service;

pub use booking_service::{BookingFilter, BookingService};
