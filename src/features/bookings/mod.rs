//! Reservations and appointments requested from tenant sites.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/public/sites/{site}/bookings` | No | Submit a booking request |
//! | GET | `/api/websites/{id}/bookings` | Owner | List bookings |
//! | PATCH | `/api/websites/{id}/bookings/{booking_id}/status` | Owner | Change booking status |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::BookingService;
