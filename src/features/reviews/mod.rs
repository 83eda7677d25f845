//! Customer reviews with owner moderation.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/public/sites/{site}/reviews` | No | Submit a review |
//! | GET | `/api/public/sites/{site}/reviews` | No | Published reviews with average rating |
//! | GET | `/api/websites/{id}/reviews` | Owner | All reviews |
//! | PATCH | `/api/websites/{id}/reviews/{review_id}` | Owner | Publish or hide a review |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ReviewService;
