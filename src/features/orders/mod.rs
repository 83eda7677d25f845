//! Online orders placed from restaurant and store sites.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/public/sites/{site}/orders` | No | Place an order |
//! | GET | `/api/websites/{id}/orders` | Owner | List orders |
//! | GET | `/api/websites/{id}/orders/{order_id}` | Owner | Get order with items |
//! | PATCH | `/api/websites/{id}/orders/{order_id}/status` | Owner | Change order status |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::OrderService;
