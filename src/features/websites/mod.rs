//! Tenant websites and their drag-and-drop section layout.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/public/sites/{site}` | No | Resolve a site by host |
//! | POST | `/api/websites` | Yes | Create website |
//! | GET | `/api/websites` | Yes | List caller's websites |
//! | GET | `/api/websites/{id}` | Owner | Get website |
//! | PATCH | `/api/websites/{id}` | Owner | Update website |
//! | DELETE | `/api/websites/{id}` | Owner | Deactivate website |
//! | GET | `/api/websites/{id}/sections` | Owner | Get section layout |
//! | PUT | `/api/websites/{id}/sections` | Owner | Replace section layout |
//! | POST | `/api/websites/{id}/sections/move` | Owner | Move a section |
//! | POST | `/api/websites/{id}/sections/{section_id}/visibility` | Owner | Show or hide a section |
//! | GET | `/api/admin/websites` | Admin | List all websites |
//!
//! "Owner" means the site's client or a platform admin.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod sections;
pub mod services;
pub mod variants;

pub use services::WebsiteService;
