pub mod website_access;
pub mod website_service;

pub use website_access::{fetch_active_website, fetch_owned_website, parse_site_id};
pub use website_service::WebsiteService;
