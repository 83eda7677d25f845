mod section_handler;
mod website_handler;

pub use section_handler::*;
pub use website_handler::*;
