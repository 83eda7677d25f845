mod website_dto;

pub use website_dto::*;
