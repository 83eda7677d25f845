mod validator;

pub mod guards;
pub mod handler;
pub mod model;
pub mod routes;

pub use validator::JwtValidator;
