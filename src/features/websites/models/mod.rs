mod website;

pub use website::*;
