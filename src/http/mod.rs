pub mod controllers;
pub mod error;
pub mod identity;
pub mod jwt;

mod json;

pub use error::{Error, ErrorKind, Result};
pub use identity::Identity;
pub use json::{json_config, not_found};
pub use jwt::Jwt;
