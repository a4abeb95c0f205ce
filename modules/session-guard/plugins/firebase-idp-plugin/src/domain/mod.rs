mod admin_token;
mod client;
pub mod credentials;
pub mod error;
mod jwks;
pub mod service;
mod wire;

pub use credentials::ServiceAccountKey;
pub use error::DomainError;
pub use service::Service;
