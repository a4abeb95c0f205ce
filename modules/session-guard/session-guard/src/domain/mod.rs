//! Domain layer for the session guard.

mod client;
mod deadline;
pub mod refresher;
pub mod roles;
pub mod service;
pub mod verifier;

#[cfg(test)]
pub(crate) mod test_support;

pub use refresher::TokenRefresher;
pub use roles::is_role_permitted;
pub use service::Service;
pub use verifier::IdentityVerifier;
