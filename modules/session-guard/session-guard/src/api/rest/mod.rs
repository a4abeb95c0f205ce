mod cookie;
pub mod error;
pub mod extract;
pub mod middleware;

pub use error::{CONFIGURATION_MESSAGE, ErrorBody, GuardError};
pub use extract::AuthenticatedIdentity;
pub use middleware::{SessionGuardState, authorize_headers, session_guard_middleware};
