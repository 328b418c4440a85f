//! Admin authentication: credential check, HS256 bearer tokens, and the
//! [`AdminSession`] extractor used by every admin-only handler.

mod credentials;
pub mod router;
mod session;
mod token;

pub use credentials::AdminCredentials;
pub use router::{auth_router, AuthState};
pub use session::AdminSession;
pub use token::{AuthError, Claims, IssuedToken, TokenAuthority, ADMIN_ROLE};
