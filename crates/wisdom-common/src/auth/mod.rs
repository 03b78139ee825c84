//! Session token verification

mod jwt;

pub use jwt::{AuthError, Claims, JwtService, UserMetadata, AUTHENTICATED_AUDIENCE};
