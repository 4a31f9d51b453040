pub mod authority;
pub mod claims;
pub mod errors;

pub use authority::TokenAuthority;
pub use claims::SessionClaims;
pub use claims::ISSUER;
pub use errors::TokenError;
