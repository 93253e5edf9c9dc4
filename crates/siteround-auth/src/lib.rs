//! Siteround Auth — password authentication, token issuance/validation,
//! and the session gateway.
//!
//! The rest of the system never sees a raw credential: the server layer
//! hands an incoming credential to [`AuthService::authenticate`] and gets
//! back a resolved actor id (or `Unauthenticated`), which is then passed
//! explicitly into every core operation.

pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthService, Credential, LoginInput, LoginOutput, SignupInput};
pub use token::AccessTokenClaims;
