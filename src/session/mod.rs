//! Session lifecycle: resolving the initial `AuthState` and signing out.

pub mod domain;
pub mod error;
pub mod initializer;
pub mod sign_out;

pub use domain::display_domain;
pub use error::ResolutionError;
pub use initializer::{Resolution, SessionInitializer};
pub use sign_out::sign_out;
