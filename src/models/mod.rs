pub mod account;
pub mod credential;
pub mod instance;

// Re-export the model types so callers can do "use crate::models::{Account, Instance}".
pub use account::Account;
pub use credential::StoredCredential;
pub use instance::Instance;
