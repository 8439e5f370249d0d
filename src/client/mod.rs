pub mod base;
pub mod http_client;
pub mod resolver;

// Re-export so callers can do "use crate::client::{ApiClient, ClientResolver};"
pub use base::{ApiClient, ApiResponse, ClientError};
pub use http_client::HttpApiClient;
pub use resolver::{ClientResolver, StoredCredentialResolver};
