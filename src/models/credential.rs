use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted access token together with the instance it was issued by.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    pub instance_url: String,
    pub access_token: String,
    pub created_at: DateTime<Utc>,
}

impl StoredCredential {
    pub fn new(instance_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        StoredCredential {
            instance_url: instance_url.into(),
            access_token: access_token.into(),
            created_at: Utc::now(),
        }
    }
}

// Access tokens never end up in logs.
impl fmt::Debug for StoredCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredential")
            .field("instance_url", &self.instance_url)
            .field("access_token", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}
