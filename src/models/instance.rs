use serde::{Deserialize, Serialize};

/// Server metadata returned by `GET /api/v1/instance`.
///
/// Only `uri` is required; the remaining fields are kept when the server
/// sends them and default to empty otherwise.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Instance {
    pub uri: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl Instance {
    /// Construct an instance snapshot with only the canonical URI set.
    pub fn new(uri: impl Into<String>) -> Self {
        Instance {
            uri: uri.into(),
            ..Default::default()
        }
    }
}
