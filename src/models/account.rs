use serde::{Deserialize, Serialize};

/// The signed-in account as returned by `GET /api/v1/accounts/verify_credentials`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Account {
    #[serde(default)]
    pub id: String,
    pub username: String,
    /// `username` for local accounts, `username@domain` for remote ones.
    #[serde(default)]
    pub acct: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl Account {
    pub fn new(username: impl Into<String>) -> Self {
        let username = username.into();
        Account {
            acct: username.clone(),
            username,
            ..Default::default()
        }
    }
}
