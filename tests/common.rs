#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use figment::{
    providers::{Format, Yaml},
    Figment,
};
use mockito::{Mock, ServerGuard};
use pillbug::config::ConfigV1;
use pillbug::notify::Notifier;
use pillbug::startup::{build_session, Session};

pub const MEMORY_CONFIG: &str = r#"
version: "1.0.0"
logging:
  level: "debug"
  format: "json"
credentials:
  type: memory
client:
  user_agent: "pillbug-test"
"#;

pub fn load_test_config(yaml: &str) -> ConfigV1 {
    ConfigV1::from_figment(Figment::new().merge(Yaml::string(yaml)))
        .expect("Failed to parse test config YAML")
}

/// Collects every message shown to the user.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("notifier mutex").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify_error(&self, message: &str) {
        self.messages
            .lock()
            .expect("notifier mutex")
            .push(message.to_string());
    }
}

pub fn build_test_session(config: &ConfigV1) -> (Session, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let session = build_session(config, notifier.clone());
    (session, notifier)
}

pub async fn mock_instance(server: &mut ServerGuard, status: usize, body: &str) -> Mock {
    server
        .mock("GET", "/api/v1/instance")
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

pub async fn mock_verify_credentials(
    server: &mut ServerGuard,
    token: &str,
    status: usize,
    body: &str,
) -> Mock {
    server
        .mock("GET", "/api/v1/accounts/verify_credentials")
        .match_header("authorization", format!("Bearer {}", token).as_str())
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}
