//! The user-facing error channel.

use tracing::error;

/// Shows a fatal error to the user. Implementations block until the message
/// has been delivered.
pub trait Notifier: Send + Sync {
    fn notify_error(&self, message: &str);
}

/// Writes errors to stderr, for the command-line front end.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify_error(&self, message: &str) {
        error!(event_name = "session.notify", "{}", message);
        eprintln!("{}", message);
    }
}
