//! Navigation to the login entry point after a forced logout.

use tracing::warn;

/// Sends the shopper to the login entry point.
///
/// Called once per forced logout, after the session has been cleared.
pub trait LoginRedirect: Send + Sync {
    fn redirect_to_login(&self, login_path: &str);
}

/// Redirect that only records the navigation in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogRedirect;

impl LoginRedirect for LogRedirect {
    fn redirect_to_login(&self, login_path: &str) {
        warn!(login_path = %login_path, "Session ended, sign in again");
    }
}
