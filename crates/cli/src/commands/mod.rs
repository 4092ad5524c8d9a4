//! Command implementations.

pub mod coupons;
pub mod likes;
pub mod raw;
pub mod session;

use std::fmt::Display;

use stylehub_client::LoginRedirect;

/// Write one line of command output to stdout.
#[allow(clippy::print_stdout)]
pub fn emit(line: impl Display) {
    println!("{line}");
}

/// Forced logout tells the user how to sign back in.
pub struct HintRedirect;

impl LoginRedirect for HintRedirect {
    fn redirect_to_login(&self, login_path: &str) {
        tracing::warn!(login_path = %login_path, "Session expired");
        emit("Your session has expired. Run `stylehub login` to sign in again.");
    }
}
