//! Session commands.

use secrecy::SecretString;
use stylehub_client::{ApiClient, ApiError};
use stylehub_core::Email;

use super::emit;

/// Sign in and store the session.
pub async fn login(api: &ApiClient, email: &Email, password: String) -> Result<(), ApiError> {
    let user = api.login(email, &SecretString::from(password)).await?;
    emit(format_args!("Signed in as {} <{}>", user.name, user.email));
    Ok(())
}

/// Forget the stored session.
pub async fn logout(api: &ApiClient) -> Result<(), ApiError> {
    api.logout().await?;
    emit("Signed out");
    Ok(())
}

/// Show the signed-in shopper, if any.
pub fn whoami(api: &ApiClient) {
    match api.session().user() {
        Some(user) => {
            emit(format_args!("{} <{}>", user.name, user.email));
            emit(format_args!("user id: {}, role: {}", user.user_id, user.role));
        }
        None if api.session().is_authenticated() => emit("Signed in"),
        None => emit("Not signed in"),
    }
}
