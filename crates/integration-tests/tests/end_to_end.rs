//! Full shopper flow: sign in, silent refresh, sign out.

#![allow(clippy::unwrap_used)]

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use stylehub_core::Email;
use stylehub_integration_tests::{EMAIL, MockBackend, PASSWORD};

#[tokio::test]
async fn test_login_refresh_logout() {
    let backend = MockBackend::start().await;
    let client = backend.client();
    let email = Email::parse(EMAIL).unwrap();

    let user = client
        .api
        .login(&email, &SecretString::from(PASSWORD.to_string()))
        .await
        .unwrap();
    assert_eq!(user.name, "Kim Minji");
    assert!(client.api.session().is_authenticated());

    // Access token expires server-side; the next call refreshes silently.
    backend.expire_access_token();
    let _: Value = client.api.get("/users/me").await.unwrap();
    assert_eq!(backend.refresh_calls(), 1);
    assert_eq!(
        client.api.session().access_token().unwrap().expose_secret(),
        backend.access_token()
    );
    assert_eq!(client.api.session().user().unwrap().address.as_deref(), Some("Seoul"));

    client.api.logout().await.unwrap();
    assert!(!client.api.session().is_authenticated());
    assert!(client.api.my_likes().await.unwrap().is_empty());
    assert_eq!(backend.hits("/my/likes"), 0);

    let err = client.api.get::<Value>("/users/me").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(client.redirect.paths(), vec!["/login".to_string()]);
    assert_eq!(backend.refresh_calls(), 1);
}

#[tokio::test]
async fn test_withdraw_deletes_account_and_signs_out() {
    let backend = MockBackend::start().await;
    let client = backend.signed_in_client();
    client.api.curations().await.unwrap();

    client.api.withdraw().await.unwrap();

    assert!(backend.withdrawn());
    assert!(!client.api.session().is_authenticated());
    assert!(client.api.session().refresh_token().is_none());
    assert!(client.redirect.paths().is_empty());

    client.api.curations().await.unwrap();
    assert_eq!(backend.hits("/curations"), 2);
}
