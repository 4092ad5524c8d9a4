//! Typed storefront endpoints.
//!
//! Each submodule adds methods to [`ApiClient`](crate::ApiClient) for one
//! area of the storefront API. They are thin: a path, a payload type and,
//! for reads shown on many screens, the query cache.

mod addresses;
mod auth;
mod cart;
mod catalog;
mod claims;
mod coupons;
mod curations;
mod inquiries;
mod orders;

/// Append `pairs` to `path` as a URL-encoded query string.
pub(crate) fn with_query<K, V>(path: &str, pairs: impl IntoIterator<Item = (K, V)>) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();

    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

/// `page` and `size` parameters of paged list endpoints.
pub(crate) fn page_query(path: &str, page: u32, size: u32) -> String {
    with_query(path, [("page", page.to_string()), ("size", size.to_string())])
}
