//! Raw GET passthrough.

use stylehub_client::{ApiClient, ApiError};

use super::emit;

/// GET `path` and print its data as pretty JSON.
pub async fn get(api: &ApiClient, path: &str) -> Result<(), ApiError> {
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    let data: serde_json::Value = api.get(&path).await?;
    emit(serde_json::to_string_pretty(&data)?);
    Ok(())
}
