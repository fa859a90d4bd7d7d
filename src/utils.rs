// Small helpers shared by the auth and HTTP layers

/// Join a base URL and an absolute API path without doubling the slash
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// First characters of a token, safe to put in logs
pub fn token_preview(token: &str) -> String {
    const PREVIEW_LEN: usize = 12;
    let preview: String = token.chars().take(PREVIEW_LEN).collect();
    if token.chars().count() > PREVIEW_LEN {
        format!("{}...", preview)
    } else {
        preview
    }
}

/// Body of an error response, or a placeholder when it cannot be read
///
/// Never fails; callers report the status they already hold.
pub async fn error_body(response: reqwest::Response) -> String {
    match response.text().await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read error response body");
            format!("<body unavailable: {}>", e)
        }
    }
}
