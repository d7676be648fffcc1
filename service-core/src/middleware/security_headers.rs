use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::IntoResponse,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityHeaders {
    /// `Strict-Transport-Security` max-age in seconds; 0 leaves the header off.
    pub hsts_max_age: u64,
}

pub async fn security_headers_middleware(
    State(settings): State<SecurityHeaders>,
    req: Request,
    next: Next,
) -> impl IntoResponse {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_XSS_PROTECTION,
        header::HeaderValue::from_static("1; mode=block"),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        header::HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::X_FRAME_OPTIONS,
        header::HeaderValue::from_static("SAMEORIGIN"),
    );

    if settings.hsts_max_age > 0
        && let Ok(value) = header::HeaderValue::from_str(&format!(
            "max-age={}; includeSubDomains",
            settings.hsts_max_age
        ))
    {
        headers.insert(header::STRICT_TRANSPORT_SECURITY, value);
    }

    response
}
