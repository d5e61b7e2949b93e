//! Security response headers
//!
//! Every response gets nosniff, frame denial, a strict referrer policy,
//! `no-store` caching and a locked-down CSP. HSTS is opt-in and, by default,
//! only sent for requests that reached the edge over HTTPS.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::config::SecurityHeadersConfig;

pub async fn security_headers_middleware(
    State(config): State<SecurityHeadersConfig>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let hsts = hsts_header(&config, request.headers());

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    let baseline = [
        (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        (header::X_FRAME_OPTIONS, "DENY"),
        (header::REFERRER_POLICY, "strict-origin-when-cross-origin"),
        (
            header::CACHE_CONTROL,
            "no-store, no-cache, must-revalidate, private",
        ),
        (
            header::CONTENT_SECURITY_POLICY,
            "default-src 'none'; frame-ancestors 'none'",
        ),
        (
            HeaderName::from_static("permissions-policy"),
            "geolocation=(), microphone=(), camera=()",
        ),
    ];
    for (name, value) in baseline {
        headers.insert(name, HeaderValue::from_static(value));
    }
    if let Some(value) = hsts {
        headers.insert(header::STRICT_TRANSPORT_SECURITY, value);
    }

    response
}

/// Strict-Transport-Security value for this request, if any
fn hsts_header(config: &SecurityHeadersConfig, request_headers: &HeaderMap) -> Option<HeaderValue> {
    if !config.hsts_enabled {
        return None;
    }
    if config.hsts_https_only {
        let forwarded_https = config.hsts_trust_x_forwarded_proto
            && request_headers
                .get("x-forwarded-proto")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.eq_ignore_ascii_case("https"));
        if !forwarded_https {
            return None;
        }
    }

    let mut value = format!("max-age={}", config.hsts_max_age_secs);
    if config.hsts_include_subdomains {
        value.push_str("; includeSubDomains");
    }
    if config.hsts_preload {
        value.push_str("; preload");
    }
    HeaderValue::from_str(&value).ok()
}
