//! Security response headers

use axum::{
    extract::{Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

pub type HeaderSet = &'static [(&'static str, &'static str)];

/// Headers added to every response outside local mode
pub const PRODUCTION_HEADERS: HeaderSet = &[
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "SAMEORIGIN"),
    (
        "strict-transport-security",
        "max-age=31536000; includeSubDomains; preload",
    ),
    (
        "content-security-policy",
        "default-src 'self'; script-src 'self' 'unsafe-inline'; style-src 'self' 'unsafe-inline'; \
         img-src 'self' data: blob: *; font-src 'self'; connect-src 'self'; media-src 'self'; \
         object-src 'none'; frame-src 'self'; worker-src 'self'; form-action 'self'; \
         base-uri 'self'; frame-ancestors 'self'; upgrade-insecure-requests;",
    ),
    ("referrer-policy", "strict-origin-when-cross-origin"),
    ("x-dns-prefetch-control", "off"),
    (
        "permissions-policy",
        "accelerometer=(), camera=(), geolocation=(), gyroscope=(), magnetometer=(), \
         microphone=(), payment=(), usb=()",
    ),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-embedder-policy", "require-corp"),
    ("cross-origin-resource-policy", "same-origin"),
];

pub fn headers_for(local_mode: bool) -> HeaderSet {
    if local_mode {
        &[]
    } else {
        PRODUCTION_HEADERS
    }
}

pub async fn security_headers(
    State(headers): State<HeaderSet>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let response_headers = response.headers_mut();
    for &(name, value) in headers {
        response_headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    response
}
