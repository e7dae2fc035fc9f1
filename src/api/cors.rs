//! Cross-origin access for browser clients

use actix_cors::Cors;

/// Seconds browsers may cache a preflight answer
const PREFLIGHT_MAX_AGE: usize = 3600;

/// CORS policy admitting `allowed_origins` with any method and header
///
/// An empty list admits no cross-origin caller; same-origin and non-browser
/// requests are unaffected.
pub fn cors(allowed_origins: &[String]) -> Cors {
    allowed_origins.iter().fold(
        Cors::default()
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(PREFLIGHT_MAX_AGE),
        |cors, origin| cors.allowed_origin(origin),
    )
}
