//! Shared user-facing strings.
//!
//! Keep all strings shown to API consumers in this module so they stay in
//! one place and are easy to update or translate.

pub const GUIDE_DISABLED: &str = "Guide generation is disabled: no generator API key configured.";

pub const CITY_REQUIRED: &str = "city must not be empty";
pub const PROXY_URL_REQUIRED: &str = "url query parameter missing";
pub const PROXY_FAILED: &str = "could not fetch the requested image";

pub fn generator_error(err: &anyhow::Error) -> String {
    format!("Could not reach the guide generator: {err}")
}
