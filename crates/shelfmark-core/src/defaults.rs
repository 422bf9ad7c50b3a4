//! Default values shared across shelfmark crates.

/// Title stored when enrichment cannot produce one (unreachable url, non-2xx
/// response, missing or empty `<title>` element).
pub const FALLBACK_TITLE: &str = "Untitled";

/// Timeout for outbound title-fetch requests (seconds).
pub const TITLE_FETCH_TIMEOUT_SECS: u64 = 5;

/// Timeout for identity-provider verification requests (seconds).
pub const IDENTITY_TIMEOUT_SECS: u64 = 10;

/// Google's ID-token verification endpoint.
pub const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Favicon service template; `{host}` is replaced with the site's host.
pub const FAVICON_URL_TEMPLATE: &str = "https://www.google.com/s2/favicons?domain={host}&sz=32";

/// Access-token lifetime in days.
pub const AUTH_TOKEN_TTL_DAYS: i64 = 7;
