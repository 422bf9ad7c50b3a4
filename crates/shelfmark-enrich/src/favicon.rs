//! Favicon URL derivation.
//!
//! Pure string work: the favicon is served by Google's favicon service
//! keyed on the bookmarked site's host. No request is made here.

use url::Url;

use shelfmark_core::defaults::FAVICON_URL_TEMPLATE;

/// Derive a favicon URL from a site's url, or None when no host can be
/// parsed out of it.
pub fn favicon_url_for(site_url: &str) -> Option<String> {
    let parsed = Url::parse(site_url).ok()?;
    let host = parsed.host_str()?;
    Some(FAVICON_URL_TEMPLATE.replace("{host}", host))
}
