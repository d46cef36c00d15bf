//! Pre-flight validation of the target URL

use url::Url;

use crate::error::ScrapeError;

const PROFILE_HOST: &str = "linkedin.com";

/// Accept only `http(s)://[sub.]linkedin.com/in/<slug>[/]`.
pub fn validate_profile_url(raw: &str) -> Result<Url, ScrapeError> {
    let invalid = |reason: &str| ScrapeError::InvalidInputUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }

    let host = url
        .host_str()
        .ok_or_else(|| invalid("missing host"))?
        .to_ascii_lowercase();
    let on_profile_host = host == PROFILE_HOST
        || host
            .strip_suffix(PROFILE_HOST)
            .is_some_and(|prefix| prefix.ends_with('.'));
    if !on_profile_host {
        return Err(invalid("host is not a profile host"));
    }

    let segments: Vec<&str> = url.path_segments().map(|s| s.collect()).unwrap_or_default();
    let shape_ok = match segments.as_slice() {
        ["in", slug] | ["in", slug, ""] => !slug.is_empty(),
        _ => false,
    };
    if !shape_ok {
        return Err(invalid("path must be /in/<profile>"));
    }

    Ok(url)
}
