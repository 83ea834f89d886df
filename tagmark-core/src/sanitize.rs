//! URL sanitizing for link-like tags.

use url::{ParseError, Url};

/// Why a candidate URL was rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("URL scheme not allowed: {0}")]
    DisallowedScheme(String),

    #[error("malformed URL: {0}")]
    Malformed(String),
}

/// What [`sanitize_url`] accepts and how it fixes up scheme-less input.
#[derive(Debug, Clone, Copy)]
pub struct UrlPolicy<'a> {
    /// Schemes an absolute URL may use.
    pub allowed_schemes: &'a [&'a str],
    /// Scheme prepended to host-like input such as `www.example.com`.
    pub default_scheme: &'a str,
    /// Base used to turn relative references into absolute URLs.
    pub base: Option<&'a Url>,
    /// Return the URL without its `scheme:` prefix (`mailto:` addresses).
    pub force_remove_scheme: bool,
    /// Treat host-like relative input as a remote URL instead of a path.
    ///
    /// When disabled, every scheme-less input gets the default scheme.
    pub fix_non_local_urls: bool,
}

impl Default for UrlPolicy<'_> {
    fn default() -> Self {
        Self {
            allowed_schemes: &["http", "https"],
            default_scheme: "http",
            base: None,
            force_remove_scheme: false,
            fix_non_local_urls: true,
        }
    }
}

impl<'a> UrlPolicy<'a> {
    #[must_use]
    pub fn with_base(mut self, base: Option<&'a Url>) -> Self {
        self.base = base;
        self
    }

    fn check_scheme(&self, url: Url) -> Result<Url, UrlError> {
        if self
            .allowed_schemes
            .iter()
            .any(|scheme| scheme.eq_ignore_ascii_case(url.scheme()))
        {
            Ok(url)
        } else {
            Err(UrlError::DisallowedScheme(url.scheme().to_string()))
        }
    }

    fn finish(&self, url: Url) -> Result<String, UrlError> {
        let url = self.check_scheme(url)?;
        if self.force_remove_scheme {
            let without_scheme = url
                .as_str()
                .get(url.scheme().len() + 1..)
                .unwrap_or_default()
                .trim_start_matches('/');
            return Ok(without_scheme.to_string());
        }
        Ok(url.into())
    }
}

/// Validate a user supplied URL against a [`UrlPolicy`].
///
/// Absolute URLs must use an allowed scheme. Relative references are resolved
/// against the policy base when there is one; without a base they are returned
/// unchanged, since they cannot carry a scheme.
///
/// # Errors
///
/// Returns [`UrlError`] when the URL is empty, malformed, or uses a scheme
/// outside the allow-list.
pub fn sanitize_url(candidate: &str, policy: &UrlPolicy<'_>) -> Result<String, UrlError> {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return Err(UrlError::Empty);
    }

    match Url::parse(candidate) {
        Ok(url) => policy.finish(url),
        Err(ParseError::RelativeUrlWithoutBase) => {
            if !policy.fix_non_local_urls {
                let url = Url::parse(&format!("{}:{candidate}", policy.default_scheme))
                    .map_err(|e| UrlError::Malformed(e.to_string()))?;
                return policy.finish(url);
            }
            if looks_like_host(candidate) {
                let url = Url::parse(&format!("{}://{candidate}", policy.default_scheme))
                    .map_err(|e| UrlError::Malformed(e.to_string()))?;
                return policy.finish(url);
            }
            match policy.base {
                Some(base) => {
                    let url = base
                        .join(candidate)
                        .map_err(|e| UrlError::Malformed(e.to_string()))?;
                    policy.finish(url)
                }
                None => Ok(candidate.to_string()),
            }
        }
        Err(e) => Err(UrlError::Malformed(e.to_string())),
    }
}

/// `www.example.com/page` is a host, `/page`, `./page` and `page.html` are paths.
fn looks_like_host(candidate: &str) -> bool {
    if candidate.starts_with(['/', '.', '#', '?']) {
        return false;
    }
    let host = candidate
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    host.starts_with("www.")
        || (host.contains('.')
            && host
                .rsplit('.')
                .next()
                .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
            && !candidate.contains('/')
            && !is_file_like(host))
}

fn is_file_like(host: &str) -> bool {
    const FILE_EXTENSIONS: &[&str] = &["html", "htm", "php", "png", "jpg", "jpeg", "gif", "txt"];
    host.rsplit('.')
        .next()
        .is_some_and(|ext| FILE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}
