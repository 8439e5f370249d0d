use url::Url;

/// The display domain for an instance URI: its hostname when the URI is an
/// absolute URL with a host, the URI unchanged otherwise. Never fails.
pub fn display_domain(uri: &str) -> String {
    Url::parse(uri)
        .ok()
        .and_then(|url| url.host_str().map(str::to_owned))
        .unwrap_or_else(|| uri.to_string())
}
