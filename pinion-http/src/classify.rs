//! Request classification.
//!
//! Decides, from the request head alone, whether a request is
//! asset-bound. The checks run cheapest first and any failure
//! short-circuits to [`Classification::Passthrough`].

use std::borrow::Cow;
use std::sync::OnceLock;

use http::Method;
use http::header::{ACCEPT, CONTENT_TYPE, HeaderName, IF_NONE_MATCH};
use http::request::Parts;
use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::config::Config;
use crate::query;

/// Pattern of a content fingerprint: `-` plus 7 to 40 lowercase hex
/// characters, directly before the final extension.
const FINGERPRINT_PATTERN: &str = r"-([0-9a-f]{7,40})\.[^.]+$";

fn fingerprint_regex() -> &'static Regex {
    static FINGERPRINT: OnceLock<Regex> = OnceLock::new();
    FINGERPRINT
        .get_or_init(|| Regex::new(FINGERPRINT_PATTERN).expect("fingerprint pattern compiles"))
}

/// Outcome of classifying a request head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The request asks for a served asset.
    Asset(AssetRequest),
    /// Not an asset request; forward it untouched.
    Passthrough,
}

/// Everything the response builder needs to serve one asset request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    asset_path: String,
    fingerprint: Option<String>,
    bundle: bool,
    if_none_match: Option<String>,
}

impl AssetRequest {
    /// Creates an asset request from already classified parts.
    pub fn new(
        asset_path: impl Into<String>,
        fingerprint: Option<String>,
        bundle: bool,
        if_none_match: Option<String>,
    ) -> Self {
        Self {
            asset_path: asset_path.into(),
            fingerprint,
            bundle,
            if_none_match,
        }
    }

    /// Logical path handed to the engine, e.g. `nested/app.js`.
    pub fn asset_path(&self) -> &str {
        &self.asset_path
    }

    /// Content fingerprint split out of the path, if any.
    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    /// `false` when the query string asked for the raw, unbundled body.
    pub fn bundle(&self) -> bool {
        self.bundle
    }

    /// Raw `If-None-Match` value, when the request carried one.
    pub fn if_none_match(&self) -> Option<&str> {
        self.if_none_match.as_deref()
    }
}

/// Classifies a request head against the middleware configuration.
///
/// The checks run in order; the first failure wins:
///
/// 1. the method is `GET` or `HEAD`
/// 2. the percent-decoded path has no `../` segment
/// 3. the decoded path falls under the hosted prefix
/// 4. the extension, `Accept` header or request media type appears in
///    the media type table
///
/// Surviving requests get the fingerprint split out and the hosted
/// prefix stripped to form the logical asset path.
pub fn classify(parts: &Parts, config: &Config) -> Classification {
    if parts.method != Method::GET && parts.method != Method::HEAD {
        return Classification::Passthrough;
    }
    let Ok(path) = percent_decode_str(parts.uri.path()).decode_utf8() else {
        return Classification::Passthrough;
    };
    if path.contains("../") {
        return Classification::Passthrough;
    }
    if !config.hosted_at().matches(&path) {
        return Classification::Passthrough;
    }
    if !recognized_media(parts, &path, config) {
        return Classification::Passthrough;
    }

    let (asset_path, fingerprint) = split_fingerprint(&path, config);
    let bundle = !query::raw_requested(parts.uri.query().unwrap_or(""));
    let if_none_match = header_str(parts, IF_NONE_MATCH).map(str::to_owned);

    Classification::Asset(AssetRequest {
        asset_path,
        fingerprint,
        bundle,
        if_none_match,
    })
}

/// Whether any of the three media signals lands in the configured table.
fn recognized_media(parts: &Parts, path: &str, config: &Config) -> bool {
    let table = config.media_types();
    if let Some(extension) = extension_of(path) {
        if table.contains_extension(extension) {
            return true;
        }
    }
    if let Some(accept) = header_str(parts, ACCEPT) {
        if table.accepts(accept) {
            return true;
        }
    }
    if let Some(content_type) = header_str(parts, CONTENT_TYPE) {
        let media_type = content_type.split(';').next().unwrap_or("").trim();
        if table.contains_media_type(media_type) {
            return true;
        }
    }
    false
}

fn header_str<'a>(parts: &'a Parts, name: HeaderName) -> Option<&'a str> {
    parts.headers.get(name).and_then(|value| value.to_str().ok())
}

/// Final extension of `path` with its leading dot, e.g. `.js`.
///
/// Dotfiles and trailing dots do not count as extensions.
pub(crate) fn extension_of(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(dot) if dot > 0 && dot + 1 < name.len() => Some(&name[dot..]),
        _ => None,
    }
}

/// Splits the fingerprint out of a decoded request path and derives the
/// logical asset path: fingerprint segment dropped, hosted prefix and
/// leading slash stripped.
fn split_fingerprint(path: &str, config: &Config) -> (String, Option<String>) {
    let (without, fingerprint) = match fingerprint_regex().captures(path) {
        Some(captures) => {
            let digest = captures.get(1).expect("pattern has one capture group");
            let mut without = String::with_capacity(path.len());
            // drop the digest together with its leading '-'
            without.push_str(&path[..digest.start() - 1]);
            without.push_str(&path[digest.end()..]);
            (Cow::Owned(without), Some(digest.as_str().to_owned()))
        }
        None => (Cow::Borrowed(path), None),
    };
    let stripped = config.hosted_at().strip_from(&without);
    (stripped.trim_start_matches('/').to_owned(), fingerprint)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::config::Settings;

    fn parts(method: Method, uri: &str) -> Parts {
        let request = http::Request::builder()
            .method(method)
            .uri(uri)
            .body(())
            .unwrap();
        request.into_parts().0
    }

    fn config_at(prefix: &str) -> Config {
        Settings {
            hosted_at: Some(prefix.to_string()),
            search_paths: vec![PathBuf::from("app")],
            ..Settings::default()
        }
        .build()
        .unwrap()
    }

    fn expect_asset(classification: Classification) -> AssetRequest {
        match classification {
            Classification::Asset(request) => request,
            Classification::Passthrough => panic!("expected an asset classification"),
        }
    }

    #[test]
    fn fingerprinted_path_is_split() {
        let config = config_at("/assets");
        let parts = parts(
            Method::GET,
            "/assets/app-0aa2105d29558f3eb790d411d7d8fb66.js",
        );
        let request = expect_asset(classify(&parts, &config));
        assert_eq!(request.asset_path(), "app.js");
        assert_eq!(
            request.fingerprint(),
            Some("0aa2105d29558f3eb790d411d7d8fb66"),
        );
        assert!(request.bundle());
    }

    #[test]
    fn hex_runs_longer_than_forty_are_not_fingerprints() {
        let config = config_at("/assets");
        let long = format!("/assets/app-{}.js", "a".repeat(41));
        let request = expect_asset(classify(&parts(Method::GET, &long), &config));
        assert_eq!(request.fingerprint(), None);
        assert_eq!(request.asset_path(), format!("app-{}.js", "a".repeat(41)));
    }

    #[test]
    fn forty_hex_characters_still_count() {
        let config = config_at("/assets");
        let forty = "a".repeat(40);
        let uri = format!("/assets/app-{forty}.js");
        let request = expect_asset(classify(&parts(Method::GET, &uri), &config));
        assert_eq!(request.fingerprint(), Some(forty.as_str()));
        assert_eq!(request.asset_path(), "app.js");
    }

    #[test]
    fn short_or_uppercase_runs_are_not_fingerprints() {
        let config = config_at("/assets");
        for name in ["app-abc12.js", "app-ABCDEF01.js", "app-0aa2105dzz.js"] {
            let uri = format!("/assets/{name}");
            let request = expect_asset(classify(&parts(Method::GET, &uri), &config));
            assert_eq!(request.fingerprint(), None, "name: {name}");
            assert_eq!(request.asset_path(), name);
        }
    }

    #[test]
    fn fingerprint_followed_by_more_characters_does_not_count() {
        let config = config_at("/assets");
        let uri = "/assets/lala-0aa2105d29558f3eb790d411d7d8fb66lkasdkketw.js";
        let request = expect_asset(classify(&parts(Method::GET, uri), &config));
        assert_eq!(request.fingerprint(), None);
        assert_eq!(
            request.asset_path(),
            "lala-0aa2105d29558f3eb790d411d7d8fb66lkasdkketw.js",
        );
    }

    #[test]
    fn nested_and_multi_dot_names_survive() {
        let config = config_at("/javascripts");
        let request = expect_asset(classify(
            &parts(Method::GET, "/javascripts/nested/lala.awesome.js"),
            &config,
        ));
        assert_eq!(request.asset_path(), "nested/lala.awesome.js");
    }

    #[test]
    fn root_prefix_serves_everything_with_a_known_extension() {
        let config = config_at("/");
        let request = expect_asset(classify(&parts(Method::GET, "/app.css"), &config));
        assert_eq!(request.asset_path(), "app.css");
    }

    #[test]
    fn non_get_methods_pass_through() {
        let config = config_at("/assets");
        for method in [Method::POST, Method::PUT, Method::DELETE] {
            let parts = parts(method.clone(), "/assets/app.js");
            assert_eq!(
                classify(&parts, &config),
                Classification::Passthrough,
                "method: {method}",
            );
        }
    }

    #[test]
    fn head_requests_qualify() {
        let config = config_at("/assets");
        let request = expect_asset(classify(&parts(Method::HEAD, "/assets/app.js"), &config));
        assert_eq!(request.asset_path(), "app.js");
    }

    #[test]
    fn traversal_segments_pass_through() {
        let config = config_at("/assets");
        for uri in [
            "/assets/../secrets.js",
            "/assets/%2e%2e%2fsecrets.js",
            "/assets/nested/..%2f..%2fsecrets.js",
        ] {
            assert_eq!(
                classify(&parts(Method::GET, uri), &config),
                Classification::Passthrough,
                "uri: {uri}",
            );
        }
    }

    #[test]
    fn paths_outside_the_prefix_pass_through() {
        let config = config_at("/javascripts");
        let parts = parts(Method::GET, "/stylesheets/lala.css");
        assert_eq!(classify(&parts, &config), Classification::Passthrough);
    }

    #[test]
    fn unknown_extensions_pass_through() {
        let config = config_at("/assets");
        let parts = parts(Method::GET, "/assets/index.html");
        assert_eq!(classify(&parts, &config), Classification::Passthrough);
    }

    #[test]
    fn accept_header_qualifies_extensionless_paths() {
        let config = config_at("/assets");
        let request = http::Request::builder()
            .method(Method::GET)
            .uri("/assets/app")
            .header(ACCEPT, "text/css")
            .body(())
            .unwrap();
        let request = expect_asset(classify(&request.into_parts().0, &config));
        assert_eq!(request.asset_path(), "app");
    }

    #[test]
    fn request_media_type_qualifies_extensionless_paths() {
        let config = config_at("/assets");
        let request = http::Request::builder()
            .method(Method::GET)
            .uri("/assets/app")
            .header(CONTENT_TYPE, "application/javascript; charset=utf-8")
            .body(())
            .unwrap();
        let request = expect_asset(classify(&request.into_parts().0, &config));
        assert_eq!(request.asset_path(), "app");
    }

    #[test]
    fn body_flag_disables_bundling() {
        let config = config_at("/assets");
        for (query, bundle) in [
            ("body=1", false),
            ("body=true", false),
            ("body=t", false),
            ("body=0", true),
            ("body=false", true),
            ("other=1", true),
            ("", true),
        ] {
            let uri = format!("/assets/app.js?{query}");
            let request = expect_asset(classify(&parts(Method::GET, &uri), &config));
            assert_eq!(request.bundle(), bundle, "query: {query}");
        }
    }

    #[test]
    fn if_none_match_is_captured() {
        let config = config_at("/assets");
        let request = http::Request::builder()
            .method(Method::GET)
            .uri("/assets/app.js")
            .header(IF_NONE_MATCH, "\"abc123\"")
            .body(())
            .unwrap();
        let request = expect_asset(classify(&request.into_parts().0, &config));
        assert_eq!(request.if_none_match(), Some("\"abc123\""));
    }

    #[test]
    fn extensions_are_taken_from_the_final_segment() {
        assert_eq!(extension_of("/assets/app.js"), Some(".js"));
        assert_eq!(extension_of("/assets/lala.awesome.js"), Some(".js"));
        assert_eq!(extension_of("/assets.d/app"), None);
        assert_eq!(extension_of("/assets/.hidden"), None);
        assert_eq!(extension_of("/assets/app."), None);
    }
}
