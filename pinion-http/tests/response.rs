use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use http::StatusCode;
use http::header::{CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE, ETAG, LAST_MODIFIED};
use pinion_core::{Asset, AssetSource, AssetStore, FindOptions, MemorySource, SourceError, StoreError};
use pinion_http::{AssetRequest, BuildError, CacheDirective, Config, Settings, build_response};

struct FixedSource {
    asset: Asset,
}

#[async_trait]
impl AssetSource for FixedSource {
    async fn find_asset(
        &self,
        _logical_path: &str,
        _options: FindOptions,
    ) -> Result<Option<Asset>, SourceError> {
        Ok(Some(self.asset.clone()))
    }
}

struct FailingSource;

#[async_trait]
impl AssetSource for FailingSource {
    async fn find_asset(
        &self,
        _logical_path: &str,
        _options: FindOptions,
    ) -> Result<Option<Asset>, SourceError> {
        Err(SourceError::Io(std::io::Error::other("disk on fire")))
    }
}

struct RefusingStore;

#[async_trait]
impl AssetStore for RefusingStore {
    async fn write(&self, logical_path: &str, _contents: &[u8]) -> Result<(), StoreError> {
        Err(StoreError::InvalidPath {
            path: logical_path.to_string(),
        })
    }
}

fn modified() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2015-10-21T07:28:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn script_asset() -> Asset {
    Asset::new("var x=1;", "application/javascript", "abc123", modified())
}

fn config() -> Config {
    Settings {
        search_paths: vec![PathBuf::from("app")],
        ..Settings::default()
    }
    .build()
    .unwrap()
}

fn plain_request(path: &str) -> AssetRequest {
    AssetRequest::new(path, None, true, None)
}

#[tokio::test]
async fn served_assets_carry_the_full_header_set() {
    let engine = FixedSource {
        asset: script_asset(),
    };
    let response = build_response(&engine, &config(), &plain_request("app.js"))
        .await
        .unwrap()
        .expect("asset response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/javascript");
    assert_eq!(response.headers()[CONTENT_LENGTH], "8");
    assert_eq!(response.headers()[CACHE_CONTROL], "public, must-revalidate");
    assert_eq!(response.headers()[ETAG], "\"abc123\"");
    assert_eq!(
        response.headers()[LAST_MODIFIED],
        "Wed, 21 Oct 2015 07:28:00 GMT",
    );
    assert_eq!(response.body().as_ref(), b"var x=1;");
}

#[tokio::test]
async fn fingerprinted_requests_cache_for_a_year() {
    let engine = FixedSource {
        asset: script_asset(),
    };
    let request = AssetRequest::new("app.js", Some("abc123".to_string()), true, None);
    let response = build_response(&engine, &config(), &request)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(response.headers()[CACHE_CONTROL], "public, max-age=31536000");
}

#[tokio::test]
async fn matching_entity_tag_yields_not_modified() {
    let engine = FixedSource {
        asset: script_asset(),
    };
    let request = AssetRequest::new("app.js", None, true, Some("\"abc123\"".to_string()));
    let response = build_response(&engine, &config(), &request)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    assert!(response.body().is_empty());
    assert!(response.headers().get(ETAG).is_none());
}

#[tokio::test]
async fn stale_entity_tag_yields_the_full_response() {
    let engine = FixedSource {
        asset: script_asset(),
    };
    let request = AssetRequest::new("app.js", None, true, Some("\"older\"".to_string()));
    let response = build_response(&engine, &config(), &request)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.body().as_ref(), b"var x=1;");
}

#[tokio::test]
async fn unknown_paths_are_forwarded() {
    let source = MemorySource::new();
    let response = build_response(&source, &config(), &plain_request("missing.js"))
        .await
        .unwrap();
    assert!(response.is_none());
}

#[tokio::test]
async fn raw_lookups_reach_the_engine() {
    let source = MemorySource::new();
    source.insert("app.js", "application/javascript", "var bundled;");
    source.insert_raw("app.js", "var raw;");
    let request = AssetRequest::new("app.js", None, false, None);
    let response = build_response(&source, &config(), &request)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(response.body().as_ref(), b"var raw;");
}

#[tokio::test]
async fn script_compile_failures_degrade_to_a_throw() {
    let source = MemorySource::new();
    source.insert_error("app.js", "SyntaxError", "unexpected token");
    let response = build_response(&source, &config(), &plain_request("app.js"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/javascript");
    let body = std::str::from_utf8(response.body()).unwrap();
    assert!(body.starts_with("throw Error("), "body: {body}");
    assert!(body.contains("SyntaxError: unexpected token"));
}

#[tokio::test]
async fn stylesheet_compile_failures_degrade_to_visible_content() {
    let source = MemorySource::new();
    source.insert_error("app.css", "SyntaxError", "invalid selector");
    let response = build_response(&source, &config(), &plain_request("app.css"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/css"), "type: {content_type}");
    let body = std::str::from_utf8(response.body()).unwrap();
    assert!(body.starts_with("html {"), "body: {body}");
    assert!(body.contains("SyntaxError: invalid selector"));
}

#[tokio::test]
async fn other_compile_failures_are_reraised() {
    let source = MemorySource::new();
    source.insert_error("app.wasm", "CompileError", "bad section");
    let config = Settings {
        mime_types: Some(vec![("application/wasm".to_string(), ".wasm".to_string())]),
        search_paths: vec![PathBuf::from("app")],
        ..Settings::default()
    }
    .build()
    .unwrap();
    let err = build_response(&source, &config, &plain_request("app.wasm"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "CompileError: bad section");
}

#[tokio::test]
async fn io_failures_are_raised() {
    let err = build_response(&FailingSource, &config(), &plain_request("app.js"))
        .await
        .unwrap_err();
    assert!(matches!(err, BuildError::Source(SourceError::Io(_))));
}

#[tokio::test]
async fn served_bodies_are_written_through_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let source = MemorySource::new();
    source.insert("nested/app.js", "application/javascript", "var cached;");
    let config = Settings {
        root: Some(dir.path().to_path_buf()),
        cache: CacheDirective::Path("asset-cache".to_string()),
        search_paths: vec![PathBuf::from("app")],
        ..Settings::default()
    }
    .build()
    .unwrap();
    let response = build_response(&source, &config, &plain_request("nested/app.js"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let written = std::fs::read(dir.path().join("asset-cache/nested/app.js")).unwrap();
    assert_eq!(written, b"var cached;");
}

#[tokio::test]
async fn not_modified_responses_skip_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let source = MemorySource::new();
    let digest = source.insert("app.js", "application/javascript", "var cached;");
    let config = Settings {
        root: Some(dir.path().to_path_buf()),
        cache: CacheDirective::Path("asset-cache".to_string()),
        search_paths: vec![PathBuf::from("app")],
        ..Settings::default()
    }
    .build()
    .unwrap();
    let request = AssetRequest::new("app.js", None, true, Some(format!("\"{digest}\"")));
    let response = build_response(&source, &config, &request)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    assert!(!dir.path().join("asset-cache/app.js").exists());
}

#[tokio::test]
async fn store_failures_do_not_fail_the_response() {
    let source = MemorySource::new();
    source.insert("app.js", "application/javascript", "var x;");
    let config = Settings {
        cache: CacheDirective::store(RefusingStore),
        search_paths: vec![PathBuf::from("app")],
        ..Settings::default()
    }
    .build()
    .unwrap();
    let response = build_response(&source, &config, &plain_request("app.js"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.body().as_ref(), b"var x;");
}
