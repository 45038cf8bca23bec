//! Response building.
//!
//! Turns a classified asset request into a complete HTTP response, or
//! decides the request has to be forwarded after all.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::header::{CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE, ETAG, LAST_MODIFIED};
use http::{Response, StatusCode};
use pinion_core::{Asset, AssetSource, FindOptions, SourceError};
use thiserror::Error;

use crate::classify::{AssetRequest, extension_of};
use crate::config::Config;

/// Sent for fingerprinted requests: the URL changes whenever the content
/// does, so clients may cache for a year without revalidating.
const IMMUTABLE_CACHE_CONTROL: &str = "public, max-age=31536000";

/// Sent for unfingerprinted requests: cacheable, but revalidated on
/// every use.
const REVALIDATE_CACHE_CONTROL: &str = "public, must-revalidate";

/// Error raised while building a response.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The engine failed and the failure cannot be rendered degraded.
    #[error(transparent)]
    Source(#[from] SourceError),
    /// Engine metadata produced an invalid header value.
    #[error("invalid response header: {0}")]
    Response(#[from] http::Error),
}

/// Builds the response for a classified asset request.
///
/// Returns `Ok(None)` when the engine does not know the path; the
/// caller must forward the request to the application untouched.
///
/// A request whose `If-None-Match` lists the asset's current digest is
/// answered `304 Not Modified` without a body. Compile failures of
/// script and stylesheet assets are rendered as degraded `200` bodies
/// that surface the failure in the browser; other compile failures and
/// all I/O failures are returned as errors.
pub async fn build_response<E>(
    engine: &E,
    config: &Config,
    request: &AssetRequest,
) -> Result<Option<Response<Bytes>>, BuildError>
where
    E: AssetSource + ?Sized,
{
    let options = if request.bundle() {
        FindOptions::bundled()
    } else {
        FindOptions::raw()
    };
    let asset = match engine.find_asset(request.asset_path(), options).await {
        Ok(Some(asset)) => asset,
        Ok(None) => return Ok(None),
        Err(SourceError::Compile {
            kind,
            message,
            backtrace,
        }) => {
            tracing::warn!(
                path = request.asset_path(),
                kind = kind.as_str(),
                message = message.as_str(),
                "asset compilation failed"
            );
            return degraded(config, request.asset_path(), kind, message, backtrace).map(Some);
        }
        Err(err) => return Err(err.into()),
    };

    if digest_matches(request.if_none_match(), asset.digest()) {
        return Ok(Some(not_modified()?));
    }

    if let Some(store) = config.store() {
        if let Err(error) = store.write(request.asset_path(), asset.content()).await {
            tracing::warn!(path = request.asset_path(), %error, "asset cache write failed");
        }
    }

    Ok(Some(serve(&asset, request.fingerprint().is_some())?))
}

fn serve(asset: &Asset, fingerprinted: bool) -> Result<Response<Bytes>, BuildError> {
    let cache_control = if fingerprinted {
        IMMUTABLE_CACHE_CONTROL
    } else {
        REVALIDATE_CACHE_CONTROL
    };
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, asset.content_type())
        .header(CONTENT_LENGTH, asset.len())
        .header(CACHE_CONTROL, cache_control)
        .header(LAST_MODIFIED, http_date(asset.modified()))
        .header(ETAG, asset.etag())
        .body(asset.content().clone())?;
    Ok(response)
}

fn not_modified() -> Result<Response<Bytes>, BuildError> {
    Ok(Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .body(Bytes::new())?)
}

/// Renders a compile failure in a form the browser surfaces, for asset
/// types where that is possible.
fn degraded(
    config: &Config,
    asset_path: &str,
    kind: String,
    message: String,
    backtrace: Option<String>,
) -> Result<Response<Bytes>, BuildError> {
    let media_type =
        extension_of(asset_path).and_then(|extension| config.media_types().for_extension(extension));
    match media_type {
        Some(found) if is_script(found) => script_failure(&kind, &message),
        Some(found) if is_stylesheet(found) => {
            stylesheet_failure(&kind, &message, backtrace.as_deref())
        }
        _ => Err(SourceError::Compile {
            kind,
            message,
            backtrace,
        }
        .into()),
    }
}

fn is_script(media_type: &str) -> bool {
    matches!(
        media_type,
        "application/javascript" | "text/javascript" | "application/ecmascript"
    )
}

fn is_stylesheet(media_type: &str) -> bool {
    media_type == "text/css"
}

/// A script body that throws on execution, so the failure lands in the
/// browser console instead of a silently broken page.
fn script_failure(kind: &str, message: &str) -> Result<Response<Bytes>, BuildError> {
    let text = serde_json::to_string(&format!("{kind}: {message}"))
        .expect("strings serialize to JSON");
    let body = Bytes::from(format!("throw Error({text})"));
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "application/javascript")
        .header(CONTENT_LENGTH, body.len())
        .body(body)?;
    Ok(response)
}

/// A stylesheet that hides the page and paints the failure message
/// through generated content.
fn stylesheet_failure(
    kind: &str,
    message: &str,
    backtrace: Option<&str>,
) -> Result<Response<Bytes>, BuildError> {
    let headline = css_escape(&format!("{kind}: {message}"));
    let frame = css_escape(backtrace.unwrap_or_default());
    let body = Bytes::from(format!(
        "html {{ padding: 18px 36px; }}\n\
         head {{ display: block; }}\n\
         body {{ margin: 0; padding: 0; }}\n\
         body > * {{ display: none !important; }}\n\
         head:after, body:before, body:after {{ display: block !important; }}\n\
         head:after {{ font-family: sans-serif; font-size: large; font-weight: bold; \
         content: \"Error compiling stylesheet asset\"; }}\n\
         body:before, body:after {{ font-family: monospace; white-space: pre-wrap; }}\n\
         body:before {{ font-weight: bold; content: \"{headline}\"; }}\n\
         body:after {{ content: \"{frame}\"; }}\n"
    ));
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/css; charset=utf-8")
        .header(CONTENT_LENGTH, body.len())
        .body(body)?;
    Ok(response)
}

/// Escapes text for a CSS `content` string: quotes, backslashes,
/// slashes and newlines become character escapes.
fn css_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str("\\005c "),
            '\n' => escaped.push_str("\\000a "),
            '"' => escaped.push_str("\\0022 "),
            '/' => escaped.push_str("\\002f "),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Compares an `If-None-Match` header against the current digest.
///
/// Handles comma-separated lists, quoted tags, weak `W/` prefixes and
/// the `*` wildcard.
fn digest_matches(if_none_match: Option<&str>, digest: &str) -> bool {
    let Some(header) = if_none_match else {
        return false;
    };
    header.split(',').map(str::trim).any(|tag| {
        if tag == "*" {
            return true;
        }
        let tag = tag.strip_prefix("W/").unwrap_or(tag);
        tag.trim_matches('"') == digest
    })
}

/// Formats a timestamp as an HTTP date, e.g.
/// `Tue, 26 Aug 2026 09:00:00 GMT`.
fn http_date(instant: DateTime<Utc>) -> String {
    httpdate::fmt_http_date(instant.into())
}
