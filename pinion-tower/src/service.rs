use std::sync::Arc;
use std::task::{Context, Poll};

use http::{Request, Response};
use http_body::Body as HttpBody;
use pinion_core::AssetSource;
use pinion_http::{Classification, Config, build_response, classify};
use tower::{BoxError, Service};

use crate::body::AssetBody;
use crate::future::AssetServiceFuture;

/// Tower service that answers asset requests before the wrapped service.
///
/// Requests are classified against the configured host prefix and media
/// types. Matches are resolved through the asset source; everything else is
/// forwarded to the wrapped service with the request untouched.
pub struct AssetService<S, E> {
    inner: S,
    engine: Arc<E>,
    config: Arc<Config>,
}

impl<S, E> AssetService<S, E> {
    /// Creates a service wrapping `inner` with the given pipeline and
    /// configuration.
    pub fn new(inner: S, engine: Arc<E>, config: Arc<Config>) -> Self {
        AssetService {
            inner,
            engine,
            config,
        }
    }
}

impl<S, E> Clone for AssetService<S, E>
where
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            engine: Arc::clone(&self.engine),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S, E, ReqBody, ResBody> Service<Request<ReqBody>> for AssetService<S, E>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone,
    S::Error: Into<BoxError>,
    E: AssetSource + Send + Sync + 'static,
    ResBody: HttpBody,
{
    type Response = Response<AssetBody<ResBody>>;
    type Error = BoxError;
    type Future = AssetServiceFuture<S, ReqBody>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        let (parts, body) = request.into_parts();

        let asset_request = match classify(&parts, &self.config) {
            Classification::Asset(asset_request) => asset_request,
            Classification::Passthrough => {
                let request = Request::from_parts(parts, body);
                return AssetServiceFuture::passthrough(self.inner.call(request));
            }
        };

        tracing::debug!(
            path = asset_request.asset_path(),
            fingerprint = asset_request.fingerprint(),
            "serving asset request"
        );

        let engine = Arc::clone(&self.engine);
        let config = Arc::clone(&self.config);
        let lookup =
            Box::pin(async move { build_response(engine.as_ref(), &config, &asset_request).await });

        // Park the instance that was polled ready; the fresh clone takes its
        // place in the middleware stack.
        let service = self.inner.clone();
        let service = std::mem::replace(&mut self.inner, service);
        let request = Request::from_parts(parts, body);

        AssetServiceFuture::serve(lookup, request, service)
    }
}
