use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Future;
use futures::future::BoxFuture;
use futures::ready;
use http::{Request, Response};
use pin_project::pin_project;
use pinion_http::BuildError;
use tower::{BoxError, Service};

use crate::body::AssetBody;

/// Boxed asset lookup, resolved before the wrapped service is consulted.
type LookupFuture = BoxFuture<'static, Result<Option<Response<Bytes>>, BuildError>>;

/// Response future returned by [`AssetService`](crate::service::AssetService).
///
/// Starts in one of two states depending on how the request was classified.
/// Asset requests resolve a lookup first and fall through to the parked
/// service only when the source has no matching asset, so unknown paths
/// still reach the application.
#[pin_project]
pub struct AssetServiceFuture<S, ReqBody>
where
    S: Service<Request<ReqBody>>,
{
    #[pin]
    state: State<S, ReqBody>,
}

#[pin_project(project = StateProj)]
enum State<S, ReqBody>
where
    S: Service<Request<ReqBody>>,
{
    /// The request named an asset. The original request and a ready service
    /// instance are parked for the fallthrough case.
    Serve {
        #[pin]
        lookup: LookupFuture,
        request: Option<Request<ReqBody>>,
        service: Option<S>,
    },
    /// The request is not for an asset and the inner call is already in flight.
    Passthrough {
        #[pin]
        future: S::Future,
    },
}

impl<S, ReqBody> AssetServiceFuture<S, ReqBody>
where
    S: Service<Request<ReqBody>>,
{
    pub(crate) fn serve(lookup: LookupFuture, request: Request<ReqBody>, service: S) -> Self {
        Self {
            state: State::Serve {
                lookup,
                request: Some(request),
                service: Some(service),
            },
        }
    }

    pub(crate) fn passthrough(future: S::Future) -> Self {
        Self {
            state: State::Passthrough { future },
        }
    }
}

impl<S, ReqBody, ResBody> Future for AssetServiceFuture<S, ReqBody>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Error: Into<BoxError>,
{
    type Output = Result<Response<AssetBody<ResBody>>, BoxError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        loop {
            let next = match self.as_mut().project().state.project() {
                StateProj::Serve {
                    lookup,
                    request,
                    service,
                } => match ready!(lookup.poll(cx)) {
                    Ok(Some(response)) => {
                        return Poll::Ready(Ok(response.map(AssetBody::full)));
                    }
                    Ok(None) => {
                        let request = request
                            .take()
                            .expect("asset future polled after the request was forwarded");
                        let mut service = service
                            .take()
                            .expect("asset future polled after the service was consumed");
                        State::Passthrough {
                            future: service.call(request),
                        }
                    }
                    Err(error) => return Poll::Ready(Err(error.into())),
                },
                StateProj::Passthrough { future } => match ready!(future.poll(cx)) {
                    Ok(response) => return Poll::Ready(Ok(response.map(AssetBody::inner))),
                    Err(error) => return Poll::Ready(Err(error.into())),
                },
            };
            self.as_mut().project().state.set(next);
        }
    }
}
