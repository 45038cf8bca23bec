use bytes::{Buf, Bytes};
use http_body::{Body, Frame, SizeHint};
use pin_project::pin_project;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Response body produced by [`AssetService`](crate::service::AssetService).
///
/// Served assets carry their complete content as a single data frame.
/// Responses from the wrapped service keep their original body, with data
/// frames converted to [`Bytes`] so both arms share one `Data` type.
#[pin_project(project = AssetBodyProj)]
pub enum AssetBody<B> {
    /// A finished asset, yielded as one data frame.
    ///
    /// The `Option` is used to yield the content once, then return `None` on
    /// subsequent polls.
    Full(Option<Bytes>),

    /// A body forwarded from the wrapped service.
    Inner(#[pin] B),
}

impl<B> AssetBody<B> {
    /// Wraps served content.
    ///
    /// Empty content produces a body that ends immediately without yielding
    /// a frame, which keeps `304 Not Modified` responses frameless.
    pub fn full(content: Bytes) -> Self {
        if content.is_empty() {
            AssetBody::Full(None)
        } else {
            AssetBody::Full(Some(content))
        }
    }

    /// Wraps a body from the wrapped service.
    pub fn inner(body: B) -> Self {
        AssetBody::Inner(body)
    }
}

impl<B> Body for AssetBody<B>
where
    B: Body,
{
    type Data = Bytes;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match self.project() {
            AssetBodyProj::Full(content) => match content.take() {
                Some(bytes) => Poll::Ready(Some(Ok(Frame::data(bytes)))),
                None => Poll::Ready(None),
            },
            AssetBodyProj::Inner(body) => match body.poll_frame(cx) {
                Poll::Ready(Some(Ok(frame))) => {
                    let frame = frame.map_data(|mut data| data.copy_to_bytes(data.remaining()));
                    Poll::Ready(Some(Ok(frame)))
                }
                Poll::Ready(Some(Err(error))) => Poll::Ready(Some(Err(error))),
                Poll::Ready(None) => Poll::Ready(None),
                Poll::Pending => Poll::Pending,
            },
        }
    }

    fn size_hint(&self) -> SizeHint {
        match self {
            AssetBody::Full(Some(bytes)) => SizeHint::with_exact(bytes.len() as u64),
            AssetBody::Full(None) => SizeHint::with_exact(0),
            AssetBody::Inner(body) => body.size_hint(),
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            AssetBody::Full(content) => content.is_none(),
            AssetBody::Inner(body) => body.is_end_stream(),
        }
    }
}

impl<B> fmt::Debug for AssetBody<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetBody::Full(Some(bytes)) => f
                .debug_tuple("Full")
                .field(&format!("{} bytes", bytes.len()))
                .finish(),
            AssetBody::Full(None) => f.debug_tuple("Full").field(&"consumed").finish(),
            AssetBody::Inner(_) => f.debug_tuple("Inner").field(&"...").finish(),
        }
    }
}
