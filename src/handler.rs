//! Handler trait and type erasure.
//!
//! Routes hold handlers of different concrete types in one table, so each is
//! boxed behind [`ErasedHandler`]. Handlers receive the shared application
//! state alongside the request:
//!
//! ```text
//! async fn profile(app: Arc<App>, req: Request) -> Response { … }
//!        ↓ router.get("/{username}", profile)
//! profile.into_boxed_handler()                 ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(profile))                 ← stored as BoxedHandler<App>
//!        ↓
//! handler.call(Arc::clone(&state), req)        ← one vtable dispatch per request
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A boxed, type-erased future resolving to a [`Response`].
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` because it appears in the return type of the public
/// `Handler` trait's `into_boxed_handler` method.
#[doc(hidden)]
pub trait ErasedHandler<S> {
    fn call(&self, state: Arc<S>, req: Request) -> BoxFuture;
}

/// A type-erased handler shared across concurrent requests.
#[doc(hidden)]
pub type BoxedHandler<S> = Arc<dyn ErasedHandler<S> + Send + Sync + 'static>;

/// Implemented for every valid route handler:
///
/// ```text
/// async fn name(state: Arc<S>, req: Request) -> impl IntoResponse
/// ```
///
/// Sealed; only the blanket impl below satisfies it.
pub trait Handler<S>: private::Sealed<S> + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler<S>;
}

mod private {
    pub trait Sealed<S> {}
}

impl<F, Fut, R, S> private::Sealed<S> for F
where
    F: Fn(Arc<S>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R, S> Handler<S> for F
where
    F: Fn(Arc<S>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
    S: Send + Sync + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler<S> {
        Arc::new(FnHandler(self))
    }
}

/// Bridges a concrete handler `F` to the trait-object world.
struct FnHandler<F>(F);

impl<F, Fut, R, S> ErasedHandler<S> for FnHandler<F>
where
    F: Fn(Arc<S>, Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, state: Arc<S>, req: Request) -> BoxFuture {
        let fut = (self.0)(state, req);
        Box::pin(async move { fut.await.into_response() })
    }
}
