//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup. Static segments win over
//! parameters, so `/api/{username}/crates` and `/{username}/{handle}` coexist.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use http::request::Parts;
use http::Method;
use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::middleware;
use crate::response::Response;

/// The application router.
///
/// Owns the shared state handed to every handler. Build it once at startup
/// and pass it to [`Server::serve`](crate::Server::serve).
pub struct Router<S> {
    routes: HashMap<Method, MatchitRouter<BoxedHandler<S>>>,
    state: Arc<S>,
}

impl<S> Router<S>
where
    S: Send + Sync + 'static,
{
    pub fn with_state(state: S) -> Self {
        Self { routes: HashMap::new(), state: Arc::new(state) }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax. A parameter named `username`
    /// subjects the route to full request classification.
    ///
    /// # Panics
    ///
    /// Panics if `path` conflicts with an existing route. Routes are fixed at
    /// startup, so this surfaces on the first run.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler<S>) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler<S>) -> Self {
        self.on(Method::GET, path, handler)
    }

    pub fn state(&self) -> Arc<S> {
        Arc::clone(&self.state)
    }

    /// Runs one request through the full pipeline: classify, admit, handle, log.
    pub async fn dispatch(&self, parts: Parts, remote_addr: SocketAddr) -> Response {
        middleware::run(self, parts, remote_addr).await
    }

    pub(crate) fn lookup(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(BoxedHandler<S>, HashMap<String, String>)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Request;

    async fn echo(_state: Arc<()>, req: Request) -> Response {
        let username = req.param("username").unwrap_or("-");
        let handle = req.param("handle").unwrap_or("-");
        Response::text(format!("{username}/{handle}"))
    }

    async fn fixed(_state: Arc<()>, _req: Request) -> &'static str {
        "fixed"
    }

    fn router() -> Router<()> {
        Router::with_state(())
            .get("/", fixed)
            .get("/api/{username}/crates", fixed)
            .get("/{username}", echo)
            .get("/{username}/{handle}", echo)
            .get("/{username}/collection/{handle}", echo)
    }

    #[test]
    fn static_segments_beat_parameters() {
        let router = router();
        let (_, params) = router.lookup(&Method::GET, "/api/alice/crates").unwrap();
        assert_eq!(params.get("username").map(String::as_str), Some("alice"));
        assert!(!params.contains_key("handle"));

        let (_, params) = router.lookup(&Method::GET, "/alice/collection/warehouse").unwrap();
        assert_eq!(params.get("handle").map(String::as_str), Some("warehouse"));

        let (_, params) = router.lookup(&Method::GET, "/alice/warehouse").unwrap();
        assert_eq!(params.get("handle").map(String::as_str), Some("warehouse"));
    }

    #[test]
    fn other_methods_and_deep_paths_miss() {
        let router = router();
        assert!(router.lookup(&Method::POST, "/alice").is_none());
        assert!(router.lookup(&Method::GET, "/a/b/c/d").is_none());
    }

    #[tokio::test]
    async fn dispatch_runs_handler() {
        let (parts, ()) = http::Request::builder()
            .uri("/alice/warehouse")
            .header("user-agent", "Mozilla/5.0")
            .body(())
            .unwrap()
            .into_parts();
        let response = router().dispatch(parts, "127.0.0.1:9".parse().unwrap()).await;
        assert_eq!(response.body(), b"alice/warehouse");
    }

    #[test]
    #[should_panic(expected = "invalid route")]
    fn conflicting_routes_panic() {
        let _ = Router::with_state(())
            .get("/{username}", fixed)
            .get("/{user}", fixed);
    }
}
