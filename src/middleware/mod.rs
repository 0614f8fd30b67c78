//! Request pipeline.
//!
//! Every request runs the same four stages, in order:
//!
//! 1. **Classify**: username (from the route) and user-agent become a
//!    [`Classification`](admission::Classification).
//! 2. **Admit**: blocked requests get the uniform 404 right here. No handler
//!    runs and nothing goes upstream.
//! 3. **Handle**: the classification is inserted into the request's
//!    extensions and the route handler runs.
//! 4. **Trace**: one log line, at a level chosen by the classification.
//!
//! Classification is synchronous and does no I/O; the only await point is
//! the handler.

pub mod admission;
mod trace;

use std::net::SocketAddr;
use std::time::Instant;

use http::header::USER_AGENT;
use http::request::Parts;

use crate::request::Request;
use crate::response::Response;
use crate::router::Router;

use admission::{Admission, Classification};

pub(crate) async fn run<S>(router: &Router<S>, parts: Parts, remote_addr: SocketAddr) -> Response
where
    S: Send + Sync + 'static,
{
    let started = Instant::now();
    let method = parts.method.clone();
    let path = parts.uri.path().to_owned();
    let user_agent = parts
        .headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_owned();

    let (classification, response) = match router.lookup(&method, &path) {
        Some((handler, params)) => {
            let classification = Classification::for_route(&params, &user_agent, &path);
            let response = match classification.admission() {
                Admission::Block => Response::not_found(),
                Admission::Continue => {
                    let mut req = Request::new(parts, params, remote_addr);
                    req.extensions_mut().insert(classification);
                    handler.call(router.state(), req).await
                }
            };
            (classification, response)
        }
        None => (Classification::for_unrouted(&path, &user_agent), Response::not_found()),
    };

    trace::record(
        &method,
        &path,
        &user_agent,
        &classification,
        response.status_code(),
        started.elapsed(),
    );
    response
}
