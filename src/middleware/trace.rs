//! Per-request log line.
//!
//! One event per request, written after the response is built. Volume follows
//! the admission decision: bots and attacks go to `debug`, blocked suspicious
//! requests to `warn`, everything else to `info`. Route misses are never
//! reported as blocked, whatever their first segment looked like.

use std::time::Duration;

use http::{Method, StatusCode};
use tracing::{debug, info, warn};

use super::admission::{Classification, Scope};

/// Which line a request gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line {
    Quiet,
    Blocked,
    Miss,
    Served,
}

fn line_for(classification: &Classification) -> Line {
    if classification.decision.reduce_logging {
        Line::Quiet
    } else if classification.admission().is_blocked() {
        Line::Blocked
    } else if classification.scope == Scope::Unrouted {
        Line::Miss
    } else {
        Line::Served
    }
}

pub(crate) fn record(
    method: &Method,
    path: &str,
    user_agent: &str,
    classification: &Classification,
    status: StatusCode,
    elapsed: Duration,
) {
    let verdict = classification.verdict.as_str();
    let status = status.as_u16();
    let latency_ms = elapsed.as_secs_f64() * 1000.0;

    match line_for(classification) {
        Line::Quiet => {
            let blocked = classification.admission().is_blocked();
            debug!(%method, path, status, verdict, blocked, latency_ms, "request");
        }
        Line::Blocked => {
            warn!(%method, path, user_agent, status, verdict, latency_ms, "request blocked");
        }
        Line::Miss => info!(%method, path, status, verdict, latency_ms, "no route"),
        Line::Served => info!(%method, path, status, verdict, latency_ms, "request"),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const BROWSER: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

    fn routed(username: &str, user_agent: &str) -> Classification {
        let params = HashMap::from([("username".to_owned(), username.to_owned())]);
        Classification::for_route(&params, user_agent, &format!("/{username}"))
    }

    #[test]
    fn malformed_miss_is_not_logged_as_blocked() {
        let c = Classification::for_unrouted("/-x/a/b/c", BROWSER);
        assert_eq!(line_for(&c), Line::Miss);
    }

    #[test]
    fn blocked_suspicious_is_loud() {
        assert_eq!(line_for(&routed("-x", BROWSER)), Line::Blocked);
    }

    #[test]
    fn bots_and_attacks_are_quiet() {
        assert_eq!(line_for(&routed("alice", "curl/8.4.0")), Line::Quiet);
        assert_eq!(line_for(&routed("wp-admin", BROWSER)), Line::Quiet);
        assert_eq!(line_for(&Classification::for_unrouted("/.env/x/y/z", BROWSER)), Line::Quiet);
    }

    #[test]
    fn ordinary_requests_are_served() {
        assert_eq!(line_for(&routed("alice", BROWSER)), Line::Served);
        assert_eq!(line_for(&Classification::for_user_agent("")), Line::Served);
    }
}
