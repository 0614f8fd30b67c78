//! Liveness probe.
//!
//! Answers `{"status":"ok"}` whenever the process can serve HTTP at all.
//! Never touches the upstream; a backend outage degrades pages, it does not
//! make this process unhealthy.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::app::App;
use crate::response::Json;
use crate::Request;

pub async fn liveness(_app: Arc<App>, _req: Request) -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
