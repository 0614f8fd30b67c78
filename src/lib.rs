//! # crates-public
//!
//! The public, unauthenticated read side of crates.page: profiles, crate
//! pages and a home page, served from the backend's `/v1/public` API.
//!
//! ## The contract
//!
//! nginx handles TLS, rate limiting, slow clients and body-size limits. This
//! service does three things on top:
//!
//! - **Classify** every request by username and user-agent, and answer
//!   probes for `/wp-admin`, `/.env` and friends with the same 404 a missing
//!   user gets, without touching the backend.
//! - **Fetch** from the backend through one typed [`ApiClient`](client::ApiClient)
//!   with a fixed timeout and no retries.
//! - **Degrade** instead of failing: only a page's primary resource is
//!   required. Everything else falls back to empty.
//!
//! ## Running
//!
//! ```rust,no_run
//! use crates_public::{app, client::ApiClient, Config, Server};
//! use clap::Parser;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), crates_public::Error> {
//!     let config = Config::parse();
//!     let client = ApiClient::new(&config.client_config())?;
//!
//!     Server::bind(config.listen_addr())
//!         .serve(app::router(app::App::new(client)))
//!         .await
//! }
//! ```

mod api;
mod error;
mod handler;
mod health;
mod pages;
mod request;
mod response;
mod router;
mod server;

pub mod app;
pub mod classify;
pub mod client;
pub mod config;
pub mod middleware;
pub mod paging;
pub mod views;

pub use app::App;
pub use classify::Verdict;
pub use config::Config;
pub use error::{ApiError, Error};
pub use handler::Handler;
pub use request::Request;
pub use response::{ContentType, IntoResponse, Json, Response};
pub use router::Router;
pub use server::Server;
