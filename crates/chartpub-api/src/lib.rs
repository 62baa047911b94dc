//! # chartpub-api — HTTP Front End
//!
//! Exposes the publisher over HTTP with Axum.
//!
//! ## Routes
//!
//! - `GET /health`: liveness probe.
//! - `GET /api/repositories`: configured repositories as JSON.
//! - `GET /{repo}/index.yaml`: the repository's current index.
//! - `POST /api/{repo}/charts/{filename}`: publish the request body as a
//!   chart archive; `201 {"saved": true}` on success.
//!
//! ## Crate Policy
//!
//! - No publishing logic in route handlers; they delegate to
//!   `chartpub_publisher::Publisher`.
//! - All errors map to structured HTTP responses via `AppError`.

pub mod error;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use routes::router;
pub use state::AppState;
