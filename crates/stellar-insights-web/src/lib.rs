//! Stellar Insights web interface
//!
//! Analytics dashboard served over HTTP. A [`DashboardController`] owns the
//! view state and its fetch lifecycle; the axum handlers render that state
//! as HTML, JSON or a WebSocket stream.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod api_client;
pub mod controller;
pub mod error;
pub mod handlers;
pub mod html;
pub mod mock;
pub mod routes;
pub mod server;
pub mod source;
pub mod state;
pub mod view;

// Re-export the main types
pub use api_client::ApiClient;
pub use controller::{DashboardController, FetchTicket};
pub use error::{WebError, WebResult};
pub use server::build_app;
pub use source::AnalyticsSource;
pub use state::AppState;
pub use view::DashboardView;
