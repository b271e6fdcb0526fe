//! Web front end for the clarag demo.
//!
//! - `GET /` renders the comparison page
//! - `POST /run` runs a query from the page's form and re-renders it
//! - `POST /api/query` is the same query as JSON
//! - `GET /health` reports which models are loaded

pub mod cli;
pub mod config;
pub mod error;
pub mod page;
pub mod routes;
pub mod server;
pub mod state;

pub use cli::Cli;
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, init_tracing, start_server};
pub use state::AppState;
