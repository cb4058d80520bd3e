//! HTTP server implementation
//!
//! A thin JSON surface over the batch engine: submit a job, poll its
//! progress, collect its report.

pub mod routes;
pub mod server;
pub mod state;


pub use server::HttpServer;
pub use state::AppState;
