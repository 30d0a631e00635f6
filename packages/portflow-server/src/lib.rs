// Portflow - HTTP service
//
// Serves the remote analysis endpoint used by portflow clients, plus
// publish/fetch endpoints for portfolios.

pub mod config;
pub mod server;

pub use config::*;
