// HTTP routes
pub mod analyze;
pub mod error;
pub mod health;
pub mod portfolios;

pub use analyze::*;
pub use error::*;
pub use health::*;
pub use portfolios::*;
