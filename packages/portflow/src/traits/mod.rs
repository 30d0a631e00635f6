//! Seams where applications plug in a language model or a storage backend.

pub mod model;
pub mod store;

pub use model::{LanguageModel, ModelRequest};
pub use store::PortfolioStore;
