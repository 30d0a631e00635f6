//! Portfolio store implementations.
//!
//! Available backends:
//! - `SupabaseStore` - hosted tables and object storage (remote)
//! - `LocalStore` - JSON files in a directory (offline)
//! - `MemoryStore` - in-process storage (offline, tests and previews)

pub mod local;
pub mod memory;
pub mod supabase;

pub use local::LocalStore;
pub use memory::MemoryStore;
pub use supabase::SupabaseStore;
