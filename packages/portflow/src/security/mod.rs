//! Secret handling and outbound URL checks.

pub mod credentials;
pub mod url_policy;

pub use credentials::SecretString;
pub use url_policy::{is_local_preview, UrlPolicy, UrlRejected};
