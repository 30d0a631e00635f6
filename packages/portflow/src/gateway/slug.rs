//! Share slugs and storage paths.

/// Length of generated slugs.
pub const SLUG_LEN: usize = 8;

const SLUG_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Random slug of [`SLUG_LEN`] characters over `[a-z0-9]`.
pub fn generate_slug() -> String {
    (0..SLUG_LEN)
        .map(|_| SLUG_ALPHABET[fastrand::usize(..SLUG_ALPHABET.len())] as char)
        .collect()
}

/// Lowercase, with anything outside `[a-z0-9.-]` replaced by `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.to_ascii_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Object path `{portfolio_id}/{timestamp_ms}_{sanitized name}`.
pub fn storage_path(portfolio_id: &str, file_name: &str, timestamp_ms: i64) -> String {
    format!(
        "{portfolio_id}/{timestamp_ms}_{}",
        sanitize_file_name(file_name)
    )
}
