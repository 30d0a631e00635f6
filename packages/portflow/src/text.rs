//! String helpers shared by the extractor and the generator.

/// Turn a slug, file stem or identifier into title case.
///
/// `-` and `_` become spaces, camelCase and `ACRONYMWord` boundaries are
/// split, whitespace is collapsed and each word is capitalized (first
/// character upper, the rest lower). Applying it twice changes nothing.
///
/// ```rust
/// use portflow::text::humanize;
///
/// assert_eq!(humanize("UX_Research_Notes"), "Ux Research Notes");
/// assert_eq!(humanize("myPortfolio-site"), "My Portfolio Site");
/// ```
pub fn humanize(s: &str) -> String {
    let spaced = split_case_boundaries(&s.replace(['-', '_'], " "));
    spaced
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Insert a space at lower/digit→upper boundaries and before the last
/// capital of an acronym that is followed by a lowercase letter.
///
/// Only capitals with a lowercase form count, so letters like `ϒ` or `ℕ`
/// never start a new word.
fn split_case_boundaries(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 8);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && has_lower_form(c) {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase()
                || prev.is_ascii_digit()
                || (has_lower_form(prev) && next_is_lower)
            {
                out.push(' ');
            }
        }
        out.push(c);
    }
    out
}

fn has_lower_form(c: char) -> bool {
    c.is_uppercase() && c.to_lowercase().ne(std::iter::once(c))
}

/// Upper-case the first character and lower-case the rest. A first
/// character whose capital is several characters (`ß` → `SS`) is kept.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut upper = first.to_uppercase();
    let head = match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => first,
    };
    std::iter::once(head)
        .chain(chars.flat_map(char::to_lowercase))
        .collect()
}

/// The first `max` characters of `s` (never splits a character).
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Replace every run of whitespace with one space and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercase word tokens of `s`, split on punctuation and case boundaries.
pub fn tokens(s: &str) -> Vec<String> {
    split_case_boundaries(s)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Whether any keyword occurs in `tokens`.
///
/// Keywords of two characters or fewer (`cv`, `ui`, `3d`) must equal a
/// token; longer ones match a token prefix (`screen` matches `screenshots`).
pub fn matches_vocabulary(tokens: &[String], keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| {
        tokens.iter().any(|t| {
            if kw.len() <= 2 {
                t == kw
            } else {
                t.starts_with(kw)
            }
        })
    })
}

/// File name without its last extension.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() && !name[idx + 1..].contains('/') => &name[..idx],
        _ => name,
    }
}

/// Lowercased last extension of a file name.
pub fn extension(name: &str) -> Option<String> {
    let stem = strip_extension(name);
    (stem.len() < name.len()).then(|| name[stem.len() + 1..].to_ascii_lowercase())
}

/// Human readable size, e.g. `1.5 KB`. Zero is reported as unknown.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "Unknown size".to_string();
    }
    let mut value = bytes as f64;
    let mut exp = 0;
    while value >= 1024.0 && exp < UNITS.len() - 1 {
        value /= 1024.0;
        exp += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[exp])
}

/// Short phrase describing the kind of project the notes talk about.
pub fn project_context(notes: Option<&str>) -> &'static str {
    const CONTEXTS: &[(&[&str], &str)] = &[
        (&["web", "website"], "web development project"),
        (&["app", "mobile"], "application development"),
        (&["brand", "logo"], "branding project"),
        (&["ui", "interface"], "interface design"),
        (&["graphic", "design"], "design project"),
    ];

    let Some(notes) = notes else {
        return "creative project";
    };
    let words = tokens(notes);
    CONTEXTS
        .iter()
        .find(|(keywords, _)| matches_vocabulary(&words, keywords))
        .map(|(_, phrase)| *phrase)
        .unwrap_or("creative project")
}
