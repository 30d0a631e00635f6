//! Turning a model's answer into a title and description.

use serde::Deserialize;

use crate::error::AnalysisError;
use crate::text::truncate_chars;

/// Longest title taken from the first line when no `title:` line exists.
pub const FIRST_LINE_TITLE_CHARS: usize = 50;

#[derive(Debug, Deserialize)]
struct TitleAndDescription {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

/// Parse a model answer.
///
/// Strict JSON first, taken from the first `{` to the last `}` so code
/// fences and surrounding prose are ignored. Otherwise the line heuristic.
pub fn parse_response(raw: &str) -> Result<(String, String), AnalysisError> {
    if let Some(parsed) = parse_json(raw) {
        return Ok(parsed);
    }
    parse_lines(raw).ok_or_else(|| {
        AnalysisError::ModelResponseMalformed(truncate_chars(raw.trim(), 100).to_string())
    })
}

fn parse_json(raw: &str) -> Option<(String, String)> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    let parsed: TitleAndDescription = serde_json::from_str(&raw[start..=end]).ok()?;
    let title = parsed.title.trim();
    let description = parsed.description.trim();
    (!title.is_empty() && !description.is_empty())
        .then(|| (title.to_string(), description.to_string()))
}

fn parse_lines(raw: &str) -> Option<(String, String)> {
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|l| l.chars().any(char::is_alphanumeric))
        .collect();
    let first = *lines.first()?;

    let labelled = lines
        .iter()
        .position(|l| l.to_ascii_lowercase().contains("title") && l.contains(':'));
    let (title_index, title) = match labelled {
        Some(i) => (Some(i), after_label(lines[i])),
        None => (None, clean(truncate_chars(first, FIRST_LINE_TITLE_CHARS))),
    };

    let description = lines
        .iter()
        .enumerate()
        .rev()
        .filter(|(i, _)| Some(*i) != title_index)
        .map(|(_, l)| description_text(l))
        .find(|d| !d.is_empty())?;

    // With no labelled line the first line doubles as the title
    if title_index.is_none() && lines.len() < 2 {
        return None;
    }
    if title.is_empty() {
        return None;
    }
    Some((title, description))
}

fn after_label(line: &str) -> String {
    let value = line.split_once(':').map_or(line, |(_, rest)| rest);
    clean(value)
}

fn description_text(line: &str) -> String {
    let cleaned = clean(line);
    match cleaned.split_once(':') {
        Some((label, rest)) if label.trim().eq_ignore_ascii_case("description") => {
            rest.trim().to_string()
        }
        _ => cleaned,
    }
}

fn clean(s: &str) -> String {
    s.replace('"', "")
        .trim()
        .trim_end_matches(',')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json() {
        let (title, description) =
            parse_response(r#"{"title": "Acme App", "description": "A budgeting app."}"#).unwrap();
        assert_eq!(title, "Acme App");
        assert_eq!(description, "A budgeting app.");
    }

    #[test]
    fn test_json_in_code_fence_with_prose() {
        let raw = "Sure! Here you go:\n```json\n{\n  \"title\": \"Brand Refresh\",\n  \"description\": \"New identity for a bakery.\"\n}\n```";
        let (title, description) = parse_response(raw).unwrap();
        assert_eq!(title, "Brand Refresh");
        assert_eq!(description, "New identity for a bakery.");
    }

    #[test]
    fn test_title_line_heuristic() {
        let (title, description) = parse_response("Title: Foo\nA nice app.").unwrap();
        assert_eq!(title, "Foo");
        assert_eq!(description, "A nice app.");
    }

    #[test]
    fn test_broken_json_falls_back_to_lines() {
        let raw = "{\n  \"title\": \"Foo\",\n  \"description\": \"Bar baz\"\n";
        let (title, description) = parse_response(raw).unwrap();
        assert_eq!(title, "Foo");
        assert_eq!(description, "Bar baz");
    }

    #[test]
    fn test_first_line_title_is_capped() {
        let first = "x".repeat(80);
        let raw = format!("{first}\nSecond line describes it.");
        let (title, description) = parse_response(&raw).unwrap();
        assert_eq!(title.chars().count(), FIRST_LINE_TITLE_CHARS);
        assert_eq!(description, "Second line describes it.");
    }

    #[test]
    fn test_json_missing_description_uses_lines() {
        let raw = "{\"title\": \"Only Title\"}";
        assert!(matches!(
            parse_response(raw),
            Err(AnalysisError::ModelResponseMalformed(_))
        ));
    }

    #[test]
    fn test_nothing_usable() {
        assert!(parse_response("").is_err());
        assert!(parse_response("   \n  ").is_err());
        assert!(parse_response("just one line").is_err());
        assert!(parse_response("Title: Lonely").is_err());
    }
}
