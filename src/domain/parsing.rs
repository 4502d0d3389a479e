use std::sync::OnceLock;

use regex::Regex;
use url::Url;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn rating_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[1-5](?:[.,]\d)?").unwrap())
}

fn count_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d[\d,]*").unwrap())
}

fn background_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"url\(["']?([^"')]+)["']?\)"#).unwrap())
}

/// Parses a star rating out of text like "4.5", "4,5 stars" or "Rated 4.2".
/// Only values in [1.0, 5.0] are returned.
pub fn parse_rating(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .replace(',', ".");

    let rating: f64 = rating_regex().find(&cleaned)?.as_str().parse().ok()?;

    (1.0..=5.0).contains(&rating).then_some(rating)
}

/// Parses a review count out of text like "(1,234)" or "1 234 reviews".
pub fn parse_review_count(raw: &str) -> Option<u64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '\u{a0}' | '\u{202f}'))
        .collect();

    count_regex()
        .find(&cleaned)?
        .as_str()
        .replace(',', "")
        .parse()
        .ok()
}

pub fn is_valid_website(text: &str) -> bool {
    (text.starts_with("http://") || text.starts_with("https://")) && Url::parse(text).is_ok()
}

pub fn is_valid_image_url(url: &str, denylist: &[String]) -> bool {
    if url.len() < 10 {
        return false;
    }

    let lowered = url.to_lowercase();
    if denylist
        .iter()
        .any(|pattern| lowered.contains(&pattern.to_lowercase()))
    {
        return false;
    }

    url.starts_with("http://") || url.starts_with("https://") || url.starts_with("//")
}

/// Pulls the URL out of an inline `background-image: url(...)` style.
pub fn extract_background_url(style: &str) -> Option<String> {
    background_url_regex()
        .captures(style)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn looks_like_review_date(text: &str) -> bool {
    text.to_lowercase().contains("ago") || MONTHS.iter().any(|month| text.contains(month))
}

pub fn looks_like_rating_label(text: &str) -> bool {
    let lowered = text.to_lowercase();
    lowered.contains("star") || lowered.contains("rating")
}

pub fn looks_like_review_content(text: &str) -> bool {
    text.chars().count() > 10
}

/// Keeps alphanumerics, space, hyphen and underscore, then trims the end.
pub fn safe_file_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .trim_end()
        .to_string()
}
