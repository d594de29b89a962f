use regex::Regex;

use crate::app::infrastructure::error::Result;

/// Normalize raw search input the way the search box compares it.
pub fn normalize_query(raw: &str) -> String {
    raw.to_lowercase()
}

/// Build a case-insensitive matcher for a literal search term.
///
/// Pattern metacharacters in `term` are escaped, so `a(b` or `[x]` match
/// themselves. Case folding is Unicode-aware (`é` matches `É`).
pub fn literal_matcher(term: &str) -> Result<Regex> {
    let pattern = format!("(?i){}", regex::escape(term));
    Ok(Regex::new(&pattern)?)
}

/// Byte ranges of every non-overlapping, non-empty match in `text`.
pub fn match_ranges(text: &str, matcher: &Regex) -> Vec<(usize, usize)> {
    matcher
        .find_iter(text)
        .filter(|m| m.start() < m.end())
        .map(|m| (m.start(), m.end()))
        .collect()
}

/// Turn heading text into an id fragment: lowercase ASCII alphanumerics
/// separated by single dashes.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut dash = false;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if dash && !slug.is_empty() {
                slug.push('-');
            }
            dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            dash = true;
        }
    }
    slug
}

/// Split a fenced-code info string into its language token.
pub fn code_language(info: &str) -> Option<&str> {
    info.split(|c: char| c.is_whitespace() || c == ',' || c == '{')
        .next()
        .filter(|lang| !lang.is_empty())
}
