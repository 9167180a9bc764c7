use once_cell::sync::Lazy;
use regex::Regex;

static COMPACT_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+)\s*h\s*(\d+)\s*m\s*$").expect("compact duration pattern is valid")
});

const ZERO_DURATION: &str = "0:00";

/// Index of the first field (in declaration order) whose trimmed name contains any keyword,
/// ignoring case.
pub fn find_matching_field<S: AsRef<str>>(fields: &[S], keywords: &[&str]) -> Option<usize> {
    let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
    fields.iter().position(|field| {
        let name = field.as_ref().trim().to_lowercase();
        keywords.iter().any(|keyword| name.contains(keyword.as_str()))
    })
}

/// Parses a float, falling back to 0.0 for blank, unparsable or non-finite text.
pub fn lenient_f64(value: &str) -> f64 {
    optional_f64(value).unwrap_or(0.0)
}

pub(crate) fn optional_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|parsed| parsed.is_finite())
}

pub(crate) fn non_negative_f64(value: &str) -> f64 {
    lenient_f64(value).max(0.0)
}

/// Converts "<h>h <m>m" into "<h>:<mm>". Anything else becomes "0:00".
pub fn format_print_time(value: &str) -> String {
    let Some(captures) = COMPACT_DURATION.captures(value) else {
        return ZERO_DURATION.to_string();
    };
    let hours = &captures[1];
    let minutes = &captures[2];
    format!("{hours}:{minutes:0>2}")
}
