//! Text and value normalizers
//!
//! Pure helpers that turn raw page text into canonical scalar values. None of
//! them fail: anything that cannot be understood comes back as `None` (or an
//! empty string for text).

/// Trims text and collapses every run of whitespace into a single space
///
/// # Examples
///
/// ```
/// use vitrine::extract::normalize_text;
///
/// assert_eq!(normalize_text("  A Light in\n  the   Attic "), "A Light in the Attic");
/// ```
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses a price label into a number
///
/// Only the first run of digits and separators is read, so currency symbols
/// and any trailing text (a second, struck-through amount for instance) are
/// ignored. When both `.` and `,` appear, whichever comes last is the decimal
/// separator and the other is treated as a thousands separator. A lone
/// separator that occurs more than once is a thousands separator and must
/// split the number into groups of three digits; a single one is the decimal
/// point.
///
/// # Examples
///
/// ```
/// use vitrine::extract::parse_price;
///
/// assert_eq!(parse_price("£51.77"), Some(51.77));
/// assert_eq!(parse_price("R$ 1.234,56"), Some(1234.56));
/// assert_eq!(parse_price("£51.77 (was £60.00)"), Some(51.77));
/// assert_eq!(parse_price("free"), None);
/// ```
pub fn parse_price(text: &str) -> Option<f64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let run: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    let cleaned = run.trim_end_matches(['.', ',']);

    let normalized = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) => {
            let (decimal, thousands) = if dot > comma { ('.', ',') } else { (',', '.') };
            cleaned
                .replace(thousands, "")
                .replace(decimal, ".")
        }
        (None, Some(_)) => single_separator(cleaned, ',')?,
        (Some(_), None) => single_separator(cleaned, '.')?,
        (None, None) => cleaned.to_string(),
    };

    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Normalizes a number that only uses one kind of separator
///
/// Returns None for a repeated separator that does not form thousands groups.
fn single_separator(text: &str, separator: char) -> Option<String> {
    if text.matches(separator).count() == 1 {
        return Some(text.replace(separator, "."));
    }

    let mut groups = text.split(separator);
    let leading = groups.next()?;
    let grouped = (1..=3).contains(&leading.len()) && groups.all(|group| group.len() == 3);
    grouped.then(|| text.replace(separator, ""))
}

/// Maps a star-rating class list to an ordinal digit string
///
/// The first token naming a rating (`One` through `Five`, any case) wins.
///
/// # Examples
///
/// ```
/// use vitrine::extract::parse_rating;
///
/// assert_eq!(parse_rating(["star-rating", "Three"]), Some("3".to_string()));
/// assert_eq!(parse_rating(["star-rating"]), None);
/// ```
pub fn parse_rating<'a, I>(classes: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    classes.into_iter().find_map(|class| {
        let digit = match class.to_ascii_lowercase().as_str() {
            "one" => "1",
            "two" => "2",
            "three" => "3",
            "four" => "4",
            "five" => "5",
            _ => return None,
        };
        Some(digit.to_string())
    })
}

/// Cuts a string down to `max_chars` characters, marking the cut with `...`
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let mut truncated: String = text.chars().take(max_chars).collect();
        truncated.push_str("...");
        truncated
    } else {
        text.to_string()
    }
}
