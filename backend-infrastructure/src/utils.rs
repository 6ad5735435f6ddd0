use chrono::{DateTime, SecondsFormat, Utc};

/// Fixed-width RFC 3339 form, so text ordering in SQLite matches time ordering.
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_timestamp(value: &str) -> chrono::ParseResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value).map(|parsed| parsed.with_timezone(&Utc))
}

/// `LIKE` pattern matching `needle` anywhere, with wildcards in the needle escaped by `\`.
pub fn contains_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn timestamps_are_fixed_width() {
        let early = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let later = early + chrono::Duration::microseconds(1_500_000);
        let a = format_timestamp(early);
        let b = format_timestamp(later);
        assert_eq!(a, "2024-01-02T03:04:05.000000Z");
        assert_eq!(a.len(), b.len());
        assert!(a < b);
        assert_eq!(parse_timestamp(&b).unwrap(), later);
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(contains_pattern("TRK"), "%TRK%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
    }
}
