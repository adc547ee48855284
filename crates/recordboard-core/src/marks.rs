//! Performance mark normalization.
//!
//! Marks arrive as plain numbers ("12.34", "38.5"), `mm:ss` ("4:55.10") or
//! `hh:mm:ss` ("1:02:03"). Times become seconds; field marks keep their
//! native units.

/// Parse a displayed mark into a comparable number.
///
/// Returns `None` for empty or unrecognized input.
pub fn parse_mark_value(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(n) = parse_number(s) {
        return Some(n);
    }

    let parts: Option<Vec<f64>> = s.split(':').map(parse_number).collect();
    match parts?.as_slice() {
        [minutes, seconds] => Some(minutes * 60.0 + seconds),
        [hours, minutes, seconds] => Some(hours * 3600.0 + minutes * 60.0 + seconds),
        _ => None,
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Comparable value of a record: the precomputed value when it parses,
/// otherwise the displayed mark.
pub fn comparable_value(mark_value: &str, mark_display: &str) -> Option<f64> {
    parse_mark_value(mark_value).or_else(|| parse_mark_value(mark_display))
}

/// Render a number of seconds as `ss.xx`, `m:ss.xx` or `h:mm:ss.xx`.
pub fn format_seconds(value: f64) -> String {
    if value < 60.0 {
        return format!("{:.2}", value);
    }
    let whole_minutes = (value / 60.0).floor();
    let seconds = value - whole_minutes * 60.0;
    let minutes = whole_minutes as u64;
    if minutes < 60 {
        format!("{}:{:05.2}", minutes, seconds)
    } else {
        format!("{}:{:02}:{:05.2}", minutes / 60, minutes % 60, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_numbers() {
        assert_eq!(parse_mark_value("12.34"), Some(12.34));
        assert_eq!(parse_mark_value(" 38 "), Some(38.0));
    }

    #[test]
    fn test_parse_times() {
        assert_eq!(parse_mark_value("4:55"), Some(295.0));
        assert_eq!(parse_mark_value("1:02:03"), Some(3723.0));
        let v = parse_mark_value("4:55.10").unwrap();
        assert!((v - 295.1).abs() < 1e-9);
    }

    #[test]
    fn test_parse_absent() {
        assert_eq!(parse_mark_value(""), None);
        assert_eq!(parse_mark_value("   "), None);
        assert_eq!(parse_mark_value("abc"), None);
        assert_eq!(parse_mark_value("DNF"), None);
        assert_eq!(parse_mark_value("1:2:3:4"), None);
        assert_eq!(parse_mark_value("4:"), None);
        assert_eq!(parse_mark_value("inf"), None);
    }

    #[test]
    fn test_comparable_value_prefers_precomputed() {
        assert_eq!(comparable_value("295", "4:56"), Some(295.0));
        assert_eq!(comparable_value("", "4:56"), Some(296.0));
        assert_eq!(comparable_value("n/a", "12.5"), Some(12.5));
        assert_eq!(comparable_value("", ""), None);
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(12.3), "12.30");
        assert_eq!(format_seconds(295.1), "4:55.10");
        assert_eq!(format_seconds(3723.0), "1:02:03.00");
    }
}
