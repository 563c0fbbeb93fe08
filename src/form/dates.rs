use chrono::NaiveDate;

/// Suffixes of the three inputs making up a composite date field.
pub const PART_SUFFIXES: [&str; 3] = ["day", "month", "year"];

const ISO_FORMAT: &str = "%Y-%m-%d";

/// State of a composite date field after normalisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput {
    Blank,
    Invalid,
    Valid(NaiveDate),
}

impl DateInput {
    pub fn valid(self) -> Option<NaiveDate> {
        match self {
            DateInput::Valid(date) => Some(date),
            _ => None,
        }
    }
}

/// Combines day/month/year inputs into a zero-padded `YYYY-MM-DD` string.
///
/// Only shape is checked here; calendar validity is judged when the value is
/// parsed, so `31/2/2024` still yields `2024-02-31`.
pub fn parts_to_iso(day: &str, month: &str, year: &str) -> Option<String> {
    let (day, month, year) = (day.trim(), month.trim(), year.trim());
    let numeric = |value: &str, max_len: usize| {
        !value.is_empty() && value.len() <= max_len && value.chars().all(|c| c.is_ascii_digit())
    };
    if !numeric(day, 2) || !numeric(month, 2) || !numeric(year, 4) || year.len() != 4 {
        return None;
    }
    Some(format!("{}-{:0>2}-{:0>2}", year, month, day))
}

pub fn parse_iso(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ISO_FORMAT).ok()
}

/// Formats a date the way it appears in transcripts, e.g. `11 April 2024`.
pub fn format_long(date: NaiveDate) -> String {
    date.format("%-d %B %Y").to_string()
}

/// Formats a stored ISO value, falling back to the raw text.
pub fn format_iso_long(value: &str) -> String {
    parse_iso(value)
        .map(format_long)
        .unwrap_or_else(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parts_are_zero_padded() {
        assert_eq!(parts_to_iso("1", "4", "2024").as_deref(), Some("2024-04-01"));
        assert_eq!(parts_to_iso(" 11 ", "12", "2024").as_deref(), Some("2024-12-11"));
    }

    #[test]
    fn malformed_parts_are_rejected() {
        assert_eq!(parts_to_iso("", "4", "2024"), None);
        assert_eq!(parts_to_iso("1", "April", "2024"), None);
        assert_eq!(parts_to_iso("1", "4", "24"), None);
        assert_eq!(parts_to_iso("123", "4", "2024"), None);
    }

    #[test]
    fn long_format_has_no_leading_zero() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        assert_eq!(format_long(date), "1 April 2024");
        assert_eq!(format_iso_long("2024-04-11"), "11 April 2024");
        assert_eq!(format_iso_long("not a date"), "not a date");
    }
}
