//! Value cleaners for raw CSV cell text
//!
//! Cleaners never fail: text that does not parse after stripping comes back as
//! `Cleaned::Original` so the caller can keep it for review or coerce it away.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::value::CellValue;

/// Symbols removed before numeric parsing: currency marks and the thousands separator
pub const CURRENCY_SYMBOLS: &[char] = &['£', '$', '€', ','];

/// Unit suffixes quoted after a price (pence)
pub const UNIT_SUFFIXES: &[char] = &['p'];

/// Marker used by the brokerage exports for "not applicable"
pub const NOT_APPLICABLE: &str = "n/a";

/// Day-first formats accepted for transaction dates, tried in order.
/// Two-digit years go first: `%Y` would read `25` as the year 25.
const DAY_FIRST_FORMATS: &[&str] = &[
    "%d/%m/%y",
    "%d/%m/%Y",
    "%d-%m-%y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%d-%b-%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
];

/// Outcome of cleaning one raw cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cleaned {
    /// Blank input
    Empty,
    /// Parsed numeric value
    Parsed(Decimal),
    /// Did not parse; the trimmed input, unchanged
    Original(String),
}

impl Cleaned {
    pub fn is_parsed(&self) -> bool {
        matches!(self, Cleaned::Parsed(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cleaned::Empty)
    }

    /// Keep unparsed text as text
    pub fn into_value(self) -> CellValue {
        match self {
            Cleaned::Empty => CellValue::Empty,
            Cleaned::Parsed(n) => CellValue::Number(n),
            Cleaned::Original(s) => CellValue::Text(s),
        }
    }

    /// Numeric coercion: unparsed text becomes empty
    pub fn into_number(self) -> CellValue {
        match self {
            Cleaned::Parsed(n) => CellValue::Number(n),
            _ => CellValue::Empty,
        }
    }
}

/// Strip `symbols` and trailing unit suffixes, then parse as a number.
///
/// Accounting negatives in parentheses, `(12.50)`, parse as `-12.50`.
pub fn clean_currency_like(raw: &str, symbols: &[char]) -> Cleaned {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Cleaned::Empty;
    }

    let stripped: String = trimmed.chars().filter(|c| !symbols.contains(c)).collect();
    let stripped = stripped.trim().trim_end_matches(UNIT_SUFFIXES).trim();

    let (negative, body) = match stripped.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) => (true, inner.trim()),
        None => (false, stripped),
    };

    match parse_decimal(body) {
        Some(n) if negative => Cleaned::Parsed(-n),
        Some(n) => Cleaned::Parsed(n),
        None => Cleaned::Original(trimmed.to_string()),
    }
}

/// Price cleaning with the export's first-row quirk.
///
/// The reference (first) row is quoted with a leading `$`; every later row
/// carries a trailing `p`. Only the marker for the row's position is removed,
/// so `$1.23` on a later row stays text.
pub fn clean_price(raw: &str, is_reference_row: bool) -> Cleaned {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Cleaned::Empty;
    }

    let digits: String = trimmed
        .chars()
        .filter(|c| !matches!(c, '$' | 'p' | '-' | '.' | ','))
        .collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Cleaned::Original(trimmed.to_string());
    }

    let stripped = if is_reference_row {
        trimmed.replace('$', "")
    } else {
        trimmed.replace('p', "")
    };
    let stripped = stripped.replace(',', "");

    match parse_decimal(&stripped) {
        Some(n) => Cleaned::Parsed(n),
        None => Cleaned::Original(trimmed.to_string()),
    }
}

/// Strip `%` and separators, then parse. `12.5%` becomes `12.5`, not `0.125`.
pub fn clean_percentage(raw: &str) -> Cleaned {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Cleaned::Empty;
    }

    let stripped: String = trimmed.chars().filter(|c| !matches!(c, '%' | ',')).collect();
    match parse_decimal(stripped.trim()) {
        Some(n) => Cleaned::Parsed(n),
        None => Cleaned::Original(trimmed.to_string()),
    }
}

/// Parse a day-first date; a trailing time component is ignored
pub fn parse_day_first_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let candidates = [Some(trimmed), trimmed.split_whitespace().next()];
    candidates.iter().flatten().find_map(|candidate| {
        DAY_FIRST_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(candidate, fmt).ok())
    })
}

/// True when the raw cell is exactly the lowercase "not applicable" marker.
///
/// `N/A` and other spellings are ordinary text and go through the column cleaner.
pub fn is_not_applicable(raw: &str) -> bool {
    raw.trim() == NOT_APPLICABLE
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    let s = s.strip_prefix('+').unwrap_or(s);
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_currency_like_strips_symbols() {
        assert_eq!(clean_currency_like("£1,234.56", CURRENCY_SYMBOLS), Cleaned::Parsed(dec("1234.56")));
        assert_eq!(clean_currency_like("-£12.00", CURRENCY_SYMBOLS), Cleaned::Parsed(dec("-12.00")));
        assert_eq!(clean_currency_like("$7", CURRENCY_SYMBOLS), Cleaned::Parsed(dec("7")));
        assert_eq!(clean_currency_like("  98.5p ", CURRENCY_SYMBOLS), Cleaned::Parsed(dec("98.5")));
        assert_eq!(clean_currency_like("(45.10)", CURRENCY_SYMBOLS), Cleaned::Parsed(dec("-45.10")));
    }

    #[test]
    fn test_currency_like_fails_open() {
        assert_eq!(
            clean_currency_like(" Pending ", CURRENCY_SYMBOLS),
            Cleaned::Original("Pending".to_string())
        );
        assert_eq!(clean_currency_like("", CURRENCY_SYMBOLS), Cleaned::Empty);
        assert_eq!(clean_currency_like("   ", CURRENCY_SYMBOLS), Cleaned::Empty);
    }

    #[test]
    fn test_currency_like_respects_symbol_set() {
        assert_eq!(
            clean_currency_like("€5", &['£', ',']),
            Cleaned::Original("€5".to_string())
        );
    }

    #[test]
    fn test_price_reference_row_strips_dollar() {
        assert_eq!(clean_price("$1.23", true), Cleaned::Parsed(dec("1.23")));
    }

    #[test]
    fn test_price_later_rows_strip_pence_suffix() {
        assert_eq!(clean_price("1.23p", false), Cleaned::Parsed(dec("1.23")));
        assert_eq!(clean_price("1,023.5p", false), Cleaned::Parsed(dec("1023.5")));
    }

    #[test]
    fn test_price_wrong_marker_for_position_stays_text() {
        assert_eq!(clean_price("$1.23", false), Cleaned::Original("$1.23".to_string()));
        assert_eq!(clean_price("1.23p", true), Cleaned::Original("1.23p".to_string()));
    }

    #[test]
    fn test_price_non_numeric_passthrough() {
        assert_eq!(clean_price("N/A", false), Cleaned::Original("N/A".to_string()));
        assert_eq!(clean_price("£1.00", true), Cleaned::Original("£1.00".to_string()));
        assert_eq!(clean_price("", false), Cleaned::Empty);
    }

    #[test]
    fn test_percentage() {
        assert_eq!(clean_percentage("-3.25%"), Cleaned::Parsed(dec("-3.25")));
        assert_eq!(clean_percentage("1,200%"), Cleaned::Parsed(dec("1200")));
        assert_eq!(clean_percentage("n/a%"), Cleaned::Original("n/a%".to_string()));
    }

    #[test]
    fn test_coercion_helpers() {
        assert_eq!(Cleaned::Original("x".into()).into_number(), CellValue::Empty);
        assert_eq!(Cleaned::Original("x".into()).into_value(), CellValue::Text("x".into()));
        assert_eq!(Cleaned::Parsed(dec("2")).into_number(), CellValue::Number(dec("2")));
    }

    #[test]
    fn test_day_first_dates() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        assert_eq!(parse_day_first_date("04/03/2025"), Some(expected));
        assert_eq!(parse_day_first_date("04/03/25"), Some(expected));
        assert_eq!(parse_day_first_date("4 Mar 2025"), Some(expected));
        assert_eq!(parse_day_first_date("2025-03-04"), Some(expected));
        assert_eq!(parse_day_first_date("04/03/2025 09:15"), Some(expected));
        assert_eq!(parse_day_first_date("31/02/2025"), None);
        assert_eq!(parse_day_first_date("soon"), None);
        assert_eq!(parse_day_first_date(""), None);
    }

    #[test]
    fn test_not_applicable_marker() {
        assert!(is_not_applicable("n/a"));
        assert!(is_not_applicable(" n/a "));
        assert!(!is_not_applicable("N/A"));
        assert!(!is_not_applicable("N/a"));
        assert!(!is_not_applicable("na"));
    }
}
