use std::fmt;

/// Money is represented as integer cents to avoid floating-point precision issues.
/// 1 unit = 100 cents, so 50.00 = 5000 cents. The sign never lives here:
/// an entry's kind says whether money came in or went out.
pub type Cents = i64;

/// Sums of many entries are widened so no number of stored amounts can overflow.
pub type TotalCents = i128;

/// Format cents as a two-decimal string.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: impl Into<TotalCents>) -> String {
    let cents: TotalCents = cents.into();
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    let units = abs_cents / 100;
    let remainder = abs_cents % 100;
    format!("{}{}.{:02}", sign, units, remainder)
}

/// Format cents with a leading sign, as shown in the history table.
/// Example: (125050, false) -> "- 1250.50"
pub fn format_signed(cents: Cents, inflow: bool) -> String {
    let sign = if inflow { "+" } else { "-" };
    format!("{} {}", sign, format_cents(cents))
}

/// Parse a decimal string into cents.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "100" -> 10000, ".5" -> 50
///
/// At most two decimal places are accepted; exponents, "inf", "NaN" and
/// trailing garbage are rejected.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseCentsError::Empty);
    }

    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };

    let (units_str, decimal_str) = digits.split_once('.').unwrap_or((digits, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (units_str.is_empty() && decimal_str.is_empty())
        || !all_digits(units_str)
        || !all_digits(decimal_str)
    {
        return Err(ParseCentsError::InvalidFormat);
    }

    // Only digits remain, so a failed parse can only mean overflow.
    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| ParseCentsError::Overflow)?
    };

    let decimal_cents: i64 = match decimal_str.len() {
        0 => 0,
        // Single digit like "5" means 50 cents
        1 => i64::from(decimal_str.as_bytes()[0] - b'0') * 10,
        2 => decimal_str
            .parse()
            .map_err(|_| ParseCentsError::InvalidFormat)?,
        _ => return Err(ParseCentsError::TooManyDecimals),
    };

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(decimal_cents))
        .ok_or(ParseCentsError::Overflow)?;
    Ok(if negative { -cents } else { cents })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    Empty,
    InvalidFormat,
    TooManyDecimals,
    Overflow,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::Empty => write!(f, "empty amount"),
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
            ParseCentsError::TooManyDecimals => write!(f, "more than two decimal places"),
            ParseCentsError::Overflow => write!(f, "amount is too large"),
        }
    }
}

impl std::error::Error for ParseCentsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(500000), "5000.00");
        assert_eq!(format_cents(125050), "1250.50");
        assert_eq!(format_cents(1), "0.01");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(-1250), "-12.50");
        assert_eq!(format_cents(-1), "-0.01");
    }

    #[test]
    fn test_format_cents_wide_totals() {
        let total = TotalCents::from(Cents::MAX) * 4;
        assert_eq!(format_cents(total), "368934881474191032.28");
        assert_eq!(format_cents(-total), "-368934881474191032.28");
    }

    #[test]
    fn test_format_signed() {
        assert_eq!(format_signed(500000, true), "+ 5000.00");
        assert_eq!(format_signed(125050, false), "- 1250.50");
    }

    #[test]
    fn test_parse_cents() {
        assert_eq!(parse_cents("5000"), Ok(500000));
        assert_eq!(parse_cents(" 12.5 "), Ok(1250));
        assert_eq!(parse_cents("12.34"), Ok(1234));
        assert_eq!(parse_cents(".5"), Ok(50));
        assert_eq!(parse_cents("7."), Ok(700));
        assert_eq!(parse_cents("+3"), Ok(300));
        assert_eq!(parse_cents("-3"), Ok(-300));
        assert_eq!(parse_cents("0.10"), Ok(10));
    }

    #[test]
    fn test_parse_cents_invalid() {
        assert_eq!(parse_cents(""), Err(ParseCentsError::Empty));
        assert_eq!(parse_cents("   "), Err(ParseCentsError::Empty));
        assert_eq!(parse_cents("abc"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("12abc"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("1,5"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("12.34.56"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("."), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("-"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("1e3"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("inf"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("NaN"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("100.999"), Err(ParseCentsError::TooManyDecimals));
    }

    #[test]
    fn test_parse_cents_overflow() {
        assert_eq!(
            parse_cents("92233720368547758.08"),
            Err(ParseCentsError::Overflow)
        );
        assert_eq!(
            parse_cents("99999999999999999999999"),
            Err(ParseCentsError::Overflow)
        );
        assert_eq!(parse_cents("92233720368547758.07"), Ok(Cents::MAX));
    }
}
