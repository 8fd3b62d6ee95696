use std::fmt;

use serde::{Deserialize, Serialize};

/// Money is represented as integer cents to avoid floating-point precision
/// issues. 1 unit = 100 cents, so ₹50.00 = 5000 cents.
pub type Cents = i64;

/// Static conversion rate, INR to USD.
const INR_TO_USD: f64 = 0.012;

/// Static conversion rate, USD to INR.
const USD_TO_INR: f64 = 83.12;

/// Format cents as a human-readable amount string.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Parse a decimal string into cents.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "100" -> 10000
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let negative = input.starts_with('-');
    let input = input.trim_start_matches('-');

    let (units_str, decimal_str) = match input.split_once('.') {
        None => (input, ""),
        Some((units, decimal)) => {
            if decimal.contains('.') {
                return Err(ParseCentsError::InvalidFormat);
            }
            (units, decimal)
        }
    };

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str
            .parse()
            .map_err(|_| ParseCentsError::InvalidFormat)?
    };

    // Pad or truncate the decimal part to 2 digits
    let decimal_cents: i64 = match decimal_str.len() {
        0 => 0,
        1 => {
            decimal_str
                .parse::<i64>()
                .map_err(|_| ParseCentsError::InvalidFormat)?
                * 10
        }
        _ => decimal_str
            .get(..2)
            .ok_or(ParseCentsError::InvalidFormat)?
            .parse()
            .map_err(|_| ParseCentsError::InvalidFormat)?,
    };

    let cents = units * 100 + decimal_cents;
    Ok(if negative { -cents } else { cents })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    InvalidFormat,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
        }
    }
}

impl std::error::Error for ParseCentsError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Inr,
    Usd,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Inr => "INR",
            Currency::Usd => "USD",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "INR" => Some(Currency::Inr),
            "USD" => Some(Currency::Usd),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Convert an amount between INR and USD using the static rates.
/// Same-currency conversion is the identity. The rates are fixed constants,
/// not live quotes; the result is rounded to the nearest cent.
pub fn convert(amount_cents: Cents, from: Currency, to: Currency) -> Cents {
    let rate = match (from, to) {
        (Currency::Inr, Currency::Usd) => INR_TO_USD,
        (Currency::Usd, Currency::Inr) => USD_TO_INR,
        _ => return amount_cents,
    };
    (amount_cents as f64 * rate).round() as Cents
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(5000), "50.00");
        assert_eq!(format_cents(1234), "12.34");
        assert_eq!(format_cents(1), "0.01");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(-5000), "-50.00");
        assert_eq!(format_cents(-1), "-0.01");
    }

    #[test]
    fn test_parse_cents() {
        assert_eq!(parse_cents("50.00"), Ok(5000));
        assert_eq!(parse_cents("50"), Ok(5000));
        assert_eq!(parse_cents("12.34"), Ok(1234));
        assert_eq!(parse_cents("12.5"), Ok(1250));
        assert_eq!(parse_cents("0.01"), Ok(1));
        assert_eq!(parse_cents(".50"), Ok(50));
        assert_eq!(parse_cents("-50.00"), Ok(-5000));
        assert_eq!(parse_cents("100.999"), Ok(10099)); // Truncates
    }

    #[test]
    fn test_parse_cents_invalid() {
        assert!(parse_cents("abc").is_err());
        assert!(parse_cents("12.34.56").is_err());
    }

    #[test]
    fn test_parse_cents_non_ascii_decimal_is_rejected() {
        // Multi-byte characters in the decimal part must not panic the parser
        assert!(parse_cents("1.₹₹").is_err());
        assert!(parse_cents("1.₹").is_err());
        assert!(parse_cents("1.5€").is_err());
        assert!(parse_cents("₹50").is_err());
    }

    #[test]
    fn test_currency_roundtrip() {
        for c in [Currency::Inr, Currency::Usd] {
            assert_eq!(Currency::from_str(c.as_str()), Some(c));
        }
        assert_eq!(Currency::from_str("usd"), Some(Currency::Usd));
        assert_eq!(Currency::from_str("GBP"), None);
    }

    #[test]
    fn test_convert_inr_to_usd() {
        // 100.00 INR -> 1.20 USD
        assert_eq!(convert(10000, Currency::Inr, Currency::Usd), 120);
    }

    #[test]
    fn test_convert_usd_to_inr() {
        // 100.00 USD -> 8312.00 INR
        assert_eq!(convert(10000, Currency::Usd, Currency::Inr), 831200);
    }

    #[test]
    fn test_convert_same_currency_is_identity() {
        assert_eq!(convert(5000, Currency::Inr, Currency::Inr), 5000);
        assert_eq!(convert(5000, Currency::Usd, Currency::Usd), 5000);
    }
}
