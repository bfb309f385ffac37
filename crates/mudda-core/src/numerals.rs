//! Devanagari (०–९) ↔ ASCII (0–9) digit transliteration.
//!
//! Amounts and dates may be typed in either numeral system; all arithmetic
//! runs on ASCII-digit `Decimal` values and only the display layer converts
//! back to local digits.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::MuddaError;
use crate::types::{round2, Money};
use crate::MuddaResult;

const LOCAL_DIGITS: [char; 10] = ['०', '१', '२', '३', '४', '५', '६', '७', '८', '९'];

fn local_digit_value(ch: char) -> Option<usize> {
    LOCAL_DIGITS.iter().position(|d| *d == ch)
}

/// Replace every ASCII digit with its Devanagari glyph.
pub fn to_local_digits(ascii: &str) -> String {
    ascii
        .chars()
        .map(|ch| match ch.to_digit(10) {
            Some(d) if ch.is_ascii_digit() => LOCAL_DIGITS[d as usize],
            _ => ch,
        })
        .collect()
}

/// Replace every Devanagari digit with its ASCII counterpart.
pub fn to_ascii_digits(local: &str) -> String {
    local
        .chars()
        .map(|ch| match local_digit_value(ch) {
            Some(d) => char::from(b'0' + d as u8),
            None => ch,
        })
        .collect()
}

/// Parse a user-typed amount in either numeral system.
///
/// Grouping commas, spaces and a leading `Rs.` are ignored. An empty field
/// is zero, matching how blank prepaid amounts were always accepted.
pub fn parse_local_decimal(field: &str, raw: &str) -> MuddaResult<Decimal> {
    let ascii = to_ascii_digits(raw.trim());
    let trimmed = ascii
        .strip_prefix("Rs.")
        .or_else(|| ascii.strip_prefix("रु."))
        .unwrap_or(&ascii);
    let cleaned: String = trimmed
        .chars()
        .filter(|ch| *ch != ',' && !ch.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Ok(round2(Decimal::ZERO));
    }

    if !cleaned
        .chars()
        .enumerate()
        .all(|(i, ch)| ch.is_ascii_digit() || ch == '.' || (i == 0 && ch == '-'))
    {
        return Err(MuddaError::InvalidInput {
            field: field.to_string(),
            reason: format!("'{raw}' is not a number"),
        });
    }

    Decimal::from_str(&cleaned).map_err(|e| MuddaError::InvalidInput {
        field: field.to_string(),
        reason: format!("'{raw}' is not a number: {e}"),
    })
}

/// Amount rounded to paisa and written in Devanagari digits.
pub fn format_local_money(amount: Money) -> String {
    to_local_digits(&round2(amount).to_string())
}

/// Case numbers keep their letters; only the digits are localized.
pub fn localize_case_number(case_number: &str) -> String {
    to_local_digits(case_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_to_local_digits() {
        assert_eq!(to_local_digits("2080-01-15"), "२०८०-०१-१५");
        assert_eq!(to_local_digits("1100.50"), "११००.५०");
    }

    #[test]
    fn test_to_ascii_digits() {
        assert_eq!(to_ascii_digits("२०८१-०१-०१"), "2081-01-01");
        assert_eq!(to_ascii_digits("१२३.४५"), "123.45");
    }

    #[test]
    fn test_other_characters_pass_through() {
        assert_eq!(to_local_digits("MU12ab/x"), "MU१२ab/x");
        assert_eq!(to_ascii_digits("मुद्दा५६७"), "मुद्दा567");
        // Non-ASCII digits from other scripts are left alone
        assert_eq!(to_ascii_digits("٣"), "٣");
    }

    #[test]
    fn test_mixed_input_normalises() {
        assert_eq!(to_ascii_digits("१2३4"), "1234");
        assert_eq!(to_local_digits("१2३4"), "१२३४");
    }

    #[test]
    fn test_parse_local_decimal() {
        assert_eq!(parse_local_decimal("principal_amount", "१,००,०००.००").unwrap(), dec!(100000.00));
        assert_eq!(parse_local_decimal("principal_amount", "Rs. 2500.5").unwrap(), dec!(2500.5));
        assert_eq!(parse_local_decimal("interest_rate", "१०").unwrap(), dec!(10));
    }

    #[test]
    fn test_parse_local_decimal_empty_is_zero() {
        assert_eq!(parse_local_decimal("prepaid_amount", "  ").unwrap(), dec!(0.00));
    }

    #[test]
    fn test_parse_local_decimal_rejects_text() {
        let err = parse_local_decimal("principal_amount", "एक लाख").unwrap_err();
        assert_eq!(err.field(), Some("principal_amount"));
        assert!(parse_local_decimal("principal_amount", "1.2.3").is_err());
    }

    #[test]
    fn test_format_local_money() {
        assert_eq!(format_local_money(dec!(1100)), "११००.००");
        assert_eq!(format_local_money(dec!(0.125)), "०.१२");
    }

    #[test]
    fn test_localize_case_number() {
        assert_eq!(localize_case_number("MU1234"), "MU१२३४");
        assert_eq!(localize_case_number("078-CP-0042"), "०७८-CP-००४२");
    }

    proptest! {
        #[test]
        fn prop_ascii_round_trip(s in "[0-9.]{0,32}") {
            prop_assert_eq!(to_ascii_digits(&to_local_digits(&s)), s);
        }

        #[test]
        fn prop_local_round_trip(s in "[०-९.]{0,32}") {
            prop_assert_eq!(to_local_digits(&to_ascii_digits(&s)), s);
        }
    }
}
