//! Decimal conversion between human-readable token amounts and base units.
//!
//! The native coin and the ERC-20 tokens both default to 18 decimals.

use alloy_primitives::U256;

pub const TOKI_DECIMALS: u8 = 18;

#[derive(Debug, thiserror::Error)]
pub enum UnitsError {
    #[error("invalid decimal amount \"{0}\"")]
    InvalidAmount(String),

    #[error("amount \"{0}\" has more than {1} fractional digits")]
    TooManyDecimals(String, u8),

    #[error("amount \"{0}\" overflows")]
    Overflow(String),
}

/// Parses a decimal string (e.g. `"1.5"`) into base units.
pub fn parse_units(value: &str, decimals: u8) -> Result<U256, UnitsError> {
    let invalid = || UnitsError::InvalidAmount(value.to_string());

    let mut parts = value.splitn(2, '.');
    let whole = parts.next().ok_or_else(invalid)?;
    let frac = parts.next().unwrap_or("");

    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if frac.len() > decimals as usize {
        return Err(UnitsError::TooManyDecimals(value.to_string(), decimals));
    }

    let scale = U256::from(10u64).pow(U256::from(decimals as u64));
    let whole_units = if whole.is_empty() {
        U256::ZERO
    } else {
        let w: U256 = whole
            .parse()
            .map_err(|_| UnitsError::Overflow(value.to_string()))?;
        w.checked_mul(scale)
            .ok_or_else(|| UnitsError::Overflow(value.to_string()))?
    };

    let frac_units = if frac.is_empty() {
        U256::ZERO
    } else {
        let f: U256 = frac
            .parse()
            .map_err(|_| UnitsError::Overflow(value.to_string()))?;
        f * U256::from(10u64).pow(U256::from((decimals as usize - frac.len()) as u64))
    };

    whole_units
        .checked_add(frac_units)
        .ok_or_else(|| UnitsError::Overflow(value.to_string()))
}

/// Parses a TOKI amount (18 decimals).
pub fn parse_toki(value: &str) -> Result<U256, UnitsError> {
    parse_units(value, TOKI_DECIMALS)
}

/// Formats base units back into a decimal string, trimming trailing zeros.
pub fn format_units(amount: U256, decimals: u8) -> String {
    let scale = U256::from(10u64).pow(U256::from(decimals as u64));
    let whole = amount / scale;
    let frac = amount % scale;
    if frac.is_zero() {
        return whole.to_string();
    }
    let frac = format!("{frac:0>width$}", width = decimals as usize);
    format!("{whole}.{}", frac.trim_end_matches('0'))
}

/// Formats a TOKI amount (18 decimals).
pub fn format_toki(amount: U256) -> String {
    format_units(amount, TOKI_DECIMALS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_amounts() {
        assert_eq!(
            parse_toki("1").unwrap(),
            U256::from(10u64).pow(U256::from(18u64))
        );
        assert_eq!(parse_toki("0").unwrap(), U256::ZERO);
    }

    #[test]
    fn parses_fractional_amounts() {
        let half = U256::from(5u64) * U256::from(10u64).pow(U256::from(17u64));
        assert_eq!(parse_toki("0.5").unwrap(), half);
        assert_eq!(parse_toki(".5").unwrap(), half);
        assert_eq!(parse_units("1.25", 2).unwrap(), U256::from(125u64));
    }

    #[test]
    fn rejects_malformed_amounts() {
        assert!(parse_toki("").is_err());
        assert!(parse_toki(".").is_err());
        assert!(parse_toki("1.2.3").is_err());
        assert!(parse_toki("-1").is_err());
        assert!(parse_toki("1e18").is_err());
    }

    #[test]
    fn rejects_excess_precision() {
        assert!(matches!(
            parse_units("0.123", 2),
            Err(UnitsError::TooManyDecimals(_, 2))
        ));
    }

    #[test]
    fn formats_and_trims() {
        assert_eq!(format_toki(parse_toki("1").unwrap()), "1");
        assert_eq!(format_toki(parse_toki("1.5").unwrap()), "1.5");
        assert_eq!(format_toki(parse_toki("0.000000000000000001").unwrap()), "0.000000000000000001");
        assert_eq!(format_units(U256::from(125u64), 2), "1.25");
    }

    #[test]
    fn parse_format_round_trip() {
        for value in ["1", "100000000", "0.25", "42.000000000000000001"] {
            let units = parse_toki(value).unwrap();
            assert_eq!(format_toki(units), *value);
        }
    }
}
