//! Input checks applied before user actions are sent to the backend.

use crate::error::{ValidationError, ValidationResult};

const MAX_SYMBOL_LEN: usize = 15;

/// Normalize and validate a ticker symbol.
///
/// Accepts letters, digits and `.^=-` (index and currency-pair forms such as
/// `^GSPC`, `BTC-USD`, `EURUSD=X`). Returns the upper-cased symbol.
pub fn validate_symbol(symbol: &str) -> ValidationResult<String> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(ValidationError::EmptySymbol);
    }
    if symbol.chars().count() > MAX_SYMBOL_LEN {
        return Err(ValidationError::SymbolTooLong(symbol.to_string()));
    }
    if let Some(c) = symbol
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '^' | '=' | '-')))
    {
        return Err(ValidationError::InvalidSymbolChar(c));
    }
    Ok(symbol.to_ascii_uppercase())
}

/// Trade and sale quantities must be positive.
pub fn validate_quantity(quantity: i64) -> ValidationResult<u32> {
    if quantity <= 0 {
        return Err(ValidationError::NonPositiveQuantity);
    }
    u32::try_from(quantity).map_err(|_| ValidationError::QuantityTooLarge(quantity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_normalized() {
        assert_eq!(validate_symbol(" aapl ").unwrap(), "AAPL");
        assert_eq!(validate_symbol("^gspc").unwrap(), "^GSPC");
        assert_eq!(validate_symbol("btc-usd").unwrap(), "BTC-USD");
    }

    #[test]
    fn test_symbol_rejected() {
        assert_eq!(validate_symbol("   "), Err(ValidationError::EmptySymbol));
        assert_eq!(
            validate_symbol("AAPL;DROP"),
            Err(ValidationError::InvalidSymbolChar(';'))
        );
        assert!(matches!(
            validate_symbol("ABCDEFGHIJKLMNOP"),
            Err(ValidationError::SymbolTooLong(_))
        ));
    }

    #[test]
    fn test_quantity() {
        assert_eq!(validate_quantity(3), Ok(3));
        assert_eq!(validate_quantity(0), Err(ValidationError::NonPositiveQuantity));
        assert_eq!(validate_quantity(-2), Err(ValidationError::NonPositiveQuantity));
        assert_eq!(validate_quantity(i64::from(u32::MAX)), Ok(u32::MAX));
        assert_eq!(
            validate_quantity(i64::from(u32::MAX) + 1),
            Err(ValidationError::QuantityTooLarge(4_294_967_296))
        );
    }
}
