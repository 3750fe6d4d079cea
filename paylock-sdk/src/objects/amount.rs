//! Custom amounts typed in by the viewer.

use rust_decimal::Decimal;
use std::str::FromStr;

/// A validated, strictly positive custom amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomAmount(Decimal);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Please enter a valid amount.")]
    NotANumber,
    #[error("Please enter a valid amount.")]
    NotPositive,
}

impl CustomAmount {
    /// Validate an amount that is already numeric.
    pub fn new(amount: Decimal) -> Result<Self, AmountError> {
        if amount <= Decimal::ZERO {
            return Err(AmountError::NotPositive);
        }
        Ok(Self(amount.normalize()))
    }

    /// Parse text input. Surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Result<Self, AmountError> {
        let amount = Decimal::from_str(input.trim()).map_err(|_| AmountError::NotANumber)?;
        Self::new(amount)
    }

    pub fn value(self) -> Decimal {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_custom_amount() {
        assert_eq!(
            CustomAmount::parse(" 25.50 ").unwrap().value(),
            Decimal::from_str("25.5").unwrap()
        );
        assert_eq!(CustomAmount::parse("0"), Err(AmountError::NotPositive));
        assert_eq!(CustomAmount::parse("-3"), Err(AmountError::NotPositive));
        assert_eq!(CustomAmount::parse("abc"), Err(AmountError::NotANumber));
        assert_eq!(CustomAmount::parse(""), Err(AmountError::NotANumber));
    }
}
