//! Token descriptors and arbitrary-precision amounts

use std::fmt;

use num_bigint::BigUint;
use num_traits::Zero;

use crate::PrimitiveError;

/// Identifier of the native token
const NATIVE_IDENTIFIER: &str = "EGLD";

/// Decimals of the native token
const NATIVE_DECIMALS: u32 = 18;

/// Token descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    /// Ticker or full identifier (e.g. `EGLD`, `USDC-c76f1f`)
    pub identifier: String,
    /// Number of decimals in the denominated form
    pub decimals: u32,
}

impl Token {
    /// Create a token descriptor
    pub fn new(identifier: impl Into<String>, decimals: u32) -> Self {
        Self {
            identifier: identifier.into(),
            decimals,
        }
    }

    /// The chain's native token
    pub fn native() -> Self {
        Self::new(NATIVE_IDENTIFIER, NATIVE_DECIMALS)
    }

    /// Whether this is the native token
    pub fn is_native(&self) -> bool {
        self.identifier == NATIVE_IDENTIFIER
    }
}

impl Default for Token {
    fn default() -> Self {
        Self::native()
    }
}

/// Non-negative amount of a token, stored in base units
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenAmount {
    /// Token the amount is denominated in
    pub token: Token,
    /// Amount in base units
    pub amount: BigUint,
}

impl TokenAmount {
    /// Create an amount from base units
    pub fn new(token: Token, amount: BigUint) -> Self {
        Self { token, amount }
    }

    /// Native token amount from base units
    pub fn native(amount: impl Into<BigUint>) -> Self {
        Self::new(Token::native(), amount.into())
    }

    /// Zero of the given token
    pub fn zero(token: Token) -> Self {
        Self::new(token, BigUint::zero())
    }

    /// Parse a base-unit decimal string such as `"1000000000000000000"`
    pub fn from_base_units_str(token: Token, s: &str) -> Result<Self, PrimitiveError> {
        let amount = s
            .trim()
            .parse::<BigUint>()
            .map_err(|e| PrimitiveError::InvalidAmount(format!("{}: {}", s, e)))?;
        Ok(Self::new(token, amount))
    }

    /// Parse a denominated decimal string such as `"1.5"` into base units
    pub fn from_denominated(token: Token, s: &str) -> Result<Self, PrimitiveError> {
        let s = s.trim();
        let (whole, fraction) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(PrimitiveError::InvalidAmount(s.to_string()));
        }
        if fraction.len() > token.decimals as usize {
            return Err(PrimitiveError::InvalidAmount(format!(
                "{} has more than {} decimals",
                s, token.decimals
            )));
        }
        if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
            return Err(PrimitiveError::InvalidAmount(s.to_string()));
        }

        let padded = format!("{}{:0<width$}", whole, fraction, width = token.decimals as usize);
        let digits = padded.trim_start_matches('0');
        let amount = if digits.is_empty() {
            BigUint::zero()
        } else {
            digits
                .parse::<BigUint>()
                .map_err(|e| PrimitiveError::InvalidAmount(e.to_string()))?
        };
        Ok(Self::new(token, amount))
    }

    /// Format in denominated form, trimming trailing zeros
    pub fn to_denominated(&self) -> String {
        let decimals = self.token.decimals as usize;
        let raw = self.amount.to_str_radix(10);
        if decimals == 0 {
            return raw;
        }
        let padded = format!("{:0>width$}", raw, width = decimals + 1);
        let (whole, fraction) = padded.split_at(padded.len() - decimals);
        let fraction = fraction.trim_end_matches('0');
        if fraction.is_empty() {
            whole.to_string()
        } else {
            format!("{}.{}", whole, fraction)
        }
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.to_denominated(), self.token.identifier)
    }
}
