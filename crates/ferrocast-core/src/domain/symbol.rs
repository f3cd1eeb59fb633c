use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_LEN: usize = 15;

/// Upper-cased provider ticker such as `7203.T`, `AAPL`, `^N225` or `USDJPY=X`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Trim, upper-case and check a raw ticker.
    ///
    /// The first character is a letter, a digit or the index marker `^`; the
    /// rest may also use the `.` `-` `=` suffix separators.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let ticker = input.trim().to_ascii_uppercase();
        if ticker.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        let len = ticker.chars().count();
        if len > MAX_LEN {
            return Err(ValidationError::SymbolTooLong { len, max: MAX_LEN });
        }

        if let Some((index, ch)) = ticker
            .chars()
            .enumerate()
            .find(|&(index, ch)| !allowed(index, ch))
        {
            return Err(ValidationError::SymbolInvalidChar { ch, index });
        }

        Ok(Self(ticker))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn allowed(index: usize, ch: char) -> bool {
    match ch {
        c if c.is_ascii_alphanumeric() => true,
        '^' => index == 0,
        '.' | '-' | '=' => index > 0,
        _ => false,
    }
}

impl FromStr for Symbol {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
