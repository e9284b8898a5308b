//! Currency model

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CurrencyId;

/// A currency the user records transactions in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// Row id; zero until the store assigns one
    pub id: CurrencyId,

    /// ISO-style code such as "LKR" or "USD"
    pub code: String,

    /// Exactly one stored currency should carry this flag
    pub is_default: bool,
}

impl Currency {
    pub fn new(code: impl Into<String>, is_default: bool) -> Self {
        Self {
            id: CurrencyId::default(),
            code: normalize_code(&code.into()),
            is_default,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}

/// Upper-case and trim a user-typed currency code
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Whether `code` looks like a currency code (3 ASCII letters)
pub fn is_valid_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}
