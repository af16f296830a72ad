//! Raw SQL default values
//!
//! Defaults are kept in their dialect-native representation: a bareword
//! sentinel like `CURRENT_TIMESTAMP` stays a keyword, numbers stay numbers,
//! strings stay unquoted text. Quoting is the column renderer's job.

use serde::{Deserialize, Serialize};

/// A raw default value as declared or as observed in the database
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub enum SqlValue {
    /// An explicit `DEFAULT NULL`
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Plain text; rendered quoted unless already quoted
    Text(String),
    /// Bareword sentinel rendered verbatim (e.g. `CURRENT_TIMESTAMP`)
    Keyword(String),
}

impl SqlValue {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn keyword(s: impl Into<String>) -> Self {
        Self::Keyword(s.into())
    }

    /// Canonical text form, used both for equality and for bare rendering.
    ///
    /// Numeric values collapse to their shortest decimal form so that a
    /// declared `255` and an observed `"255"` compare equal.
    pub fn canonical(&self) -> String {
        match self {
            Self::Null => "NULL".to_string(),
            Self::Int(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Bool(v) => if *v { "1" } else { "0" }.to_string(),
            Self::Text(s) => {
                // Numeric-looking text compares by value, not by spelling.
                if let Ok(v) = s.parse::<i64>() {
                    v.to_string()
                } else if let Ok(v) = s.parse::<f64>() {
                    v.to_string()
                } else {
                    s.clone()
                }
            }
            Self::Keyword(k) => k.clone(),
        }
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }
}

impl PartialEq for SqlValue {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}
