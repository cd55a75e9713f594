//! Cache keys: ordered tuples of primitives, unique per distinct query
//! parameters.

use std::fmt;

/// One segment of a query key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyPart {
    Text(String),
    Int(i64),
    Bool(bool),
}

impl From<&str> for KeyPart {
    fn from(v: &str) -> Self {
        KeyPart::Text(v.to_string())
    }
}

impl From<String> for KeyPart {
    fn from(v: String) -> Self {
        KeyPart::Text(v)
    }
}

impl From<i64> for KeyPart {
    fn from(v: i64) -> Self {
        KeyPart::Int(v)
    }
}

impl From<u32> for KeyPart {
    fn from(v: u32) -> Self {
        KeyPart::Int(i64::from(v))
    }
}

impl From<bool> for KeyPart {
    fn from(v: bool) -> Self {
        KeyPart::Bool(v)
    }
}

/// Ordered tuple identifying one logical query, e.g.
/// `billing/payment-history/10/0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<KeyPart>);

impl QueryKey {
    /// Starts a key with its scope segment (e.g. `"billing"`).
    pub fn new(scope: &str) -> Self {
        Self(vec![KeyPart::from(scope)])
    }

    /// Appends a segment; parameter order is significant.
    pub fn push(mut self, part: impl Into<KeyPart>) -> Self {
        self.0.push(part.into());
        self
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            match part {
                KeyPart::Text(s) => write!(f, "{s}")?,
                KeyPart::Int(n) => write!(f, "{n}")?,
                KeyPart::Bool(b) => write!(f, "{b}")?,
            }
        }
        Ok(())
    }
}
