//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Direction of a stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockDirection {
    In,
    Out,
}

impl StockDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockDirection::In => "in",
            StockDirection::Out => "out",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "in" => Some(StockDirection::In),
            "out" => Some(StockDirection::Out),
            _ => None,
        }
    }

    /// Direction implied by a signed stock delta
    pub fn from_delta(delta: i64) -> Self {
        if delta > 0 {
            StockDirection::In
        } else {
            StockDirection::Out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_delta() {
        assert_eq!(StockDirection::from_delta(5), StockDirection::In);
        assert_eq!(StockDirection::from_delta(-5), StockDirection::Out);
        assert_eq!(StockDirection::from_delta(0), StockDirection::Out);
    }

    #[test]
    fn test_direction_roundtrip() {
        assert_eq!(StockDirection::from_str("in"), Some(StockDirection::In));
        assert_eq!(StockDirection::from_str("out"), Some(StockDirection::Out));
        assert_eq!(StockDirection::from_str("sideways"), None);
    }
}
