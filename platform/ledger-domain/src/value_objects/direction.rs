use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Side of a market fill. Only an exact `SELL` is a sell; every other value
/// lands on the buy side of a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Direction {
    Buy,
    Sell,
    Other(String),
}

impl Direction {
    pub fn as_str(&self) -> &str {
        match self {
            Direction::Buy => "BUY",
            Direction::Sell => "SELL",
            Direction::Other(raw) => raw,
        }
    }

    pub fn is_sell(&self) -> bool {
        matches!(self, Direction::Sell)
    }
}

impl From<String> for Direction {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "BUY" => Direction::Buy,
            "SELL" => Direction::Sell,
            _ => Direction::Other(raw),
        }
    }
}

impl From<&str> for Direction {
    fn from(raw: &str) -> Self {
        Direction::from(raw.to_string())
    }
}

impl From<Direction> for String {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for Direction {
    type Err = Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(Direction::from(raw))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
