use crate::aggregates::transaction_log::TransactionLogError;
use crate::entities::transaction_table::Timestamped;
use crate::value_objects::direction::Direction;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const CASH_TRANSACTION_KIND: &str = "cash_transaction";
pub const MARKET_TRANSACTION_KIND: &str = "market_transaction";

const CASH_REQUIRED_FIELDS: &[&str] = &["time"];
const MARKET_REQUIRED_FIELDS: &[&str] = &[
    "time",
    "ticker",
    "sequence",
    "direction",
    "shares",
    "price",
    "commission",
];

/// Cash movement recorded by the backtest. Only `time` is interpreted here;
/// everything else is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashTransaction {
    pub time: i64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl CashTransaction {
    pub fn new(time: i64) -> Self {
        Self {
            time,
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, name: &str, value: Value) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }
}

/// A single fill belonging to a position identified by `sequence`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketTransaction {
    pub time: i64,
    pub ticker: String,
    pub sequence: u64,
    pub direction: Direction,
    pub shares: f64,
    pub price: f64,
    pub commission: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MarketTransaction {
    pub fn new(
        time: i64,
        ticker: &str,
        sequence: u64,
        direction: Direction,
        shares: f64,
        price: f64,
        commission: f64,
    ) -> Self {
        Self {
            time,
            ticker: ticker.to_string(),
            sequence,
            direction,
            shares,
            price,
            commission,
            extra: Map::new(),
        }
    }

    pub fn notional(&self) -> f64 {
        self.price * self.shares
    }

    /// Notional less this fill's commission.
    pub fn net_notional(&self) -> f64 {
        self.notional() - self.commission
    }
}

impl Timestamped for CashTransaction {
    fn time(&self) -> i64 {
        self.time
    }
}

impl Timestamped for MarketTransaction {
    fn time(&self) -> i64 {
        self.time
    }
}

/// A raw transaction-log entry, discriminated by its `kind` tag.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionRecord {
    Cash(CashTransaction),
    Market(MarketTransaction),
    Unrecognized { kind: String },
}

impl TransactionRecord {
    pub fn kind(&self) -> &str {
        match self {
            TransactionRecord::Cash(_) => CASH_TRANSACTION_KIND,
            TransactionRecord::Market(_) => MARKET_TRANSACTION_KIND,
            TransactionRecord::Unrecognized { kind } => kind,
        }
    }

    pub fn from_value(value: Value) -> Result<Self, TransactionLogError> {
        Self::from_value_at(value, "record")
    }

    pub(crate) fn from_value_at(value: Value, location: &str) -> Result<Self, TransactionLogError> {
        let Value::Object(mut object) = value else {
            return Err(TransactionLogError::NotAnObject {
                location: location.to_string(),
            });
        };

        let kind = match object.remove("kind") {
            Some(Value::String(kind)) => kind,
            Some(other) => {
                return Err(TransactionLogError::InvalidRecord {
                    location: location.to_string(),
                    reason: format!("kind must be a string, got {other}"),
                })
            }
            None => {
                return Err(TransactionLogError::MissingField {
                    location: location.to_string(),
                    field: "kind",
                })
            }
        };

        if kind == CASH_TRANSACTION_KIND {
            require_fields(&object, CASH_REQUIRED_FIELDS, location)?;
            decode(object, location).map(TransactionRecord::Cash)
        } else if kind == MARKET_TRANSACTION_KIND {
            require_fields(&object, MARKET_REQUIRED_FIELDS, location)?;
            decode(object, location).map(TransactionRecord::Market)
        } else {
            Ok(TransactionRecord::Unrecognized { kind })
        }
    }
}

impl From<CashTransaction> for TransactionRecord {
    fn from(value: CashTransaction) -> Self {
        TransactionRecord::Cash(value)
    }
}

impl From<MarketTransaction> for TransactionRecord {
    fn from(value: MarketTransaction) -> Self {
        TransactionRecord::Market(value)
    }
}

fn require_fields(
    object: &Map<String, Value>,
    fields: &[&'static str],
    location: &str,
) -> Result<(), TransactionLogError> {
    for &field in fields {
        if object.get(field).map_or(true, Value::is_null) {
            return Err(TransactionLogError::MissingField {
                location: location.to_string(),
                field,
            });
        }
    }
    Ok(())
}

fn decode<T: serde::de::DeserializeOwned>(
    object: Map<String, Value>,
    location: &str,
) -> Result<T, TransactionLogError> {
    serde_json::from_value(Value::Object(object)).map_err(|err| {
        TransactionLogError::InvalidRecord {
            location: location.to_string(),
            reason: err.to_string(),
        }
    })
}
