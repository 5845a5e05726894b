use crate::value_objects::transaction::TransactionRecord;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum TransactionLogError {
    NotAnObject { location: String },
    MissingField { location: String, field: &'static str },
    InvalidRecord { location: String, reason: String },
}

impl std::fmt::Display for TransactionLogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionLogError::NotAnObject { location } => {
                write!(f, "{location}: expected a JSON object")
            }
            TransactionLogError::MissingField { location, field } => {
                write!(f, "{location}: missing field `{field}`")
            }
            TransactionLogError::InvalidRecord { location, reason } => {
                write!(f, "{location}: invalid record: {reason}")
            }
        }
    }
}

impl std::error::Error for TransactionLogError {}

/// Transaction batches keyed by an arbitrary label, in insertion order.
/// The key carries no meaning for parsing; only each record's kind does.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionLog {
    entries: Vec<(String, Vec<TransactionRecord>)>,
}

impl TransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends to an existing key or adds a new one at the end.
    pub fn insert(&mut self, key: &str, records: Vec<TransactionRecord>) {
        match self.entries.iter_mut().find(|(existing, _)| existing == key) {
            Some((_, existing)) => existing.extend(records),
            None => self.entries.push((key.to_string(), records)),
        }
    }

    pub fn with(mut self, key: &str, records: Vec<TransactionRecord>) -> Self {
        self.insert(key, records);
        self
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &[TransactionRecord])> {
        self.entries
            .iter()
            .map(|(key, records)| (key.as_str(), records.as_slice()))
    }

    pub fn records(&self) -> impl Iterator<Item = &TransactionRecord> {
        self.entries.iter().flat_map(|(_, records)| records.iter())
    }

    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, records)| records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds a log from `{ "<key>": [ { "kind": ..., ... }, ... ], ... }`,
    /// validating every record against its kind's schema.
    pub fn from_json(value: Value) -> Result<Self, TransactionLogError> {
        let Value::Object(object) = value else {
            return Err(TransactionLogError::NotAnObject {
                location: "transaction log".to_string(),
            });
        };

        let mut log = Self::new();
        for (key, batch) in object {
            let Value::Array(items) = batch else {
                return Err(TransactionLogError::InvalidRecord {
                    location: key,
                    reason: "expected an array of records".to_string(),
                });
            };
            let mut records = Vec::with_capacity(items.len());
            for (idx, item) in items.into_iter().enumerate() {
                let location = format!("{key}[{idx}]");
                records.push(TransactionRecord::from_value_at(item, &location)?);
            }
            log.insert(&key, records);
        }
        Ok(log)
    }
}
