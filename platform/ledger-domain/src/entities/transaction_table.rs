use crate::value_objects::transaction::{CashTransaction, MarketTransaction};
use serde::Serialize;

pub trait Timestamped {
    fn time(&self) -> i64;
}

/// Rows indexed by their `time`, in the order they were recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TransactionTable<T> {
    rows: Vec<T>,
}

pub type CashTable = TransactionTable<CashTransaction>;
pub type MarketTable = TransactionTable<MarketTransaction>;

impl<T> Default for TransactionTable<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<T: Timestamped> TransactionTable<T> {
    pub fn new(rows: Vec<T>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn index(&self) -> impl Iterator<Item = i64> + '_ {
        self.rows.iter().map(Timestamped::time)
    }

    pub fn first_time(&self) -> Option<i64> {
        self.rows.first().map(Timestamped::time)
    }

    pub fn last_time(&self) -> Option<i64> {
        self.rows.last().map(Timestamped::time)
    }

    pub fn push(&mut self, row: T) {
        self.rows.push(row);
    }
}

impl MarketTable {
    pub fn by_sequence(&self, sequence: u64) -> impl Iterator<Item = &MarketTransaction> + '_ {
        self.rows.iter().filter(move |row| row.sequence == sequence)
    }

    pub fn by_ticker<'a>(
        &'a self,
        ticker: &'a str,
    ) -> impl Iterator<Item = &'a MarketTransaction> + 'a {
        self.rows.iter().filter(move |row| row.ticker == ticker)
    }

    pub fn tickers(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for row in &self.rows {
            if !seen.iter().any(|ticker| *ticker == row.ticker) {
                seen.push(row.ticker.clone());
            }
        }
        seen
    }

    /// Distinct sequence ids of `ticker`, in order of first appearance.
    pub fn sequences_for(&self, ticker: &str) -> Vec<u64> {
        let mut seen = Vec::new();
        for row in self.by_ticker(ticker) {
            if !seen.contains(&row.sequence) {
                seen.push(row.sequence);
            }
        }
        seen
    }
}

impl<T: Timestamped> FromIterator<T> for TransactionTable<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
