use crate::aggregates::transaction_log::TransactionLog;
use crate::entities::transaction_table::{CashTable, MarketTable};
use crate::value_objects::transaction::TransactionRecord;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PartitionCounts {
    pub cash: usize,
    pub market: usize,
    pub unrecognized: usize,
}

/// Splits the log into `(cash, market)` tables by record kind. Records of any
/// other kind are dropped. Either table may be empty.
pub fn parse_transaction_log(log: &TransactionLog) -> (CashTable, MarketTable) {
    let (cash, market, _) = partition_transaction_log(log);
    (cash, market)
}

/// Same as [`parse_transaction_log`], also reporting how many records went where.
pub fn partition_transaction_log(
    log: &TransactionLog,
) -> (CashTable, MarketTable, PartitionCounts) {
    let mut cash = CashTable::default();
    let mut market = MarketTable::default();
    let mut counts = PartitionCounts::default();

    for record in log.records() {
        match record {
            TransactionRecord::Cash(row) => {
                cash.push(row.clone());
                counts.cash += 1;
            }
            TransactionRecord::Market(row) => {
                market.push(row.clone());
                counts.market += 1;
            }
            TransactionRecord::Unrecognized { .. } => counts.unrecognized += 1,
        }
    }

    (cash, market, counts)
}
