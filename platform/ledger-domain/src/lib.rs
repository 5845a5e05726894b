pub mod aggregates;
pub mod entities;
pub mod services;
pub mod value_objects;

pub use aggregates::transaction_log::{TransactionLog, TransactionLogError};
pub use entities::trades_summary::{SequenceFailure, TradesSummary};
pub use entities::transaction_table::{CashTable, MarketTable, TransactionTable};
pub use services::returns::log_returns;
pub use services::trade_stats::TradeStats;
pub use services::trades::{
    trade_details, trade_details_with, trade_summary, trade_summary_with, trades_summary,
    trades_summary_with, CommissionPolicy, ReconstructionConfig, TickerScope, TickerSelection,
    TradeDetails, TradeError, TradeShape,
};
pub use services::transaction_log::{
    parse_transaction_log, partition_transaction_log, PartitionCounts,
};
