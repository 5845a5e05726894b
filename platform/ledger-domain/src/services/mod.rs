pub mod returns;
pub mod trade_stats;
pub mod trades;
pub mod transaction_log;
