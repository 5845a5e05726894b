pub mod trades_summary;
pub mod transaction_table;
