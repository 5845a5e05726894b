pub mod transaction_log;
