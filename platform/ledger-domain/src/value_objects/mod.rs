pub mod direction;
pub mod trade_summary;
pub mod transaction;
