use crate::services::trade_stats::TradeStats;
use crate::services::trades::TradeError;
use crate::value_objects::trade_summary::{TradeRow, TradeSummary};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequenceFailure {
    pub ticker: String,
    pub sequence: u64,
    pub error: TradeError,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TradesSummary {
    pub trades: Vec<TradeSummary>,
    pub failures: Vec<SequenceFailure>,
}

impl TradesSummary {
    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty() && self.failures.is_empty()
    }

    pub fn rows(&self) -> Vec<TradeRow> {
        self.trades.iter().map(TradeSummary::to_row).collect()
    }

    pub fn stats(&self) -> TradeStats {
        TradeStats::from_trades(&self.trades)
    }
}
