use crate::value_objects::trade_summary::TradeSummary;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TradeStats {
    pub trades: usize,
    pub completed: usize,
    pub open: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub total_pnl: f64,
    pub total_commission: f64,
    pub avg_holding_period: Option<f64>,
}

impl TradeStats {
    pub fn from_trades(trades: &[TradeSummary]) -> Self {
        let mut stats = TradeStats {
            trades: trades.len(),
            ..TradeStats::default()
        };
        let mut holding_total = 0i64;

        for trade in trades {
            stats.total_commission += trade.commission_total;
            let (Some(pnl), Some(holding)) = (trade.outcome.pnl(), trade.outcome.holding_period())
            else {
                stats.open += 1;
                continue;
            };

            stats.completed += 1;
            stats.total_pnl += pnl;
            holding_total = holding_total.saturating_add(holding);
            if pnl > 0.0 {
                stats.wins += 1;
            } else if pnl < 0.0 {
                stats.losses += 1;
            }
        }

        // Breakeven trades count toward the denominator.
        if stats.completed > 0 {
            stats.win_rate = stats.wins as f64 / stats.completed as f64;
            stats.avg_holding_period = Some(holding_total as f64 / stats.completed as f64);
        }
        stats
    }
}
